//! The executor seam between pass orchestration and pass execution.
//!
//! The processor only decides *what* to run; an executor decides *how*.
//! [`crate::SoftwareExecutor`] is the CPU reference; a GPU backend plugs
//! in behind the same trait.

use crate::blend::BlendState;
use crate::pass::{PassDescriptor, PassKind, PassUniforms};
use procamp_core::{FrameBuffer, Result};

/// Runs one logical pass.
pub trait PassExecutor {
    /// Execute `pass`, reading `src` (and `base` for composite passes)
    /// and writing `dst`. `dst` is always sized by the caller.
    fn execute(
        &mut self,
        pass: &PassDescriptor,
        blend: BlendState,
        src: &FrameBuffer,
        base: Option<&FrameBuffer>,
        dst: &mut FrameBuffer,
    ) -> Result<()>;
}

/// Record of one executed pass, for orchestration assertions.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedPass {
    pub kind: PassKind,
    pub blend: BlendState,
    pub uniforms: PassUniforms,
    pub had_base: bool,
}

/// Test double that records every pass and forwards pixels unchanged.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    passes: Vec<RecordedPass>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Passes executed since the last [`Self::clear`].
    pub fn passes(&self) -> &[RecordedPass] {
        &self.passes
    }

    /// Pass kinds only, in execution order.
    pub fn kinds(&self) -> Vec<PassKind> {
        self.passes.iter().map(|p| p.kind).collect()
    }

    pub fn clear(&mut self) {
        self.passes.clear();
    }
}

impl PassExecutor for RecordingExecutor {
    fn execute(
        &mut self,
        pass: &PassDescriptor,
        blend: BlendState,
        src: &FrameBuffer,
        base: Option<&FrameBuffer>,
        dst: &mut FrameBuffer,
    ) -> Result<()> {
        self.passes.push(RecordedPass {
            kind: pass.kind,
            blend,
            uniforms: pass.uniforms,
            had_base: base.is_some(),
        });
        if dst.data().len() == src.data().len() {
            dst.data_mut().copy_from_slice(src.data());
        }
        Ok(())
    }
}
