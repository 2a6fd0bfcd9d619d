//! Logical pass identities, program lookup, and per-tick uniform packing.
//!
//! Passes are named, not numbered: each [`PassKind`] resolves to an opaque
//! GPU program handle through a table built once at startup. Uniform
//! blocks are rebuilt from the parameter snapshot every tick.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3, Vec4};
use procamp_core::{ProcAmpError, ProcAmpParams, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The logical operations the pipeline can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PassKind {
    /// Chroma-key matte extraction with spill suppression.
    KeyExtract,
    /// Matte alpha dilation (optional refinement).
    AlphaDilate,
    /// Horizontal matte alpha blur (optional refinement).
    AlphaBlurH,
    /// Vertical matte alpha blur (optional refinement).
    AlphaBlurV,
    /// Brightness/contrast/saturation only; white balance is a no-op.
    ColorAdjustNeutral,
    /// Color adjust including the white-balance multiply.
    ColorAdjustBalanced,
    /// Geometric mapping and blending against a base frame.
    Composite,
}

impl PassKind {
    /// All pass kinds, in pipeline order.
    pub const ALL: [PassKind; 7] = [
        Self::KeyExtract,
        Self::AlphaDilate,
        Self::AlphaBlurH,
        Self::AlphaBlurV,
        Self::ColorAdjustNeutral,
        Self::ColorAdjustBalanced,
        Self::Composite,
    ];

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            Self::KeyExtract => "Key Extract",
            Self::AlphaDilate => "Alpha Dilate",
            Self::AlphaBlurH => "Alpha Blur H",
            Self::AlphaBlurV => "Alpha Blur V",
            Self::ColorAdjustNeutral => "Color Adjust (neutral)",
            Self::ColorAdjustBalanced => "Color Adjust (balanced)",
            Self::Composite => "Composite",
        }
    }
}

/// Opaque handle to a loaded GPU program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProgramHandle(pub u32);

/// Startup-time mapping from pass kind to program handle.
///
/// Construction fails if any pass kind is missing a program; a broken
/// shader resource is a startup misconfiguration, never a per-tick error.
#[derive(Debug, Clone)]
pub struct PassProgramTable {
    programs: HashMap<PassKind, ProgramHandle>,
}

impl PassProgramTable {
    /// Build the table by asking the loader for every pass kind.
    pub fn load<F>(mut loader: F) -> Result<Self>
    where
        F: FnMut(PassKind) -> Option<ProgramHandle>,
    {
        let mut programs = HashMap::new();
        for kind in PassKind::ALL {
            let handle = loader(kind)
                .ok_or_else(|| ProcAmpError::MissingProgram(kind.name().to_string()))?;
            programs.insert(kind, handle);
        }
        Ok(Self { programs })
    }

    /// Table where each pass maps to its position in [`PassKind::ALL`].
    /// Handy for tests and CPU-only execution.
    pub fn sequential() -> Self {
        Self {
            programs: PassKind::ALL
                .iter()
                .enumerate()
                .map(|(i, &kind)| (kind, ProgramHandle(i as u32)))
                .collect(),
        }
    }

    /// Program handle for a pass kind.
    pub fn resolve(&self, kind: PassKind) -> ProgramHandle {
        // Construction guarantees every kind is present.
        self.programs[&kind]
    }
}

/// Uniform block shared by all passes, laid out for direct GPU upload.
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
#[repr(C)]
pub struct PassUniforms {
    /// (brightness/2, contrast+1, saturation+1, unused)
    pub color_adjust: Vec4,
    /// White-balance coefficients (r, g, b, unused).
    pub color_balance: Vec4,
    /// Key chroma target and matte range: (Cg, Co, range lo, range hi).
    pub key_chroma: Vec4,
    /// (spill removal, opacity, unused, unused)
    pub spill_opacity: Vec4,
    /// Fade target RGBA; alpha is the fade amount.
    pub fade_to_color: Vec4,
    /// (left, top, 1/(1-left-right), 1/(1-top-bottom))
    pub trim_params: Vec4,
    /// (scale.x, scale.y, offset.x, offset.y)
    pub scale_offset: Vec4,
    /// Aspect-ratio correction (x, y, unused, unused).
    pub aspect_conv: Vec4,
}

impl PassUniforms {
    /// Pack uniforms from a parameter snapshot plus the derived color
    /// values. Geometry comes from the params; aspect starts at identity.
    pub fn from_params(params: &ProcAmpParams, balance: Vec3, key_chroma: Vec2) -> Self {
        let matte = params.matte_range();
        Self {
            color_adjust: Vec4::new(
                params.brightness * 0.5,
                params.contrast + 1.0,
                params.saturation + 1.0,
                0.0,
            ),
            color_balance: balance.extend(0.0),
            key_chroma: Vec4::new(key_chroma.x, key_chroma.y, matte.x, matte.y),
            spill_opacity: Vec4::new(params.spill_removal, params.opacity, 0.0, 0.0),
            fade_to_color: params.fade_to_color.to_vec4(),
            trim_params: params.trim_params(),
            scale_offset: Vec4::new(
                params.scale.x,
                params.scale.y,
                params.offset.x,
                params.offset.y,
            ),
            aspect_conv: Vec4::new(1.0, 1.0, 0.0, 0.0),
        }
    }

    /// Same uniforms with identity geometry. Used for the color-adjust
    /// pass in image-effect mode, where the composite pass owns geometry.
    pub fn with_identity_geometry(mut self) -> Self {
        self.trim_params = Vec4::new(0.0, 0.0, 1.0, 1.0);
        self.scale_offset = Vec4::new(1.0, 1.0, 0.0, 0.0);
        self.aspect_conv = Vec4::new(1.0, 1.0, 0.0, 0.0);
        self
    }

    /// Same uniforms with an aspect-ratio correction factor.
    pub fn with_aspect(mut self, conv: Vec2) -> Self {
        self.aspect_conv = Vec4::new(conv.x, conv.y, 0.0, 0.0);
        self
    }

    /// True when trim, scale, offset, and aspect leave UVs untouched.
    pub fn geometry_is_identity(&self) -> bool {
        self.trim_params == Vec4::new(0.0, 0.0, 1.0, 1.0)
            && self.scale_offset == Vec4::new(1.0, 1.0, 0.0, 0.0)
            && self.aspect_conv.x == 1.0
            && self.aspect_conv.y == 1.0
    }
}

/// One pass invocation: what to run and with which inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassDescriptor {
    pub kind: PassKind,
    pub program: ProgramHandle,
    pub uniforms: PassUniforms,
}

impl PassDescriptor {
    pub fn new(kind: PassKind, table: &PassProgramTable, uniforms: PassUniforms) -> Self {
        Self {
            kind,
            program: table.resolve(kind),
            uniforms,
        }
    }
}

/// Which color-adjust variant the snapshot activates.
///
/// The exact-zero check is deliberate: it selects a shader variant, so it
/// must not use a tolerance.
pub fn color_adjust_kind(params: &ProcAmpParams) -> PassKind {
    if params.is_neutral_balance() {
        PassKind::ColorAdjustNeutral
    } else {
        PassKind::ColorAdjustBalanced
    }
}
