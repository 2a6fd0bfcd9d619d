//! ProcAmp Render - per-frame pass orchestration
//!
//! Decides, once per external frame tick, which logical shader passes run,
//! in what order, with which pooled intermediate buffers, and hands the
//! result to the configured sink. The GPU kernels themselves live behind
//! the [`PassExecutor`] seam; a CPU reference implementation is included.

pub mod blend;
pub mod buffer_pool;
pub mod executor;
pub mod pass;
pub mod processor;
pub mod sink;
pub mod software;

pub use blend::{BlendFactor, BlendState};
pub use buffer_pool::BufferPool;
pub use executor::{PassExecutor, RecordedPass, RecordingExecutor};
pub use pass::{PassDescriptor, PassKind, PassProgramTable, PassUniforms, ProgramHandle};
pub use processor::{FrameProcessor, RefinementSettings, TickOutcome};
pub use sink::{CapturingSink, FrameSink, FrameSource, StaticSource};
pub use software::SoftwareExecutor;
