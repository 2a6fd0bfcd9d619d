//! ProcAmp Core - Foundation types for the video adjustment pipeline
//!
//! This crate provides the fundamental types used throughout ProcAmp:
//! - Color values and frame buffers
//! - The per-frame parameter snapshot and its derived uniforms
//! - The shared error taxonomy

pub mod color;
pub mod error;
pub mod frame;
pub mod params;

pub use color::Color;
pub use error::{ProcAmpError, Result};
pub use frame::FrameBuffer;
pub use params::{param_descriptors, OutputTarget, ParamDescriptor, ProcAmpParams, Trim};
