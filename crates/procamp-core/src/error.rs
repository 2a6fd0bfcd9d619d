//! Error types for ProcAmp.

use thiserror::Error;

/// Main error type for ProcAmp operations.
#[derive(Error, Debug)]
pub enum ProcAmpError {
    #[error("Out of memory: {0}")]
    OutOfMemory(String),

    #[error("Shader program not found for pass: {0}")]
    MissingProgram(String),

    #[error("Pass execution error: {0}")]
    Pass(String),
}

/// Result type alias for ProcAmp operations.
pub type Result<T> = std::result::Result<T, ProcAmpError>;
