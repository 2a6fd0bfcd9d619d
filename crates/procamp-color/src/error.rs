//! Color subsystem errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ColorError {
    #[error("degenerate chromaticity: y = {y} is too close to zero")]
    DegenerateChromaticity { y: f32 },
}
