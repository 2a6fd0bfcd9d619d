//! Blend state selection for the final draw.

use serde::{Deserialize, Serialize};

/// Blend factor, matching the usual fixed-function vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlendFactor {
    Zero,
    One,
    SrcAlpha,
    OneMinusSrcAlpha,
}

/// Source/destination blend factor pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlendState {
    pub src: BlendFactor,
    pub dst: BlendFactor,
}

impl BlendState {
    /// Source replaces destination.
    pub const OPAQUE: Self = Self {
        src: BlendFactor::One,
        dst: BlendFactor::Zero,
    };

    /// Standard alpha blending.
    pub const ALPHA: Self = Self {
        src: BlendFactor::SrcAlpha,
        dst: BlendFactor::OneMinusSrcAlpha,
    };

    /// Blend state for the current snapshot. Opaque only when nothing can
    /// introduce partial coverage; recomputed whenever opacity or keying
    /// changes.
    pub fn select(opacity: f32, keying: bool) -> Self {
        if keying || opacity < 1.0 {
            Self::ALPHA
        } else {
            Self::OPAQUE
        }
    }
}
