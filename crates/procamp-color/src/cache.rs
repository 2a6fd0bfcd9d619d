//! Change-keyed caches for the derived color values.
//!
//! Recomputation happens only when the inputs that produced the cached
//! value change; ticks with stable parameters pay nothing.

use crate::error::ColorError;
use crate::white_balance::color_balance;
use crate::ycgco::key_chroma;
use glam::{Vec2, Vec3};
use procamp_core::Color;

/// White-balance coefficients cached on (temperature, tint).
#[derive(Debug, Default)]
pub struct CachedColorBalance {
    key: Option<(f32, f32)>,
    value: Option<Vec3>,
}

impl CachedColorBalance {
    pub fn new() -> Self {
        Self::default()
    }

    /// Coefficients for the given inputs, recomputing on change.
    ///
    /// A degenerate chromaticity leaves the previous value cached and is
    /// reported to the caller.
    pub fn get(&mut self, temperature: f32, tint: f32) -> Result<Vec3, ColorError> {
        if self.key == Some((temperature, tint)) {
            if let Some(v) = self.value {
                return Ok(v);
            }
        }
        let v = color_balance(temperature, tint)?;
        self.key = Some((temperature, tint));
        self.value = Some(v);
        Ok(v)
    }

    /// Most recent valid coefficients, if any.
    pub fn last_valid(&self) -> Option<Vec3> {
        self.value
    }
}

/// Key-color chroma target cached on the key color.
#[derive(Debug, Default)]
pub struct CachedKeyChroma {
    key: Option<Color>,
    value: Option<Vec2>,
}

impl CachedKeyChroma {
    pub fn new() -> Self {
        Self::default()
    }

    /// (Cg, Co) target for the key color, recomputing on change.
    pub fn get(&mut self, color: Color) -> Vec2 {
        if self.key == Some(color) {
            if let Some(v) = self.value {
                return v;
            }
        }
        let v = key_chroma(color);
        self.key = Some(color);
        self.value = Some(v);
        v
    }
}
