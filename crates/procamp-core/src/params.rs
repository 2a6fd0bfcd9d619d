//! The per-frame parameter snapshot and its derived uniform values.
//!
//! Parameters are owned by the host (editor, UI, script bindings) and read
//! fresh once per tick; nothing in here mutates them. Conventions:
//!
//! - brightness, contrast, and saturation are all zero-centered in [-1, 1]
//!   (0 is neutral; the shader-side multiplier is `value + 1`)
//! - temperature and tint are perceptual white-balance offsets in [-1, 1]
//! - trim components are edge fractions; the kept span on each axis must
//!   stay positive, and [`ProcAmpParams::sanitized_trim`] enforces that

use crate::color::Color;
use glam::{Vec2, Vec4};
use serde::{Deserialize, Serialize};

/// Smallest fraction of the frame a trim may leave on an axis.
const MIN_TRIM_SPAN: f32 = 0.01;

/// Edge-fraction crop, measured inward from each side.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Trim {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Trim {
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }
}

/// Where the processed frame goes each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OutputTarget {
    /// Overlay on the screen at present time.
    #[default]
    Screen,
    /// Write into an externally owned texture.
    Texture,
    /// Hand to a UI image element.
    UiImage,
}

/// Full parameter snapshot for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProcAmpParams {
    // Basic adjustment
    pub brightness: f32,
    pub contrast: f32,
    pub saturation: f32,

    // Color balance
    pub temperature: f32,
    pub tint: f32,

    // Keying
    pub keying: bool,
    pub key_color: Color,
    pub key_threshold: f32,
    pub key_tolerance: f32,
    pub spill_removal: f32,

    // Transform
    pub trim: Trim,
    pub scale: Vec2,
    pub offset: Vec2,

    // Final tweaks
    pub fade_to_color: Color,
    pub opacity: f32,

    // Destination
    pub target: OutputTarget,
}

impl Default for ProcAmpParams {
    fn default() -> Self {
        Self {
            brightness: 0.0,
            contrast: 0.0,
            saturation: 0.0,
            temperature: 0.0,
            tint: 0.0,
            keying: false,
            key_color: Color::GREEN,
            key_threshold: 0.5,
            key_tolerance: 0.2,
            spill_removal: 0.5,
            trim: Trim::default(),
            scale: Vec2::ONE,
            offset: Vec2::ZERO,
            fade_to_color: Color::TRANSPARENT,
            opacity: 1.0,
            target: OutputTarget::Screen,
        }
    }
}

impl ProcAmpParams {
    /// True when white balance is a no-op and the neutral color-adjust
    /// variant can run. The exact-zero comparison is deliberate: it decides
    /// which shader variant activates, not a numeric tolerance.
    #[inline]
    pub fn is_neutral_balance(&self) -> bool {
        self.temperature == 0.0 && self.tint == 0.0
    }

    /// Trim with each axis clamped so the kept span stays positive.
    ///
    /// Returns the (possibly adjusted) trim and whether clamping occurred,
    /// so the caller can log the condition.
    pub fn sanitized_trim(&self) -> (Trim, bool) {
        let mut t = self.trim;
        let mut clamped = false;

        let span_x = 1.0 - t.left - t.right;
        if span_x < MIN_TRIM_SPAN {
            let excess = (MIN_TRIM_SPAN - span_x) * 0.5;
            t.left -= excess;
            t.right -= excess;
            clamped = true;
        }
        let span_y = 1.0 - t.top - t.bottom;
        if span_y < MIN_TRIM_SPAN {
            let excess = (MIN_TRIM_SPAN - span_y) * 0.5;
            t.top -= excess;
            t.bottom -= excess;
            clamped = true;
        }
        (t, clamped)
    }

    /// Trim uniform `(left, top, 1/(1-left-right), 1/(1-top-bottom))`,
    /// computed from the sanitized trim so the reciprocals are finite.
    pub fn trim_params(&self) -> Vec4 {
        let (t, _) = self.sanitized_trim();
        Vec4::new(
            t.left,
            t.top,
            1.0 / (1.0 - t.left - t.right),
            1.0 / (1.0 - t.top - t.bottom),
        )
    }

    /// Matte distance range `(lo, hi)` for the key-extract pass.
    pub fn matte_range(&self) -> Vec2 {
        Vec2::new(
            self.key_threshold * 0.1,
            (self.key_threshold + self.key_tolerance) * 0.1,
        )
    }
}

// ── Parameter descriptors ───────────────────────────────────────

/// Visibility predicate for conditional inspector rows.
pub type VisibilityFn = fn(&ProcAmpParams) -> bool;

/// Declarative description of one editable scalar parameter.
///
/// The host UI walks this list instead of hard-coding field layout; the
/// keying controls only show while keying is enabled.
#[derive(Clone, Copy)]
pub struct ParamDescriptor {
    pub name: &'static str,
    pub label: &'static str,
    pub min: f32,
    pub max: f32,
    pub visible: VisibilityFn,
}

fn always(_: &ProcAmpParams) -> bool {
    true
}

fn when_keying(p: &ProcAmpParams) -> bool {
    p.keying
}

/// Scalar parameter registry in display order.
pub fn param_descriptors() -> &'static [ParamDescriptor] {
    const DESCRIPTORS: &[ParamDescriptor] = &[
        ParamDescriptor {
            name: "brightness",
            label: "Brightness",
            min: -1.0,
            max: 1.0,
            visible: always,
        },
        ParamDescriptor {
            name: "contrast",
            label: "Contrast",
            min: -1.0,
            max: 1.0,
            visible: always,
        },
        ParamDescriptor {
            name: "saturation",
            label: "Saturation",
            min: -1.0,
            max: 1.0,
            visible: always,
        },
        ParamDescriptor {
            name: "temperature",
            label: "Temperature",
            min: -1.0,
            max: 1.0,
            visible: always,
        },
        ParamDescriptor {
            name: "tint",
            label: "Tint (cyan-purple)",
            min: -1.0,
            max: 1.0,
            visible: always,
        },
        ParamDescriptor {
            name: "key_threshold",
            label: "Threshold",
            min: 0.0,
            max: 1.0,
            visible: when_keying,
        },
        ParamDescriptor {
            name: "key_tolerance",
            label: "Tolerance",
            min: 0.0,
            max: 1.0,
            visible: when_keying,
        },
        ParamDescriptor {
            name: "spill_removal",
            label: "Spill Removal",
            min: 0.0,
            max: 1.0,
            visible: when_keying,
        },
        ParamDescriptor {
            name: "opacity",
            label: "Opacity",
            min: 0.0,
            max: 1.0,
            visible: always,
        },
    ];
    DESCRIPTORS
}
