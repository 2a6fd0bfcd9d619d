//! YCgCo luma/chroma decomposition.
//!
//! The keyer only cares about the (Cg, Co) pair: chroma distance in that
//! plane is what decides whether a pixel matches the key color.

use glam::{Vec2, Vec3};
use procamp_core::Color;

/// RGB to (Y, Cg, Co).
#[inline]
pub fn rgb_to_ycgco(rgb: Vec3) -> Vec3 {
    Vec3::new(
        0.25 * rgb.x + 0.5 * rgb.y + 0.25 * rgb.z,
        -0.25 * rgb.x + 0.5 * rgb.y - 0.25 * rgb.z,
        0.5 * rgb.x - 0.5 * rgb.z,
    )
}

/// (Y, Cg, Co) back to RGB. Exact inverse of [`rgb_to_ycgco`].
#[inline]
pub fn ycgco_to_rgb(ycgco: Vec3) -> Vec3 {
    let (y, cg, co) = (ycgco.x, ycgco.y, ycgco.z);
    let tmp = y - cg;
    Vec3::new(tmp + co, y + cg, tmp - co)
}

/// The (Cg, Co) chroma target for a key color.
#[inline]
pub fn key_chroma(color: Color) -> Vec2 {
    let ycgco = rgb_to_ycgco(color.to_vec3());
    Vec2::new(ycgco.y, ycgco.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primaries() {
        let green = rgb_to_ycgco(Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(green, Vec3::new(0.5, 0.5, 0.0));

        let red = rgb_to_ycgco(Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(red, Vec3::new(0.25, -0.25, 0.5));

        let blue = rgb_to_ycgco(Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(blue, Vec3::new(0.25, -0.25, -0.5));
    }

    #[test]
    fn test_white_and_black_have_no_chroma() {
        let white = rgb_to_ycgco(Vec3::ONE);
        assert_eq!(white, Vec3::new(1.0, 0.0, 0.0));
        let black = rgb_to_ycgco(Vec3::ZERO);
        assert_eq!(black, Vec3::ZERO);
    }

    #[test]
    fn test_roundtrip_sampled_colors() {
        let samples = [
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::ONE,
            Vec3::ZERO,
            Vec3::new(0.5, 0.5, 0.5),
            Vec3::new(0.9, 0.1, 0.4),
            Vec3::new(0.2, 0.8, 0.6),
        ];
        for rgb in samples {
            let back = ycgco_to_rgb(rgb_to_ycgco(rgb));
            assert!(
                (back - rgb).abs().max_element() < 1e-6,
                "{rgb:?} -> {back:?}"
            );
        }
    }

    #[test]
    fn test_key_chroma_of_green() {
        let chroma = key_chroma(Color::GREEN);
        assert_eq!(chroma, Vec2::new(0.5, 0.0));
    }

    proptest::proptest! {
        #[test]
        fn roundtrip_is_lossless(
            r in 0.0f32..1.0,
            g in 0.0f32..1.0,
            b in 0.0f32..1.0,
        ) {
            let rgb = Vec3::new(r, g, b);
            let back = ycgco_to_rgb(rgb_to_ycgco(rgb));
            proptest::prop_assert!((back - rgb).abs().max_element() < 1e-5);
        }
    }
}
