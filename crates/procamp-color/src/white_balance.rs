//! White-balance correction via CIE chromaticity and CAT02 LMS.
//!
//! The temperature/tint sliders move a target white point along (and off)
//! the daylight locus; the correction coefficients are the ratio of the
//! D65 reference cone response to the target's cone response. Constants
//! are reference-calibrated and must not be "improved".

use crate::error::ColorError;
use glam::Vec3;

/// Chromaticity y below this magnitude is treated as degenerate.
const MIN_CHROMATICITY_Y: f32 = 1e-4;

/// D65 white point in CAT02 LMS.
const D65_LMS: Vec3 = Vec3::new(0.949237, 1.03542, 1.08728);

/// Analytical model of the standard illuminant's chromaticity y for a
/// given x, by Judd et al., adjusted to pass through the D65 white point
/// (x = 0.31271, y = 0.32902).
#[inline]
pub fn standard_illuminant_y(x: f32) -> f32 {
    2.87 * x - 3.0 * x * x - 0.27509507
}

/// CIE xy chromaticity to CAT02 LMS cone response, with Y normalized to 1.
///
/// Fails when `y` is close enough to zero that the tristimulus division
/// would blow up.
pub fn cie_xy_to_lms(x: f32, y: f32) -> Result<Vec3, ColorError> {
    if y.abs() < MIN_CHROMATICITY_Y {
        return Err(ColorError::DegenerateChromaticity { y });
    }

    let big_y = 1.0;
    let big_x = big_y * x / y;
    let big_z = big_y * (1.0 - x - y) / y;

    let l = 0.7328 * big_x + 0.4296 * big_y - 0.1624 * big_z;
    let m = -0.7036 * big_x + 1.6975 * big_y + 0.0061 * big_z;
    let s = 0.0030 * big_x + 0.0136 * big_y + 0.9834 * big_z;

    Ok(Vec3::new(l, m, s))
}

/// Per-channel multiplicative white-balance coefficients for a
/// temperature/tint pair, both in [-1, 1].
///
/// Cooling (negative temperature) responds twice as strongly as warming;
/// that asymmetry matches the perceptual calibration of the controls.
pub fn color_balance(temperature: f32, tint: f32) -> Result<Vec3, ColorError> {
    // CIE xy chromaticity of the target white point.
    // 0.31271 is the x value of the D65 white point.
    let x = 0.31271 - temperature * if temperature < 0.0 { 0.1 } else { 0.05 };
    let y = standard_illuminant_y(x) + tint * 0.05;

    let target = cie_xy_to_lms(x, y)?;
    Ok(D65_LMS / target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_is_identity() {
        let c = color_balance(0.0, 0.0).unwrap();
        assert!((c.x - 1.0).abs() < 1e-3, "r coefficient {}", c.x);
        assert!((c.y - 1.0).abs() < 1e-3, "g coefficient {}", c.y);
        assert!((c.z - 1.0).abs() < 1e-3, "b coefficient {}", c.z);
    }

    #[test]
    fn test_d65_locus_point() {
        // The adjusted Judd model passes through the D65 white point.
        let y = standard_illuminant_y(0.31271);
        assert!((y - 0.32902).abs() < 1e-4, "got {y}");
    }

    #[test]
    fn test_warming_boosts_red_over_blue() {
        let warm = color_balance(0.5, 0.0).unwrap();
        assert!(warm.x > warm.z, "warm balance should favor red: {warm:?}");

        let cool = color_balance(-0.5, 0.0).unwrap();
        assert!(cool.z > cool.x, "cool balance should favor blue: {cool:?}");
    }

    #[test]
    fn test_asymmetric_temperature_response() {
        // Cooling moves x twice as far as warming for the same magnitude.
        let x_cool = 0.31271 - (-0.4f32) * 0.1;
        let x_warm = 0.31271 - 0.4f32 * 0.05;
        assert!((x_cool - 0.35271).abs() < 1e-6);
        assert!((x_warm - 0.29271).abs() < 1e-6);
    }

    #[test]
    fn test_continuous_across_zero_temperature() {
        // The slope changes at temperature = 0 but the value does not jump.
        let below = color_balance(-1e-4, 0.0).unwrap();
        let above = color_balance(1e-4, 0.0).unwrap();
        assert!((below - above).abs().max_element() < 1e-3);
    }

    #[test]
    fn test_degenerate_chromaticity_is_reported() {
        let err = cie_xy_to_lms(0.3, 0.0).unwrap_err();
        assert!(matches!(err, ColorError::DegenerateChromaticity { .. }));
        // And never silently produces NaN for valid slider inputs.
        for t in [-1.0, -0.5, 0.0, 0.5, 1.0] {
            for tint in [-1.0, 0.0, 1.0] {
                let c = color_balance(t, tint).unwrap();
                assert!(c.is_finite(), "({t}, {tint}) -> {c:?}");
            }
        }
    }

    proptest::proptest! {
        #[test]
        fn balance_is_continuous(
            temp in -1.0f32..1.0,
            tint in -1.0f32..1.0,
        ) {
            let base = color_balance(temp, tint).unwrap();
            let dt = 1e-3f32;
            let t2 = (temp + dt).min(1.0);
            let nudged = color_balance(t2, tint).unwrap();
            // Small input perturbation, bounded output change.
            proptest::prop_assert!((base - nudged).abs().max_element() < 0.05);
        }
    }
}
