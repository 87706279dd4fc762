//! Power-law vertical extrapolation
//!
//! ```text
//! u(z) = u(z_ref) × (z / z_ref)^α
//! ```
//!
//! A single-height series carries no information about α. The pipeline
//! therefore assigns the open-terrain default (α = 0.15) to every usable
//! sample. This is an approximation, not a derivation from the data; use
//! [`power_law_alpha`] when concurrent measurements at two heights exist.
//!
//! # References
//! - Peterson, E.W., Hennessey, J.P. (1978). "On the use of power laws for
//!   estimates of wind power potential." Journal of Applied Meteorology, 17, 390-394.

use crate::core_types::met::MetSeries;
use serde::{Deserialize, Serialize};

/// Open-terrain shear exponent used when no profile measurement exists
pub const DEFAULT_SHEAR_ALPHA: f64 = 0.15;

/// Outcome of the shear stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShearResult {
    /// Mean exponent over usable samples; `None` when no sample qualified
    pub alpha: Option<f64>,
    /// Speed at the target height, one per input sample (m/s)
    pub extrapolated: Vec<f64>,
}

/// Exponent from concurrent speeds at two heights
///
/// ```text
/// α = ln(u₂ / u₁) / ln(z₂ / z₁)
/// ```
///
/// Returns `None` for non-positive heights or speeds, or equal heights.
pub fn power_law_alpha(
    lower_height: f64,
    lower_speed: f64,
    upper_height: f64,
    upper_speed: f64,
) -> Option<f64> {
    if lower_height <= 0.0 || upper_height <= 0.0 || lower_speed <= 0.0 || upper_speed <= 0.0 {
        return None;
    }
    let height_ratio = (upper_height / lower_height).ln();
    if height_ratio.abs() < f64::EPSILON {
        return None;
    }
    Some((upper_speed / lower_speed).ln() / height_ratio)
}

/// Assign an exponent and extrapolate the series to `target_height`
///
/// A sample qualifies when `reference_height > 0` and its speed is
/// positive; each qualifying sample receives `assumed_alpha`. When the
/// mean exponent is missing or not positive the extrapolated column equals
/// the measured speed.
pub fn extrapolate_shear(
    series: &MetSeries,
    reference_height: f64,
    target_height: f64,
    assumed_alpha: f64,
) -> ShearResult {
    let qualifying = if reference_height > 0.0 {
        series.samples.iter().filter(|s| s.wind_speed > 0.0).count()
    } else {
        0
    };

    let alpha = (qualifying > 0).then_some(assumed_alpha);

    let extrapolated = match alpha {
        Some(a) if a > 0.0 && target_height > 0.0 => {
            let factor = (target_height / reference_height).powf(a);
            series.samples.iter().map(|s| s.wind_speed * factor).collect()
        }
        _ => series.speeds(),
    };

    ShearResult { alpha, extrapolated }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::met::MetSample;
    use chrono::{DateTime, Utc};

    #[test]
    fn test_power_law_alpha_from_two_heights() {
        // u doubles over a 16x height ratio → α = ln2 / ln16 = 0.25
        let alpha = power_law_alpha(10.0, 5.0, 160.0, 10.0).unwrap();
        assert!((alpha - 0.25).abs() < 1e-12);
        assert!(power_law_alpha(10.0, 5.0, 10.0, 6.0).is_none());
        assert!(power_law_alpha(0.0, 5.0, 80.0, 6.0).is_none());
    }

    #[test]
    fn test_extrapolation_uses_assumed_alpha() {
        let t = DateTime::<Utc>::UNIX_EPOCH;
        let series = MetSeries::new(
            "mast",
            600.0,
            vec![MetSample::new(t, 5.0, 0.0), MetSample::new(t, 0.0, 0.0)],
        );
        let result = extrapolate_shear(&series, 10.0, 80.0, DEFAULT_SHEAR_ALPHA);
        assert_eq!(result.alpha, Some(0.15));
        let expected = 5.0 * 8.0_f64.powf(0.15);
        assert!((result.extrapolated[0] - expected).abs() < 1e-12);
        assert_eq!(result.extrapolated[1], 0.0);
    }

    #[test]
    fn test_no_qualifying_samples_keeps_speeds() {
        let t = DateTime::<Utc>::UNIX_EPOCH;
        let series = MetSeries::new("mast", 600.0, vec![MetSample::new(t, 4.0, 0.0)]);
        let result = extrapolate_shear(&series, 0.0, 80.0, DEFAULT_SHEAR_ALPHA);
        assert_eq!(result.alpha, None);
        assert_eq!(result.extrapolated, vec![4.0]);
    }
}
