//! Linear relation estimators between reference and target wind speeds
//!
//! Every estimator returns a [`RegressionResult`] and absorbs degenerate
//! input (zero variance, too few bins) by returning the identity relation
//! `slope = 1, intercept = 0, correlation = 0` instead of NaN.
//!
//! # References
//! - Rogers, A.L., Rogers, J.W., Manwell, J.F. (2005). "Comparison of the
//!   performance of four measure-correlate-predict algorithms."
//!   Journal of Wind Engineering and Industrial Aerodynamics, 93(3), 243-264.
//! - Derrick, A. (1992). "Development of the measure-correlate-predict strategy
//!   for site assessment." Proceedings of the BWEA conference, 259-265.

use crate::core_types::vec2::sector_index;
use serde::{Deserialize, Serialize};

/// Linear map from reference speed to target speed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionResult {
    pub slope: f64,
    pub intercept: f64,
    /// Pearson correlation on the fitted domain, in [-1, 1]
    pub correlation: f64,
}

impl RegressionResult {
    /// Fallback relation for degenerate input
    pub const IDENTITY: Self = Self {
        slope: 1.0,
        intercept: 0.0,
        correlation: 0.0,
    };

    /// Apply the relation to one reference value
    #[inline]
    pub fn predict(&self, reference: f64) -> f64 {
        self.slope * reference + self.intercept
    }

    /// Population standard deviation of `target − predict(reference)`
    pub fn residual_std(&self, reference: &[f64], target: &[f64]) -> f64 {
        let n = reference.len().min(target.len());
        if n == 0 {
            return 0.0;
        }
        let residuals: Vec<f64> = reference
            .iter()
            .zip(target)
            .map(|(&r, &t)| t - self.predict(r))
            .collect();
        let mean = residuals.iter().sum::<f64>() / n as f64;
        let var = residuals.iter().map(|e| (e - mean).powi(2)).sum::<f64>() / n as f64;
        var.sqrt()
    }
}

/// First and second central moments of a paired sample
struct Moments {
    mean_x: f64,
    mean_y: f64,
    var_x: f64,
    var_y: f64,
    cov: f64,
}

impl Moments {
    /// Population moments (divide by n); `None` for empty input
    fn of(x: &[f64], y: &[f64]) -> Option<Self> {
        let n = x.len().min(y.len());
        if n == 0 {
            return None;
        }
        let nf = n as f64;
        let mean_x = x[..n].iter().sum::<f64>() / nf;
        let mean_y = y[..n].iter().sum::<f64>() / nf;
        let (mut var_x, mut var_y, mut cov) = (0.0, 0.0, 0.0);
        for (&xi, &yi) in x[..n].iter().zip(&y[..n]) {
            let dx = xi - mean_x;
            let dy = yi - mean_y;
            var_x += dx * dx;
            var_y += dy * dy;
            cov += dx * dy;
        }
        Some(Self {
            mean_x,
            mean_y,
            var_x: var_x / nf,
            var_y: var_y / nf,
            cov: cov / nf,
        })
    }

    fn correlation(&self) -> f64 {
        if self.var_x > 0.0 && self.var_y > 0.0 {
            (self.cov / (self.var_x * self.var_y).sqrt()).clamp(-1.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Total-least-squares (orthogonal) regression
///
/// Minimises perpendicular distance to the line, treating both instruments
/// as noisy:
///
/// ```text
/// θ = ½ atan2(2 cov, var_ref − var_target)
/// slope = tan θ
/// intercept = ȳ − slope · x̄
/// r = cov / sqrt(var_ref · var_target)
/// ```
///
/// Either variance being zero yields [`RegressionResult::IDENTITY`].
pub fn orthogonal_regression(reference: &[f64], target: &[f64]) -> RegressionResult {
    let Some(m) = Moments::of(reference, target) else {
        return RegressionResult::IDENTITY;
    };
    if m.var_x <= 0.0 || m.var_y <= 0.0 {
        return RegressionResult::IDENTITY;
    }

    let theta = 0.5 * (2.0 * m.cov).atan2(m.var_x - m.var_y);
    let slope = theta.tan();
    RegressionResult {
        slope,
        intercept: m.mean_y - slope * m.mean_x,
        correlation: m.correlation(),
    }
}

/// Ordinary least squares of `y` on `x` with Pearson correlation
///
/// Identity relation when `x` has no spread.
pub fn ordinary_least_squares(x: &[f64], y: &[f64]) -> RegressionResult {
    let Some(m) = Moments::of(x, y) else {
        return RegressionResult::IDENTITY;
    };
    if m.var_x <= 0.0 {
        return RegressionResult::IDENTITY;
    }
    let slope = m.cov / m.var_x;
    RegressionResult {
        slope,
        intercept: m.mean_y - slope * m.mean_x,
        correlation: m.correlation(),
    }
}

/// Method of bins
///
/// The reference range is split into `n_bins` equal-width bins. Each
/// non-empty bin contributes one point (mean reference, mean target) and an
/// OLS line is fitted through those points. The maximum reference value
/// belongs to the last bin. Fewer than two non-empty bins yields
/// [`RegressionResult::IDENTITY`].
pub fn method_of_bins(reference: &[f64], target: &[f64], n_bins: usize) -> RegressionResult {
    let n = reference.len().min(target.len());
    if n == 0 || n_bins == 0 {
        return RegressionResult::IDENTITY;
    }

    let (min, max) = reference[..n]
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let width = (max - min) / n_bins as f64;
    if !width.is_finite() || width <= 0.0 {
        return RegressionResult::IDENTITY;
    }

    let mut sums = vec![(0.0, 0.0, 0usize); n_bins];
    for (&r, &t) in reference[..n].iter().zip(&target[..n]) {
        let bin = (((r - min) / width).floor() as usize).min(n_bins - 1);
        let entry = &mut sums[bin];
        entry.0 += r;
        entry.1 += t;
        entry.2 += 1;
    }

    let (bin_ref, bin_target): (Vec<f64>, Vec<f64>) = sums
        .iter()
        .filter(|(_, _, count)| *count > 0)
        .map(|&(sr, st, count)| (sr / count as f64, st / count as f64))
        .unzip();

    if bin_ref.len() < 2 {
        return RegressionResult::IDENTITY;
    }
    ordinary_least_squares(&bin_ref, &bin_target)
}

/// Per-sector speed-ratio correction followed by a global OLS fit
///
/// For every reference sample with positive speed the ratio
/// `target / reference` updates the running mean of its direction sector
/// (sectors keyed on the reference direction, initial factor 1). Each target
/// sample is divided by its sector's factor, and an OLS line is fitted
/// between the raw reference and the corrected target over the whole
/// dataset. A zero factor leaves that sector's targets uncorrected.
pub fn matrix_last_ws(
    reference: &[f64],
    target: &[f64],
    reference_direction: &[f64],
    n_sectors: usize,
) -> RegressionResult {
    let n = reference.len().min(target.len());
    if n == 0 {
        return RegressionResult::IDENTITY;
    }
    let n_sectors = n_sectors.max(1);
    let sector_of = |i: usize| {
        reference_direction
            .get(i)
            .map_or(0, |&d| sector_index(d, n_sectors))
    };

    let mut factors = vec![1.0_f64; n_sectors];
    let mut counts = vec![0usize; n_sectors];
    for i in 0..n {
        if reference[i] > 0.0 {
            let s = sector_of(i);
            let ratio = target[i] / reference[i];
            factors[s] = (factors[s] * counts[s] as f64 + ratio) / (counts[s] + 1) as f64;
            counts[s] += 1;
        }
    }

    let corrected: Vec<f64> = (0..n)
        .map(|i| {
            let factor = factors[sector_of(i)];
            if factor != 0.0 && factor.is_finite() {
                target[i] / factor
            } else {
                target[i]
            }
        })
        .collect();

    ordinary_least_squares(&reference[..n], &corrected)
}
