//! Met-mast time-series cleaning
//!
//! The pipeline runs in a fixed order, each stage consuming the previous
//! stage's output:
//!
//! 1. Tower shadow: speeds in a band around 0° scaled by 0.7 (rows kept)
//! 2. Icing: near-freezing, near-calm rows removed (only when temperatures exist)
//! 3. Rolling standard deviation: rows in high-variability windows removed
//! 4. Shear: power-law extrapolation to the target height
//!
//! # References
//! - IEC 61400-12-1:2017, Annex G. "Mounting of instruments on the met mast."
//! - Lackner, M.A., Rogers, A.L., Manwell, J.F. (2008). "Uncertainty analysis in
//!   MCP-based wind resource assessment and energy production estimation."
//!   Journal of Solar Energy Engineering, 130(3).

mod shear;
mod stages;

pub use shear::{extrapolate_shear, power_law_alpha, ShearResult, DEFAULT_SHEAR_ALPHA};
pub use stages::{
    filter_icing, filter_rolling_std, filter_tower_shadow, in_tower_shadow, is_iced, rolling_std,
    ICING_MAX_SPEED, ICING_MIN_TEMPERATURE, TOWER_SHADOW_FACTOR,
};

use crate::core_types::met::MetSeries;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Options for [`filter`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterOptions {
    /// Apply the tower-shadow correction
    pub remove_tower_shadow: bool,
    /// Half-width of the shadow band around 0° (degrees)
    pub tower_shadow_offset_deg: f64,

    /// Drop iced samples
    pub remove_icing: bool,
    /// Upper temperature bound of the icing signature (°C, exclusive)
    pub icing_max_temperature: f64,

    /// Drop samples in high-variability windows
    pub remove_high_std: bool,
    /// Rolling window length (samples)
    pub std_window: usize,
    /// Rejection threshold for the rolling standard deviation (m/s)
    pub max_std: f64,

    /// Measurement height of the series (m)
    pub reference_height: f64,
    /// Height to extrapolate to (m)
    pub target_height: f64,
    /// Exponent assumed for single-height series
    pub default_shear_alpha: f64,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            remove_tower_shadow: true,
            tower_shadow_offset_deg: 30.0,
            remove_icing: true,
            icing_max_temperature: 2.0,
            remove_high_std: true,
            std_window: 10,
            max_std: 5.0,
            reference_height: 10.0,
            target_height: 80.0,
            default_shear_alpha: DEFAULT_SHEAR_ALPHA,
        }
    }
}

/// Output of the filtering pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterReport {
    /// Cleaned series
    pub series: MetSeries,
    /// Speed extrapolated to the target height, one per cleaned sample (m/s)
    pub extrapolated_speed: Vec<f64>,
    /// Mean shear exponent; `None` when no sample qualified
    pub shear_alpha: Option<f64>,
    pub original_count: usize,
    pub filtered_count: usize,
}

/// Run the full cleaning pipeline
pub fn filter(series: &MetSeries, options: &FilterOptions) -> FilterReport {
    let original_count = series.len();
    let mut current = series.clone();

    if options.remove_tower_shadow {
        current = filter_tower_shadow(&current, options.tower_shadow_offset_deg);
        debug!(station = %current.station, "tower shadow correction applied");
    }

    if options.remove_icing {
        if current.has_temperature() {
            let before = current.len();
            current = filter_icing(&current, options.icing_max_temperature);
            debug!(
                station = %current.station,
                removed = before - current.len(),
                "icing filter applied"
            );
        } else {
            debug!(station = %current.station, "no temperature data, icing filter skipped");
        }
    }

    if options.remove_high_std {
        let before = current.len();
        current = filter_rolling_std(&current, options.std_window, options.max_std);
        debug!(
            station = %current.station,
            removed = before - current.len(),
            window = options.std_window,
            "rolling std filter applied"
        );
    }

    let shear = extrapolate_shear(
        &current,
        options.reference_height,
        options.target_height,
        options.default_shear_alpha,
    );

    FilterReport {
        filtered_count: current.len(),
        series: current,
        extrapolated_speed: shear.extrapolated,
        shear_alpha: shear.alpha,
        original_count,
    }
}
