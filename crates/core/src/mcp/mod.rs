//! Measure-Correlate-Predict
//!
//! Transfers the wind climate of a long-running reference station to a
//! target site from a period of concurrent measurement. Three
//! interchangeable estimators produce a linear relation
//! `target = slope × reference + intercept`:
//!
//! - [`McpMethod::Orthogonal`]: total least squares on the raw pairs
//! - [`McpMethod::Bins`]: least squares through per-bin means
//! - [`McpMethod::Matrix`]: per-sector ratio correction then global least squares
//!
//! [`run`] fits the chosen estimator globally and per direction sector, and
//! summarises the sector residuals as an uncertainty estimate.

mod regression;
mod sector;
mod series;

pub use regression::{
    matrix_last_ws, method_of_bins, ordinary_least_squares, orthogonal_regression,
    RegressionResult,
};
pub use sector::{sector_analysis, SectorResult, MIN_SECTOR_SAMPLES};
pub use series::PairedSeries;

use crate::core_types::met::MetSeries;
use crate::error::{Result, SitingError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{info, warn};

/// Minimum number of sectors with a result for the uncertainty summary
pub const MIN_RESULT_SECTORS: usize = 2;

/// Correlation estimator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum McpMethod {
    /// Total-least-squares regression
    #[default]
    #[serde(alias = "orthogonal_regression")]
    Orthogonal,
    /// Method of bins
    #[serde(alias = "method_of_bins")]
    Bins,
    /// Sectoral speed-ratio matrix
    #[serde(alias = "matrix_last_ws")]
    Matrix,
}

impl McpMethod {
    /// Lenient selector: unknown names fall back to [`McpMethod::Orthogonal`]
    ///
    /// The fallback is logged at `warn` level so caller typos stay visible.
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            warn!(method = name, "unknown MCP method, using orthogonal regression");
            Self::Orthogonal
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Orthogonal => "orthogonal",
            Self::Bins => "bins",
            Self::Matrix => "matrix",
        }
    }
}

impl FromStr for McpMethod {
    type Err = SitingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "orthogonal" | "orthogonal_regression" => Ok(Self::Orthogonal),
            "bins" | "method_of_bins" => Ok(Self::Bins),
            "matrix" | "matrix_last_ws" => Ok(Self::Matrix),
            _ => Err(SitingError::UnknownSelector {
                kind: "MCP method",
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for McpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// MCP configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct McpConfig {
    pub reference_station: String,
    pub target_station: String,
    pub method: McpMethod,
    /// Number of direction sectors (each 360/n degrees wide)
    pub sectors: usize,
    /// Bin count for the method of bins
    pub n_bins: usize,
    /// Reported alongside results; does not alter the estimators
    pub confidence_level: f64,
}

impl Default for McpConfig {
    fn default() -> Self {
        Self {
            reference_station: String::new(),
            target_station: String::new(),
            method: McpMethod::Orthogonal,
            sectors: 12,
            n_bins: 10,
            confidence_level: 0.95,
        }
    }
}

/// Summary of sector residual statistics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UncertaintySummary {
    pub mean_uncertainty: f64,
    pub max_uncertainty: f64,
    pub min_correlation: f64,
    pub global_correlation: f64,
}

/// Full MCP outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McpResult {
    pub method: McpMethod,
    pub global: RegressionResult,
    pub sectors: Vec<SectorResult>,
    /// `slope × reference + intercept` for every concurrent sample
    pub predicted: Vec<f64>,
    pub uncertainty: UncertaintySummary,
    pub confidence_level: f64,
}

impl McpResult {
    /// Apply the global relation to a reference record
    pub fn predict(&self, reference_speeds: &[f64]) -> Vec<f64> {
        reference_speeds.iter().map(|&r| self.global.predict(r)).collect()
    }

    /// Apply each sample's sector relation, or the global one when its
    /// sector produced no result
    pub fn predict_by_sector(&self, reference: &MetSeries) -> Vec<f64> {
        reference
            .samples
            .iter()
            .map(|sample| {
                let d = sample.wind_direction;
                self.sectors
                    .iter()
                    .find(|s| d >= s.dir_min && d < s.dir_max)
                    .map_or_else(
                        || self.global.predict(sample.wind_speed),
                        |s| s.slope * sample.wind_speed + s.intercept,
                    )
            })
            .collect()
    }
}

/// Dispatch to the selected estimator on already-validated pairs
pub(crate) fn estimate(paired: &PairedSeries, method: McpMethod, config: &McpConfig) -> RegressionResult {
    match method {
        McpMethod::Orthogonal => orthogonal_regression(&paired.reference_speed, &paired.target_speed),
        McpMethod::Bins => method_of_bins(&paired.reference_speed, &paired.target_speed, config.n_bins),
        McpMethod::Matrix => matrix_last_ws(
            &paired.reference_speed,
            &paired.target_speed,
            &paired.reference_direction,
            config.sectors,
        ),
    }
}

/// Fit a relation between two aligned speed series
///
/// Uses default bin and sector counts. Without direction data the matrix
/// method places every sample in sector 0.
///
/// # Errors
/// - [`SitingError::EmptySeries`] when both series are empty
/// - [`SitingError::LengthMismatch`] when their lengths differ
pub fn fit(reference: &[f64], target: &[f64], method: McpMethod) -> Result<RegressionResult> {
    series::check_lengths(reference.len(), target.len())?;
    let paired = PairedSeries {
        reference_speed: reference.to_vec(),
        target_speed: target.to_vec(),
        reference_direction: vec![0.0; reference.len()],
    };
    Ok(estimate(&paired, method, &McpConfig::default()))
}

/// Fit `config.method` to already-paired samples
pub fn fit_paired(paired: &PairedSeries, config: &McpConfig) -> RegressionResult {
    estimate(paired, config.method, config)
}

/// Global fit, sector analysis, prediction and uncertainty summary
///
/// # Errors
/// - [`SitingError::EmptySeries`] for empty input
/// - [`SitingError::LengthMismatch`] when the speed or direction columns differ in length
/// - [`SitingError::InsufficientSectors`] when fewer than two sectors hold
///   enough samples to summarise
pub fn run(paired: &PairedSeries, config: &McpConfig) -> Result<McpResult> {
    paired.validate()?;

    let method = config.method;
    let global = estimate(paired, method, config);
    let sectors = sector_analysis(paired, method, config);

    if sectors.len() < MIN_RESULT_SECTORS {
        return Err(SitingError::InsufficientSectors {
            found: sectors.len(),
            required: MIN_RESULT_SECTORS,
        });
    }

    let predicted = paired
        .reference_speed
        .iter()
        .map(|&r| global.predict(r))
        .collect();

    let n = sectors.len() as f64;
    let uncertainty = UncertaintySummary {
        mean_uncertainty: sectors.iter().map(|s| s.uncertainty).sum::<f64>() / n,
        max_uncertainty: sectors.iter().map(|s| s.uncertainty).fold(f64::NEG_INFINITY, f64::max),
        min_correlation: sectors.iter().map(|s| s.correlation).fold(f64::INFINITY, f64::min),
        global_correlation: global.correlation,
    };

    info!(
        method = %method,
        reference = %config.reference_station,
        target = %config.target_station,
        samples = paired.len(),
        sectors = sectors.len(),
        slope = global.slope,
        intercept = global.intercept,
        correlation = global.correlation,
        "MCP correlation complete"
    );

    Ok(McpResult {
        method,
        global,
        sectors,
        predicted,
        uncertainty,
        confidence_level: config.confidence_level,
    })
}

/// Align two station records on timestamp and [`run`]
///
/// # Errors
/// [`SitingError::EmptySeries`] when no timestamps overlap, otherwise as [`run`].
pub fn run_series(reference: &MetSeries, target: &MetSeries, config: &McpConfig) -> Result<McpResult> {
    let paired = PairedSeries::align(reference, target)?;
    run(&paired, config)
}
