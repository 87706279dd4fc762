//! Directional frequency distribution

use crate::core_types::met::MetSeries;
use serde::{Deserialize, Serialize};

/// Fraction of time the wind blows from each of `n` equal sectors
///
/// Sector `s` spans `[s·360/n, (s+1)·360/n)`. Frequencies sum to 1 unless
/// the rose was built from an empty series, in which case it is uniform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindRose {
    frequencies: Vec<f64>,
}

impl WindRose {
    /// Equal frequency in every sector
    pub fn uniform(n_sectors: usize) -> Self {
        let n = n_sectors.max(1);
        Self {
            frequencies: vec![1.0 / n as f64; n],
        }
    }

    /// Normalise arbitrary non-negative weights
    ///
    /// Negative and non-finite weights count as zero. All-zero weights give
    /// a uniform rose.
    pub fn from_weights(weights: &[f64]) -> Self {
        let cleaned: Vec<f64> = weights
            .iter()
            .map(|&w| if w.is_finite() && w > 0.0 { w } else { 0.0 })
            .collect();
        let total: f64 = cleaned.iter().sum();
        if total <= 0.0 {
            return Self::uniform(weights.len());
        }
        Self {
            frequencies: cleaned.into_iter().map(|w| w / total).collect(),
        }
    }

    /// Count sample directions per sector
    pub fn from_series(series: &MetSeries, n_sectors: usize) -> Self {
        let n = n_sectors.max(1);
        let mut counts = vec![0.0; n];
        for sample in &series.samples {
            counts[sample.sector(n)] += 1.0;
        }
        Self::from_weights(&counts)
    }

    pub fn n_sectors(&self) -> usize {
        self.frequencies.len()
    }

    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    /// Width of one sector (degrees)
    pub fn sector_width(&self) -> f64 {
        360.0 / self.frequencies.len() as f64
    }
}

impl Default for WindRose {
    fn default() -> Self {
        Self::uniform(12)
    }
}
