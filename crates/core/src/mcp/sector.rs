//! Direction-sector decomposition of the correlation

use super::series::PairedSeries;
use super::{estimate, McpConfig, McpMethod};
use serde::{Deserialize, Serialize};

/// Sectors with fewer concurrent samples are left out of the analysis
pub const MIN_SECTOR_SAMPLES: usize = 10;

/// Relation fitted within one direction sector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorResult {
    /// Sector index (0-based from north)
    pub sector: usize,
    /// Inclusive lower bound (degrees)
    pub dir_min: f64,
    /// Exclusive upper bound (degrees)
    pub dir_max: f64,
    pub slope: f64,
    pub intercept: f64,
    pub correlation: f64,
    /// Standard deviation of the sector's residuals (m/s)
    pub uncertainty: f64,
    pub n_samples: usize,
}

/// Fit `method` separately in each of `config.sectors` direction sectors
///
/// Sectors holding fewer than [`MIN_SECTOR_SAMPLES`] samples are absent
/// from the output rather than reported with degenerate statistics.
pub fn sector_analysis(paired: &PairedSeries, method: McpMethod, config: &McpConfig) -> Vec<SectorResult> {
    let n_sectors = config.sectors.max(1);
    let width = 360.0 / n_sectors as f64;

    (0..n_sectors)
        .filter_map(|sector| {
            let dir_min = sector as f64 * width;
            let dir_max = (sector + 1) as f64 * width;
            let subset = paired.subset_by_direction(dir_min, dir_max);
            if subset.len() < MIN_SECTOR_SAMPLES {
                return None;
            }

            let fit = estimate(&subset, method, config);
            let uncertainty = fit.residual_std(&subset.reference_speed, &subset.target_speed);

            Some(SectorResult {
                sector,
                dir_min,
                dir_max,
                slope: fit.slope,
                intercept: fit.intercept,
                correlation: fit.correlation,
                uncertainty,
                n_samples: subset.len(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_sectors_are_skipped() {
        // 12 samples in sector 0, 9 in sector 3, none elsewhere
        let mut reference = Vec::new();
        let mut target = Vec::new();
        let mut directions = Vec::new();
        for i in 0..12 {
            reference.push(4.0 + f64::from(i));
            target.push(5.0 + f64::from(i));
            directions.push(15.0);
        }
        for i in 0..9 {
            reference.push(4.0 + f64::from(i));
            target.push(4.0 + f64::from(i));
            directions.push(100.0);
        }
        let paired = PairedSeries::new(reference, target, directions).unwrap();

        let sectors = sector_analysis(&paired, McpMethod::Orthogonal, &McpConfig::default());
        assert_eq!(sectors.len(), 1);
        assert_eq!(sectors[0].sector, 0);
        assert_eq!(sectors[0].n_samples, 12);
        assert_eq!((sectors[0].dir_min, sectors[0].dir_max), (0.0, 30.0));
        assert!((sectors[0].intercept - 1.0).abs() < 1e-9);
        assert!(sectors[0].uncertainty < 1e-9);
    }
}
