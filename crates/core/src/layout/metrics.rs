//! Geometric statistics of a layout

use crate::core_types::vec2::Vec2;
use serde::{Deserialize, Serialize};

/// Derived layout statistics
///
/// Distances are zero for layouts with fewer than two turbines, and the
/// density is zero whenever the bounding box has no area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutMetrics {
    pub n_turbines: usize,
    /// Bounding-box area
    pub area_m2: f64,
    pub area_km2: f64,
    pub avg_distance_m: f64,
    pub min_distance_m: f64,
    pub max_distance_m: f64,
    pub density_turbines_km2: f64,
}

impl LayoutMetrics {
    pub fn from_positions(positions: &[Vec2]) -> Self {
        let n = positions.len();
        let Some(first) = positions.first() else {
            return Self::default();
        };

        let (min, max) = positions.iter().fold((*first, *first), |(min, max), p| {
            (min.inf(p), max.sup(p))
        });
        let extent = max - min;
        let area_m2 = extent.x * extent.y;
        let area_km2 = area_m2 / 1e6;

        let mut count = 0usize;
        let mut sum = 0.0;
        let mut min_d = f64::INFINITY;
        let mut max_d: f64 = 0.0;
        for (i, a) in positions.iter().enumerate() {
            for b in &positions[i + 1..] {
                let d = (a - b).norm();
                count += 1;
                sum += d;
                min_d = min_d.min(d);
                max_d = max_d.max(d);
            }
        }

        let (avg_distance_m, min_distance_m, max_distance_m) = if count == 0 {
            (0.0, 0.0, 0.0)
        } else {
            (sum / count as f64, min_d, max_d)
        };

        Self {
            n_turbines: n,
            area_m2,
            area_km2,
            avg_distance_m,
            min_distance_m,
            max_distance_m,
            density_turbines_km2: if area_km2 > 0.0 { n as f64 / area_km2 } else { 0.0 },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_degenerate_layouts() {
        assert_eq!(LayoutMetrics::from_positions(&[]), LayoutMetrics::default());

        let single = LayoutMetrics::from_positions(&[Vec2::new(100.0, 100.0)]);
        assert_eq!(single.n_turbines, 1);
        assert_eq!(single.area_m2, 0.0);
        assert_eq!(single.avg_distance_m, 0.0);
        assert_eq!(single.density_turbines_km2, 0.0);
    }

    #[test]
    fn test_square_metrics() {
        let positions = [
            Vec2::new(0.0, 0.0),
            Vec2::new(1000.0, 0.0),
            Vec2::new(0.0, 1000.0),
            Vec2::new(1000.0, 1000.0),
        ];
        let m = LayoutMetrics::from_positions(&positions);
        assert_eq!(m.n_turbines, 4);
        assert_abs_diff_eq!(m.area_km2, 1.0);
        assert_abs_diff_eq!(m.min_distance_m, 1000.0);
        assert_abs_diff_eq!(m.max_distance_m, 1000.0 * 2.0_f64.sqrt(), epsilon = 1e-9);
        assert_abs_diff_eq!(m.avg_distance_m, (4000.0 + 2000.0 * 2.0_f64.sqrt()) / 6.0, epsilon = 1e-9);
        assert_abs_diff_eq!(m.density_turbines_km2, 4.0);
    }

    #[test]
    fn test_collinear_has_no_density() {
        let m = LayoutMetrics::from_positions(&[Vec2::new(0.0, 0.0), Vec2::new(500.0, 0.0)]);
        assert_eq!(m.area_m2, 0.0);
        assert_eq!(m.density_turbines_km2, 0.0);
        assert_eq!(m.min_distance_m, 500.0);
    }
}
