//! Lattice layouts
//!
//! Rows run along y, columns along x. A staggered lattice shifts every odd
//! row by half a column spacing:
//!
//! ```text
//! row 2   o     o     o
//! row 1      o     o     o
//! row 0   o     o     o
//! ```

use super::{Layout, LayoutBounds};
use crate::core_types::vec2::Vec2;
use serde::{Deserialize, Serialize};

/// Default columns-to-rows shape factor for [`optimize_grid`]
pub const DEFAULT_ASPECT_RATIO: f64 = 1.5;

/// Row/column counts, spacing and origin of a lattice
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    pub n_rows: usize,
    pub n_cols: usize,
    pub spacing_x: f64,
    pub spacing_y: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl GridSpec {
    pub fn new(n_rows: usize, n_cols: usize, spacing_x: f64, spacing_y: f64) -> Self {
        Self {
            n_rows,
            n_cols,
            spacing_x,
            spacing_y,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }

    pub fn with_offset(mut self, offset_x: f64, offset_y: f64) -> Self {
        self.offset_x = offset_x;
        self.offset_y = offset_y;
        self
    }

    fn positions(&self, stagger: bool) -> Vec<Vec2> {
        let mut positions = Vec::with_capacity(self.n_rows * self.n_cols);
        for row in 0..self.n_rows {
            let shift = if stagger && row % 2 == 1 {
                0.5 * self.spacing_x
            } else {
                0.0
            };
            for col in 0..self.n_cols {
                positions.push(Vec2::new(
                    self.offset_x + col as f64 * self.spacing_x + shift,
                    self.offset_y + row as f64 * self.spacing_y,
                ));
            }
        }
        positions
    }
}

/// Rectangular lattice, row-major from the offset corner
pub fn grid(spec: &GridSpec) -> Layout {
    Layout::new("grid", spec.positions(false))
}

/// Brick-offset lattice
pub fn staggered(spec: &GridSpec) -> Layout {
    Layout::new("staggered", spec.positions(true))
}

/// Staggered lattice sized to fit `n_turbines` inside `bounds`
///
/// ```text
/// n_cols  = max(1, floor(sqrt(n / aspect_ratio)))
/// n_rows  = ceil(n / n_cols)
/// spacing = min(width / (n_cols + 1), height / (n_rows + 1))
/// ```
///
/// Rows are `0.8 · spacing` apart and the lattice starts one spacing inside
/// the bounds' minimum corner. Surplus lattice points are dropped so exactly
/// `n_turbines` positions are returned.
pub fn optimize_grid(n_turbines: usize, bounds: &LayoutBounds, aspect_ratio: f64) -> Layout {
    if n_turbines == 0 {
        return Layout::new("optimized_grid", Vec::new());
    }

    let aspect = if aspect_ratio > 0.0 { aspect_ratio } else { DEFAULT_ASPECT_RATIO };
    let n_cols = ((n_turbines as f64 / aspect).sqrt().floor() as usize).max(1);
    let n_rows = n_turbines.div_ceil(n_cols);

    let spacing_x = bounds.width() / (n_cols + 1) as f64;
    let spacing_y = bounds.height() / (n_rows + 1) as f64;
    let spacing = spacing_x.min(spacing_y);

    let spec = GridSpec::new(n_rows, n_cols, spacing, 0.8 * spacing)
        .with_offset(bounds.min_x + spacing, bounds.min_y + spacing);
    let mut positions = spec.positions(true);
    positions.truncate(n_turbines);

    Layout::new("optimized_grid", positions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_grid_positions() {
        let layout = grid(&GridSpec::new(3, 3, 500.0, 500.0));
        assert_eq!(layout.len(), 9);
        assert_eq!(layout.turbines[0], Vec2::new(0.0, 0.0));
        assert_eq!(layout.turbines[4], Vec2::new(500.0, 500.0));
        assert_eq!(layout.turbines[8], Vec2::new(1000.0, 1000.0));
        assert_abs_diff_eq!(layout.min_spacing().unwrap(), 500.0);
    }

    #[test]
    fn test_staggered_offsets_odd_rows() {
        let layout = staggered(&GridSpec::new(2, 2, 400.0, 300.0).with_offset(10.0, 20.0));
        assert_eq!(
            layout.turbines,
            vec![
                Vec2::new(10.0, 20.0),
                Vec2::new(410.0, 20.0),
                Vec2::new(210.0, 320.0),
                Vec2::new(610.0, 320.0),
            ]
        );
        assert_eq!(layout.name, "staggered");
    }

    #[test]
    fn test_optimize_grid_counts() {
        let bounds = LayoutBounds::new(0.0, 6000.0, 0.0, 4000.0).unwrap();
        for n in [1, 5, 7, 12, 20] {
            let layout = optimize_grid(n, &bounds, DEFAULT_ASPECT_RATIO);
            assert_eq!(layout.len(), n);
        }
        assert!(optimize_grid(0, &bounds, DEFAULT_ASPECT_RATIO).is_empty());
    }

    #[test]
    fn test_optimize_grid_geometry() {
        // 12 turbines: 2 columns, 6 rows, spacing min(3000/3, 4000/7)
        let bounds = LayoutBounds::new(1000.0, 4000.0, 0.0, 4000.0).unwrap();
        let layout = optimize_grid(12, &bounds, DEFAULT_ASPECT_RATIO);
        let spacing = 4000.0 / 7.0;
        assert_abs_diff_eq!(layout.turbines[0].x, 1000.0 + spacing, epsilon = 1e-9);
        assert_abs_diff_eq!(layout.turbines[0].y, spacing, epsilon = 1e-9);
        assert_abs_diff_eq!(layout.turbines[2].y - layout.turbines[0].y, 0.8 * spacing, epsilon = 1e-9);
        assert_abs_diff_eq!(layout.turbines[2].x - layout.turbines[0].x, 0.5 * spacing, epsilon = 1e-9);
    }
}
