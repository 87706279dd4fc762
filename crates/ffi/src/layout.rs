//! Layout generation entry points.

use windsite_core::layout::{optimize_grid, LayoutBounds, DEFAULT_ASPECT_RATIO};

use crate::error::{DefaultSitingError, SitingErrorCode};
use crate::helpers::{handle_ffi_result, output_slice, write_out};

/// C-compatible layout statistics.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WindsiteLayoutMetrics {
    pub n_turbines: usize,
    /// Bounding-box area (square kilometers)
    pub area_km2: f64,
    /// Mean pairwise distance (meters)
    pub avg_distance_m: f64,
    /// Smallest pairwise distance (meters)
    pub min_distance_m: f64,
    /// Largest pairwise distance (meters)
    pub max_distance_m: f64,
    /// Turbines per square kilometer
    pub density_turbines_km2: f64,
}

/// Place `n_turbines` on a staggered lattice inside the bounds.
///
/// # Arguments
/// * `n_turbines` - Number of positions to generate
/// * `min_x`, `max_x`, `min_y`, `max_y` - Area bounds (meters)
/// * `out_xy` - Receives interleaved `x, y` pairs (`2 * n_turbines` values)
/// * `capacity` - Length of `out_xy` in `f64` elements
/// * `out_metrics` - Optional; receives layout statistics when non-null
///
/// # Safety
/// `out_xy` must reference `capacity` writable values and `out_metrics`, when
/// non-null, must be valid for writes.
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn windsite_layout_optimize_grid(
    n_turbines: usize,
    min_x: f64,
    max_x: f64,
    min_y: f64,
    max_y: f64,
    out_xy: *mut f64,
    capacity: usize,
    out_metrics: *mut WindsiteLayoutMetrics,
) -> SitingErrorCode {
    handle_ffi_result(|| {
        let bounds = LayoutBounds::new(min_x, max_x, min_y, max_y)?;
        let required = n_turbines.checked_mul(2).ok_or_else(|| {
            DefaultSitingError::invalid_parameter(format!("n_turbines {n_turbines} overflows the coordinate buffer size"))
        })?;
        let out = unsafe { output_slice(out_xy, capacity, required, "out_xy") }?;

        let layout = optimize_grid(n_turbines, &bounds, DEFAULT_ASPECT_RATIO);
        for (pair, p) in out.chunks_exact_mut(2).zip(&layout.turbines) {
            pair[0] = p.x;
            pair[1] = p.y;
        }

        if !out_metrics.is_null() {
            let m = layout.metrics();
            let metrics = WindsiteLayoutMetrics {
                n_turbines: m.n_turbines,
                area_km2: m.area_km2,
                avg_distance_m: m.avg_distance_m,
                min_distance_m: m.min_distance_m,
                max_distance_m: m.max_distance_m,
                density_turbines_km2: m.density_turbines_km2,
            };
            unsafe { write_out(out_metrics, metrics, "out_metrics") }?;
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ptr;

    #[test]
    fn test_grid_positions_and_metrics() {
        let mut xy = [0.0; 20];
        let mut metrics = WindsiteLayoutMetrics::default();
        let code = unsafe {
            windsite_layout_optimize_grid(10, 0.0, 6000.0, 0.0, 4000.0, xy.as_mut_ptr(), xy.len(), &mut metrics)
        };
        assert_eq!(code, SitingErrorCode::Ok);
        assert_eq!(metrics.n_turbines, 10);
        assert!(metrics.min_distance_m > 0.0);
        assert!(xy.chunks_exact(2).all(|p| p[0] > 0.0 && p[0] < 6000.0 && p[1] > 0.0 && p[1] < 4000.0));
    }

    #[test]
    fn test_invalid_bounds() {
        let mut xy = [0.0; 4];
        let code =
            unsafe { windsite_layout_optimize_grid(2, 10.0, 0.0, 0.0, 10.0, xy.as_mut_ptr(), 4, ptr::null_mut()) };
        assert_eq!(code, SitingErrorCode::InvalidParameter);
    }

    #[test]
    fn test_turbine_count_overflow() {
        let mut xy = [0.0; 4];
        let code = unsafe {
            windsite_layout_optimize_grid(usize::MAX, 0.0, 6000.0, 0.0, 4000.0, xy.as_mut_ptr(), xy.len(), ptr::null_mut())
        };
        assert_eq!(code, SitingErrorCode::InvalidParameter);

        let n_turbines = usize::MAX / 2 + 1;
        let code = unsafe {
            windsite_layout_optimize_grid(n_turbines, 0.0, 6000.0, 0.0, 4000.0, xy.as_mut_ptr(), usize::MAX, ptr::null_mut())
        };
        assert_eq!(code, SitingErrorCode::InvalidParameter);
    }
}
