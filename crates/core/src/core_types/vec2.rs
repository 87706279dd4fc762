//! Vector type alias for planar turbine and sample positions.

use nalgebra::Vector2;

/// 2D vector type for positions and offsets in metres.
///
/// This is a simple alias for `nalgebra::Vector2<f64>`, used throughout
/// the crate for turbine coordinates (UTM easting/northing), wake sample
/// points and layout candidates.
pub type Vec2 = Vector2<f64>;

/// Wrap a compass direction into [0, 360).
#[inline]
pub fn wrap_degrees(direction: f64) -> f64 {
    let wrapped = direction.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Sector index of a direction for `n_sectors` equal slices starting at 0°.
#[inline]
pub fn sector_index(direction: f64, n_sectors: usize) -> usize {
    if n_sectors == 0 {
        return 0;
    }
    let width = 360.0 / n_sectors as f64;
    ((wrap_degrees(direction) / width).floor() as usize) % n_sectors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_degrees() {
        assert_eq!(wrap_degrees(370.0), 10.0);
        assert_eq!(wrap_degrees(-10.0), 350.0);
        assert_eq!(wrap_degrees(360.0), 0.0);
        assert!(wrap_degrees(-1e-20) < 360.0);
    }

    #[test]
    fn test_sector_index() {
        assert_eq!(sector_index(0.0, 12), 0);
        assert_eq!(sector_index(29.9, 12), 0);
        assert_eq!(sector_index(30.0, 12), 1);
        assert_eq!(sector_index(359.9, 12), 11);
        assert_eq!(sector_index(-15.0, 12), 11);
    }
}
