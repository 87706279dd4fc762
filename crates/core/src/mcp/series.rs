//! Concurrent reference/target records

use crate::core_types::met::MetSeries;
use crate::core_types::vec2::wrap_degrees;
use crate::error::{Result, SitingError};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Reference and target speeds observed at the same instants
///
/// Direction sectors are keyed on the reference station's direction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PairedSeries {
    pub reference_speed: Vec<f64>,
    pub target_speed: Vec<f64>,
    pub reference_direction: Vec<f64>,
}

impl PairedSeries {
    /// Pair pre-aligned columns
    ///
    /// # Errors
    /// - [`SitingError::EmptySeries`] when both speed columns are empty
    /// - [`SitingError::LengthMismatch`] when any column length differs
    pub fn new(
        reference_speed: Vec<f64>,
        target_speed: Vec<f64>,
        reference_direction: Vec<f64>,
    ) -> Result<Self> {
        check_lengths(reference_speed.len(), target_speed.len())?;
        check_lengths(reference_speed.len(), reference_direction.len())?;
        Ok(Self {
            reference_speed,
            target_speed,
            reference_direction: reference_direction.into_iter().map(wrap_degrees).collect(),
        })
    }

    /// Inner-join two station records on identical timestamps
    ///
    /// Duplicate timestamps keep the last observation of each station.
    /// Output is in ascending time order.
    ///
    /// # Errors
    /// [`SitingError::EmptySeries`] when the stations share no timestamp.
    pub fn align(reference: &MetSeries, target: &MetSeries) -> Result<Self> {
        let target_by_time: BTreeMap<DateTime<Utc>, f64> = target
            .samples
            .iter()
            .map(|s| (s.timestamp, s.wind_speed))
            .collect();
        let reference_by_time: BTreeMap<DateTime<Utc>, (f64, f64)> = reference
            .samples
            .iter()
            .map(|s| (s.timestamp, (s.wind_speed, s.wind_direction)))
            .collect();

        let mut paired = Self::default();
        for (timestamp, (speed, direction)) in &reference_by_time {
            if let Some(&target_speed) = target_by_time.get(timestamp) {
                paired.reference_speed.push(*speed);
                paired.reference_direction.push(*direction);
                paired.target_speed.push(target_speed);
            }
        }

        if paired.is_empty() {
            return Err(SitingError::EmptySeries);
        }
        Ok(paired)
    }

    /// Re-check column lengths, for pairs assembled field by field
    ///
    /// # Errors
    /// Same as [`PairedSeries::new`].
    pub fn validate(&self) -> Result<()> {
        check_lengths(self.reference_speed.len(), self.target_speed.len())?;
        check_lengths(self.reference_speed.len(), self.reference_direction.len())
    }

    pub fn len(&self) -> usize {
        self.reference_speed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reference_speed.is_empty()
    }

    /// Rows whose reference direction lies in `[dir_min, dir_max)`
    pub fn subset_by_direction(&self, dir_min: f64, dir_max: f64) -> Self {
        let mut subset = Self::default();
        let rows = self
            .reference_speed
            .iter()
            .zip(&self.target_speed)
            .zip(&self.reference_direction);
        for ((&reference, &target), &d) in rows {
            if d >= dir_min && d < dir_max {
                subset.reference_speed.push(reference);
                subset.target_speed.push(target);
                subset.reference_direction.push(d);
            }
        }
        subset
    }
}

pub(crate) fn check_lengths(reference: usize, target: usize) -> Result<()> {
    if reference == 0 && target == 0 {
        return Err(SitingError::EmptySeries);
    }
    if reference != target {
        return Err(SitingError::LengthMismatch { reference, target });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::met::MetSample;
    use chrono::TimeDelta;

    fn at(minutes: i64, speed: f64, direction: f64) -> MetSample {
        MetSample::new(
            DateTime::<Utc>::UNIX_EPOCH + TimeDelta::minutes(minutes),
            speed,
            direction,
        )
    }

    #[test]
    fn test_new_checks_lengths() {
        assert_eq!(
            PairedSeries::new(vec![], vec![], vec![]),
            Err(SitingError::EmptySeries)
        );
        assert_eq!(
            PairedSeries::new(vec![1.0, 2.0], vec![1.0], vec![0.0, 0.0]),
            Err(SitingError::LengthMismatch {
                reference: 2,
                target: 1
            })
        );
    }

    #[test]
    fn test_validate_catches_short_direction_column() {
        let paired = PairedSeries {
            reference_speed: vec![5.0, 6.0, 7.0],
            target_speed: vec![5.5, 6.5, 7.5],
            reference_direction: vec![90.0],
        };
        assert_eq!(
            paired.validate(),
            Err(SitingError::LengthMismatch {
                reference: 3,
                target: 1
            })
        );
        assert_eq!(paired.subset_by_direction(0.0, 360.0).len(), 1);
    }

    #[test]
    fn test_align_on_shared_timestamps() {
        let reference = MetSeries::new(
            "ref",
            600.0,
            vec![at(0, 5.0, 90.0), at(10, 6.0, 100.0), at(20, 7.0, 110.0)],
        );
        let target = MetSeries::new("site", 600.0, vec![at(20, 8.0, 0.0), at(10, 6.5, 0.0), at(30, 1.0, 0.0)]);

        let paired = PairedSeries::align(&reference, &target).unwrap();
        assert_eq!(paired.reference_speed, vec![6.0, 7.0]);
        assert_eq!(paired.target_speed, vec![6.5, 8.0]);
        assert_eq!(paired.reference_direction, vec![100.0, 110.0]);
    }

    #[test]
    fn test_align_without_overlap_fails() {
        let reference = MetSeries::new("ref", 600.0, vec![at(0, 5.0, 90.0)]);
        let target = MetSeries::new("site", 600.0, vec![at(10, 5.0, 90.0)]);
        assert_eq!(
            PairedSeries::align(&reference, &target),
            Err(SitingError::EmptySeries)
        );
    }

    #[test]
    fn test_subset_by_direction() {
        let paired = PairedSeries::new(
            vec![1.0, 2.0, 3.0],
            vec![1.0, 2.0, 3.0],
            vec![10.0, 30.0, 29.99],
        )
        .unwrap();
        let subset = paired.subset_by_direction(0.0, 30.0);
        assert_eq!(subset.reference_speed, vec![1.0, 3.0]);
    }
}
