//! Individual cleaning stages
//!
//! Each stage consumes a series and returns a new one. Tower shadow rescales
//! speeds and never drops rows; icing and rolling-variance rejection drop
//! rows, so the row count is non-increasing through the pipeline.

use crate::core_types::met::MetSeries;
use crate::core_types::vec2::wrap_degrees;

/// Speed multiplier applied inside the tower-shadow band
pub const TOWER_SHADOW_FACTOR: f64 = 0.7;

/// Lower temperature bound of the icing signature (°C, exclusive)
pub const ICING_MIN_TEMPERATURE: f64 = -5.0;

/// Wind speed below which a near-freezing sample is treated as iced (m/s)
pub const ICING_MAX_SPEED: f64 = 1.0;

/// Whether a direction lies in the shadow band centred on 0°
///
/// The band is `[360 − offset, 360) ∪ [0, offset]` and wraps across north.
/// An offset of 180° or more covers the whole compass.
pub fn in_tower_shadow(direction: f64, offset_deg: f64) -> bool {
    if offset_deg >= 180.0 {
        return true;
    }
    let d = wrap_degrees(direction);
    d <= offset_deg || d >= 360.0 - offset_deg
}

/// De-weight speeds recorded in the tower-shadow band
///
/// Samples whose direction falls in the band keep their row but have their
/// wind speed multiplied by [`TOWER_SHADOW_FACTOR`]. This is a conservative
/// correction for mast-induced flow distortion, not a removal.
pub fn filter_tower_shadow(series: &MetSeries, offset_deg: f64) -> MetSeries {
    let samples = series
        .samples
        .iter()
        .map(|sample| {
            let mut sample = sample.clone();
            if in_tower_shadow(sample.wind_direction, offset_deg) {
                sample.wind_speed *= TOWER_SHADOW_FACTOR;
            }
            sample
        })
        .collect();
    series.with_samples(samples)
}

/// Icing signature: near-freezing temperature with a stalled anemometer
///
/// ```text
/// -5 °C < T < T_max  and  U < 1.0 m/s
/// ```
pub fn is_iced(temperature: f64, wind_speed: f64, max_temperature: f64) -> bool {
    temperature > ICING_MIN_TEMPERATURE && temperature < max_temperature && wind_speed < ICING_MAX_SPEED
}

/// Remove samples carrying the icing signature
///
/// Samples without a temperature are kept; iced anemometers produce
/// unusable readings, so matching rows are dropped rather than rescaled.
pub fn filter_icing(series: &MetSeries, max_temperature: f64) -> MetSeries {
    let samples = series
        .samples
        .iter()
        .filter(|s| {
            s.temperature
                .is_none_or(|t| !is_iced(t, s.wind_speed, max_temperature))
        })
        .cloned()
        .collect();
    series.with_samples(samples)
}

/// Centred rolling sample standard deviation
///
/// For window `w` the value at row `i` covers rows
/// `[i + (w−1)/2 + 1 − w, i + (w−1)/2]` (integer division), the same
/// alignment as a trailing window shifted back by half its length.
/// Rows where the full window does not fit, and windows shorter than two
/// samples, yield `None`.
pub fn rolling_std(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let n = values.len();
    if window < 2 || window > n {
        return vec![None; n];
    }
    let offset = (window - 1) / 2;

    (0..n)
        .map(|i| {
            let end = i + offset;
            if end >= n || end + 1 < window {
                return None;
            }
            let slice = &values[end + 1 - window..=end];
            let mean = slice.iter().sum::<f64>() / window as f64;
            let ss: f64 = slice.iter().map(|v| (v - mean).powi(2)).sum();
            Some((ss / (window - 1) as f64).sqrt())
        })
        .collect()
}

/// Drop samples whose local wind-speed variability exceeds `max_std`
///
/// Edge rows without a full window are never excluded.
pub fn filter_rolling_std(series: &MetSeries, window: usize, max_std: f64) -> MetSeries {
    let stds = rolling_std(&series.speeds(), window);
    let samples = series
        .samples
        .iter()
        .zip(stds)
        .filter(|(_, std)| std.is_none_or(|s| s <= max_std))
        .map(|(sample, _)| sample.clone())
        .collect();
    series.with_samples(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::met::MetSample;
    use chrono::{DateTime, Utc};

    fn series_from(speeds: &[f64], direction: f64) -> MetSeries {
        let t = DateTime::<Utc>::UNIX_EPOCH;
        MetSeries::new(
            "mast",
            600.0,
            speeds
                .iter()
                .map(|&s| MetSample::new(t, s, direction))
                .collect(),
        )
    }

    #[test]
    fn test_tower_shadow_band_wraps_north() {
        assert!(in_tower_shadow(359.0, 30.0));
        assert!(in_tower_shadow(1.0, 30.0));
        assert!(in_tower_shadow(30.0, 30.0));
        assert!(in_tower_shadow(330.0, 30.0));
        assert!(!in_tower_shadow(180.0, 30.0));
        assert!(!in_tower_shadow(31.0, 30.0));
        assert!(!in_tower_shadow(329.0, 30.0));
    }

    #[test]
    fn test_tower_shadow_rescales_without_removing() {
        let series = series_from(&[10.0, 10.0], 5.0);
        let out = filter_tower_shadow(&series, 30.0);
        assert_eq!(out.len(), 2);
        assert!((out.samples[0].wind_speed - 7.0).abs() < 1e-12);

        let series = series_from(&[10.0], 180.0);
        let out = filter_tower_shadow(&series, 30.0);
        assert_eq!(out.samples[0].wind_speed, 10.0);
    }

    #[test]
    fn test_icing_signature() {
        assert!(is_iced(0.0, 0.5, 2.0));
        assert!(!is_iced(0.0, 5.0, 2.0));
        assert!(!is_iced(-6.0, 0.5, 2.0));
        assert!(!is_iced(2.0, 0.5, 2.0));
    }

    #[test]
    fn test_icing_keeps_rows_without_temperature() {
        let t = DateTime::<Utc>::UNIX_EPOCH;
        let series = MetSeries::new(
            "mast",
            600.0,
            vec![
                MetSample::new(t, 0.5, 90.0).with_temperature(0.0),
                MetSample::new(t, 0.5, 90.0),
                MetSample::new(t, 5.0, 90.0).with_temperature(0.0),
            ],
        );
        let out = filter_icing(&series, 2.0);
        assert_eq!(out.len(), 2);
        assert!(out.samples[0].temperature.is_none());
        assert_eq!(out.samples[1].wind_speed, 5.0);
    }

    #[test]
    fn test_rolling_std_alignment() {
        // window 3: rows 0 and n-1 lack a full window
        let stds = rolling_std(&[1.0, 2.0, 3.0, 4.0], 3);
        assert_eq!(stds[0], None);
        assert!((stds[1].unwrap() - 1.0).abs() < 1e-12);
        assert!((stds[2].unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(stds[3], None);

        // window 4: offset 1, row i covers [i-2, i+1]
        let stds = rolling_std(&[0.0; 6], 4);
        assert_eq!(stds[0], None);
        assert_eq!(stds[1], None);
        assert_eq!(stds[2], Some(0.0));
        assert_eq!(stds[4], Some(0.0));
        assert_eq!(stds[5], None);
    }

    #[test]
    fn test_rolling_std_degenerate_windows() {
        assert!(rolling_std(&[1.0, 2.0], 1).iter().all(Option::is_none));
        assert!(rolling_std(&[1.0, 2.0], 5).iter().all(Option::is_none));
    }
}
