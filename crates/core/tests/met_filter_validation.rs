//! Met-mast cleaning pipeline: stage behaviour and row accounting

use approx::assert_abs_diff_eq;
use chrono::{DateTime, TimeDelta, Utc};
use windsite_core::met_filter::{filter, rolling_std, FilterOptions, TOWER_SHADOW_FACTOR};
use windsite_core::{MetRecord, MetSample, MetSeries, SitingError};

fn timestamp(i: usize) -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH + TimeDelta::minutes(10 * i as i64)
}

fn steady_series(speeds: &[f64], direction: f64) -> MetSeries {
    let samples = speeds
        .iter()
        .enumerate()
        .map(|(i, &u)| MetSample::new(timestamp(i), u, direction))
        .collect();
    MetSeries::new("mast", 600.0, samples)
}

fn only(stage: &str) -> FilterOptions {
    FilterOptions {
        remove_tower_shadow: stage == "shadow",
        remove_icing: stage == "icing",
        remove_high_std: stage == "std",
        ..FilterOptions::default()
    }
}

#[test]
fn test_tower_shadow_wraps_north() {
    let t = timestamp(0);
    let series = MetSeries::new(
        "mast",
        600.0,
        vec![
            MetSample::new(t, 10.0, 359.0),
            MetSample::new(timestamp(1), 10.0, 1.0),
            MetSample::new(timestamp(2), 10.0, 180.0),
        ],
    );

    let report = filter(&series, &only("shadow"));

    // Shadowed rows are rescaled, never removed
    assert_eq!(report.filtered_count, 3);
    let speeds = report.series.speeds();
    assert_abs_diff_eq!(speeds[0], 10.0 * TOWER_SHADOW_FACTOR, epsilon = 1e-12);
    assert_abs_diff_eq!(speeds[1], 10.0 * TOWER_SHADOW_FACTOR, epsilon = 1e-12);
    assert_abs_diff_eq!(speeds[2], 10.0, epsilon = 1e-12);
}

#[test]
fn test_icing_signature_removes_calm_freezing_rows() {
    let rows = [
        (0.0, 0.5),   // iced
        (0.0, 5.0),   // turning anemometer
        (-10.0, 0.5), // too cold for the signature
        (2.0, 0.5),   // upper bound is exclusive
        (1.9, 0.99),  // iced
    ];
    let samples = rows
        .iter()
        .enumerate()
        .map(|(i, &(temp, speed))| MetSample::new(timestamp(i), speed, 180.0).with_temperature(temp))
        .collect();
    let series = MetSeries::new("mast", 600.0, samples);

    let report = filter(&series, &only("icing"));

    assert_eq!(report.original_count, 5);
    assert_eq!(report.filtered_count, 3);
    let kept: Vec<f64> = report.series.samples.iter().filter_map(|s| s.temperature).collect();
    assert_eq!(kept, vec![0.0, -10.0, 2.0]);
}

#[test]
fn test_icing_skipped_without_temperature() {
    let series = steady_series(&[0.2, 0.3, 0.1], 180.0);
    let report = filter(&series, &only("icing"));
    assert_eq!(report.filtered_count, 3);
}

#[test]
fn test_single_outlier_removes_overlapping_windows() {
    // Window 10 centres row i on rows [i - 5, i + 4]; an outlier at row 20
    // therefore lands in the windows of rows 16..=25.
    let mut speeds = vec![8.0; 40];
    speeds[20] = 60.0;
    let series = steady_series(&speeds, 90.0);

    let report = filter(&series, &only("std"));

    assert_eq!(report.filtered_count, 30);
    let removed: Vec<DateTime<Utc>> = (16..=25).map(timestamp).collect();
    assert!(report
        .series
        .samples
        .iter()
        .all(|s| !removed.contains(&s.timestamp)));
}

#[test]
fn test_edge_rows_without_full_window_are_kept() {
    let mut speeds = vec![8.0; 40];
    speeds[2] = 60.0;
    let series = steady_series(&speeds, 90.0);

    let stds = rolling_std(&series.speeds(), 10);
    assert!(stds[..5].iter().all(Option::is_none));
    assert!(stds[36..].iter().all(Option::is_none));

    // Rows 0..5 have no window; only rows 5, 6 and 7 see the outlier
    let report = filter(&series, &only("std"));
    assert_eq!(report.filtered_count, 37);
    assert!(report.series.samples.iter().any(|s| s.wind_speed == 60.0));
}

#[test]
fn test_pipeline_row_count_never_grows() {
    let mut samples = Vec::new();
    for i in 0..200 {
        let speed = if i % 37 == 0 { 25.0 } else { 6.0 + (i % 5) as f64 * 0.2 };
        let temp = if i % 11 == 0 { 0.5 } else { 8.0 };
        let speed = if i % 11 == 0 { 0.4 } else { speed };
        samples.push(MetSample::new(timestamp(i), speed, (i * 7) as f64).with_temperature(temp));
    }
    let series = MetSeries::new("mast", 600.0, samples);

    let report = filter(&series, &FilterOptions::default());

    assert!(report.filtered_count <= report.original_count);
    assert_eq!(report.filtered_count, report.series.len());
    assert_eq!(report.extrapolated_speed.len(), report.filtered_count);
    assert!(report
        .series
        .samples
        .iter()
        .zip(&report.extrapolated_speed)
        .all(|(s, &u)| u >= s.wind_speed));
}

#[test]
fn test_shear_extrapolates_to_hub_height() {
    let series = steady_series(&[5.0; 20], 90.0);
    let report = filter(&series, &FilterOptions::default());

    assert_eq!(report.shear_alpha, Some(0.15));
    let expected = 5.0 * (80.0_f64 / 10.0).powf(0.15);
    for &u in &report.extrapolated_speed {
        assert_abs_diff_eq!(u, expected, epsilon = 1e-9);
    }
}

#[test]
fn test_records_require_speed_and_direction() {
    let records = vec![
        MetRecord {
            timestamp: Some(timestamp(0)),
            wind_speed: Some(5.0),
            wind_direction: Some(370.0),
            ..MetRecord::default()
        },
        MetRecord {
            wind_speed: Some(6.0),
            wind_direction: Some(10.0),
            ..MetRecord::default()
        },
    ];
    let series = MetSeries::from_records("mast", 600.0, &records).unwrap();
    assert_abs_diff_eq!(series.samples[0].wind_direction, 10.0, epsilon = 1e-12);
    assert_eq!(series.samples[1].timestamp, timestamp(1));

    let missing = vec![MetRecord {
        timestamp: Some(timestamp(0)),
        wind_speed: Some(5.0),
        ..MetRecord::default()
    }];
    let err = MetSeries::from_records("mast", 600.0, &missing).unwrap_err();
    assert_eq!(
        err,
        SitingError::MissingField {
            field: "wind_direction",
            row: 0
        }
    );

    let negative = vec![MetRecord {
        wind_speed: Some(-1.0),
        wind_direction: Some(0.0),
        ..MetRecord::default()
    }];
    assert!(matches!(
        MetSeries::from_records("mast", 600.0, &negative),
        Err(SitingError::InvalidValue { field: "wind_speed", .. })
    ));
}
