//! Meteorological mast observations
//!
//! A [`MetSeries`] is the ordered record of one station. Samples need not be
//! uniformly spaced, but rolling-window statistics downstream assume the
//! nominal sampling interval carried by the series.
//!
//! Filtering never mutates a series in place: every stage builds a new
//! `MetSeries` from the previous one.

use crate::core_types::vec2::{sector_index, wrap_degrees};
use crate::error::{Result, SitingError};
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// One time-stamped observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetSample {
    /// Observation time (UTC)
    pub timestamp: DateTime<Utc>,
    /// Wind speed (m/s, ≥ 0)
    pub wind_speed: f64,
    /// Direction the wind blows from (degrees, wrapped to [0, 360))
    pub wind_direction: f64,
    /// Air temperature (°C)
    pub temperature: Option<f64>,
    /// Station pressure (hPa)
    pub pressure: Option<f64>,
    /// Relative humidity (%)
    pub humidity: Option<f64>,
}

impl MetSample {
    /// Create a sample with only speed and direction recorded
    pub fn new(timestamp: DateTime<Utc>, wind_speed: f64, wind_direction: f64) -> Self {
        Self {
            timestamp,
            wind_speed,
            wind_direction: wrap_degrees(wind_direction),
            temperature: None,
            pressure: None,
            humidity: None,
        }
    }

    /// Attach an air temperature (°C)
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Direction sector (0..n_sectors) this sample falls in
    pub fn sector(&self, n_sectors: usize) -> usize {
        sector_index(self.wind_direction, n_sectors)
    }
}

/// Raw ingested row before validation
///
/// Every column is optional so that loaders can hand over whatever they
/// parsed; [`MetSeries::from_records`] decides what is required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetRecord {
    pub timestamp: Option<DateTime<Utc>>,
    pub wind_speed: Option<f64>,
    pub wind_direction: Option<f64>,
    pub temperature: Option<f64>,
    pub pressure: Option<f64>,
    pub humidity: Option<f64>,
}

/// Ordered observations from one station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetSeries {
    /// Station identity
    pub station: String,
    /// Nominal sampling interval (seconds)
    pub sampling_interval_s: f64,
    /// Observations in time order
    pub samples: Vec<MetSample>,
}

impl MetSeries {
    /// Build a series from already-typed samples
    ///
    /// Directions are wrapped into [0, 360).
    pub fn new(station: impl Into<String>, sampling_interval_s: f64, samples: Vec<MetSample>) -> Self {
        let samples = samples
            .into_iter()
            .map(|mut s| {
                s.wind_direction = wrap_degrees(s.wind_direction);
                s
            })
            .collect();
        Self {
            station: station.into(),
            sampling_interval_s,
            samples,
        }
    }

    /// Validate raw rows and build a series
    ///
    /// `wind_speed` and `wind_direction` are required on every row. A row
    /// without a timestamp is placed one sampling interval after the
    /// previous row (the first such row at the Unix epoch).
    ///
    /// # Errors
    /// - [`SitingError::MissingField`] naming the first absent column
    /// - [`SitingError::InvalidValue`] for negative or non-finite speeds,
    ///   non-finite directions, or a non-positive sampling interval
    pub fn from_records(
        station: impl Into<String>,
        sampling_interval_s: f64,
        records: &[MetRecord],
    ) -> Result<Self> {
        if !(sampling_interval_s.is_finite() && sampling_interval_s > 0.0) {
            return Err(SitingError::InvalidValue {
                field: "sampling_interval_s",
                value: sampling_interval_s,
                reason: "must be finite and positive",
            });
        }

        let step = TimeDelta::milliseconds((sampling_interval_s * 1000.0).round() as i64);
        let mut previous: Option<DateTime<Utc>> = None;
        let mut samples = Vec::with_capacity(records.len());

        for (row, record) in records.iter().enumerate() {
            let wind_speed = record.wind_speed.ok_or(SitingError::MissingField {
                field: "wind_speed",
                row,
            })?;
            let wind_direction = record.wind_direction.ok_or(SitingError::MissingField {
                field: "wind_direction",
                row,
            })?;

            if !wind_speed.is_finite() || wind_speed < 0.0 {
                return Err(SitingError::InvalidValue {
                    field: "wind_speed",
                    value: wind_speed,
                    reason: "must be finite and non-negative",
                });
            }
            if !wind_direction.is_finite() {
                return Err(SitingError::InvalidValue {
                    field: "wind_direction",
                    value: wind_direction,
                    reason: "must be finite",
                });
            }

            let timestamp = match (record.timestamp, previous) {
                (Some(ts), _) => ts,
                (None, Some(prev)) => prev + step,
                (None, None) => DateTime::<Utc>::UNIX_EPOCH,
            };
            previous = Some(timestamp);

            samples.push(MetSample {
                timestamp,
                wind_speed,
                wind_direction: wrap_degrees(wind_direction),
                temperature: record.temperature,
                pressure: record.pressure,
                humidity: record.humidity,
            });
        }

        Ok(Self {
            station: station.into(),
            sampling_interval_s,
            samples,
        })
    }

    /// New series for the same station with different samples
    pub fn with_samples(&self, samples: Vec<MetSample>) -> Self {
        Self {
            station: self.station.clone(),
            sampling_interval_s: self.sampling_interval_s,
            samples,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Wind speed column
    pub fn speeds(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.wind_speed).collect()
    }

    /// Wind direction column
    pub fn directions(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.wind_direction).collect()
    }

    /// True when at least one sample carries a temperature
    pub fn has_temperature(&self) -> bool {
        self.samples.iter().any(|s| s.temperature.is_some())
    }
}

/// Summary statistics of a series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetStats {
    pub count: usize,
    /// Mean wind speed (m/s)
    pub mean_wind_speed: f64,
    /// Sample standard deviation of wind speed (m/s); 0 for a single sample
    pub std_wind_speed: f64,
    /// Circular mean direction (degrees, [0, 360))
    pub mean_wind_direction: f64,
    /// Circular standard deviation (degrees); `None` when directions cancel out
    pub std_wind_direction: Option<f64>,
    pub mean_temperature: Option<f64>,
    pub mean_pressure: Option<f64>,
}

impl MetStats {
    /// Compute statistics, or `None` for an empty series
    ///
    /// Direction statistics use the mean resultant vector:
    /// ```text
    /// θ̄ = atan2(mean(sin θ), mean(cos θ))
    /// σ_θ = sqrt(-2 ln R),  R = |mean resultant|
    /// ```
    pub fn from_series(series: &MetSeries) -> Option<Self> {
        if series.is_empty() {
            return None;
        }
        let n = series.len() as f64;

        let mean_wind_speed = series.samples.iter().map(|s| s.wind_speed).sum::<f64>() / n;
        let std_wind_speed = if series.len() > 1 {
            let ss: f64 = series
                .samples
                .iter()
                .map(|s| (s.wind_speed - mean_wind_speed).powi(2))
                .sum();
            (ss / (n - 1.0)).sqrt()
        } else {
            0.0
        };

        let (sin_sum, cos_sum) = series.samples.iter().fold((0.0, 0.0), |(s, c), sample| {
            let rad = sample.wind_direction.to_radians();
            (s + rad.sin(), c + rad.cos())
        });
        let (sin_mean, cos_mean) = (sin_sum / n, cos_sum / n);
        let mean_wind_direction = wrap_degrees(sin_mean.atan2(cos_mean).to_degrees());
        let resultant = sin_mean.hypot(cos_mean);
        let std_wind_direction =
            (resultant > 1e-12).then(|| (-2.0 * resultant.min(1.0).ln()).sqrt().to_degrees());

        Some(Self {
            count: series.len(),
            mean_wind_speed,
            std_wind_speed,
            mean_wind_direction,
            std_wind_direction,
            mean_temperature: optional_mean(series.samples.iter().map(|s| s.temperature)),
            mean_pressure: optional_mean(series.samples.iter().map(|s| s.pressure)),
        })
    }
}

fn optional_mean(values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    let (sum, count) = values
        .flatten()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}
