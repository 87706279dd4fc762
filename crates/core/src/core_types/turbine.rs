//! Turbine geometry and operating characteristics
//!
//! A [`Turbine`] is owned by a [`WindFarm`]. Geometry is immutable for the
//! duration of a wake evaluation pass; wake routines borrow turbines and never
//! modify them.

use crate::core_types::vec2::Vec2;
use crate::error::{Result, SitingError};
use serde::{Deserialize, Serialize};

/// Thrust coefficient used when the caller does not supply one
pub const DEFAULT_THRUST_COEFFICIENT: f64 = 0.8;

/// Cut-out speed assumed when a turbine has none recorded (m/s)
const DEFAULT_CUT_OUT_SPEED: f64 = 50.0;

/// Tabulated power curve: wind speed (m/s) → electrical power (kW)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PowerCurve {
    /// Wind speeds in ascending order (m/s)
    pub wind_speeds: Vec<f64>,
    /// Power at each speed (kW)
    pub power_kw: Vec<f64>,
}

impl PowerCurve {
    /// Build a curve from (speed, power) points, sorted by speed
    pub fn from_points(points: &[(f64, f64)]) -> Self {
        let mut sorted = points.to_vec();
        sorted.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self {
            wind_speeds: sorted.iter().map(|p| p.0).collect(),
            power_kw: sorted.iter().map(|p| p.1).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.wind_speeds.is_empty() || self.power_kw.is_empty()
    }

    /// Linear interpolation, clamped to the end points
    pub fn interpolate(&self, wind_speed: f64) -> f64 {
        let n = self.wind_speeds.len().min(self.power_kw.len());
        if n == 0 {
            return 0.0;
        }
        if wind_speed <= self.wind_speeds[0] {
            return self.power_kw[0];
        }
        if wind_speed >= self.wind_speeds[n - 1] {
            return self.power_kw[n - 1];
        }
        let upper = self.wind_speeds[..n].partition_point(|&ws| ws <= wind_speed);
        let (x0, x1) = (self.wind_speeds[upper - 1], self.wind_speeds[upper]);
        let (y0, y1) = (self.power_kw[upper - 1], self.power_kw[upper]);
        if x1 <= x0 {
            return y0;
        }
        y0 + (y1 - y0) * (wind_speed - x0) / (x1 - x0)
    }
}

/// A wind turbine at a planar position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turbine {
    /// Name or identifier
    pub name: String,
    /// Easting (m)
    pub x: f64,
    /// Northing (m)
    pub y: f64,
    /// Hub height (m)
    pub hub_height: f64,
    /// Rotor diameter (m, > 0)
    pub rotor_diameter: f64,
    /// Thrust coefficient used by the wake models, in (0, 1]
    pub ct: f64,
    #[serde(default)]
    pub power_curve: PowerCurve,
    /// Rated power (kW)
    #[serde(default)]
    pub rated_power: Option<f64>,
    /// Cut-in speed (m/s)
    #[serde(default)]
    pub cut_in_speed: Option<f64>,
    /// Cut-out speed (m/s)
    #[serde(default)]
    pub cut_out_speed: Option<f64>,
}

impl Turbine {
    /// Create a turbine with the default thrust coefficient (0.8)
    ///
    /// # Errors
    /// [`SitingError::InvalidValue`] when the rotor diameter is not positive
    /// or the hub height is negative.
    pub fn new(
        name: impl Into<String>,
        x: f64,
        y: f64,
        hub_height: f64,
        rotor_diameter: f64,
    ) -> Result<Self> {
        if !(rotor_diameter.is_finite() && rotor_diameter > 0.0) {
            return Err(SitingError::InvalidValue {
                field: "rotor_diameter",
                value: rotor_diameter,
                reason: "must be finite and positive",
            });
        }
        if !(hub_height.is_finite() && hub_height >= 0.0) {
            return Err(SitingError::InvalidValue {
                field: "hub_height",
                value: hub_height,
                reason: "must be finite and non-negative",
            });
        }
        Ok(Self {
            name: name.into(),
            x,
            y,
            hub_height,
            rotor_diameter,
            ct: DEFAULT_THRUST_COEFFICIENT,
            power_curve: PowerCurve::default(),
            rated_power: None,
            cut_in_speed: None,
            cut_out_speed: None,
        })
    }

    /// Override the thrust coefficient
    ///
    /// # Errors
    /// [`SitingError::InvalidValue`] unless `0 < ct ≤ 1`.
    pub fn with_ct(mut self, ct: f64) -> Result<Self> {
        if !(ct > 0.0 && ct <= 1.0) {
            return Err(SitingError::InvalidValue {
                field: "ct",
                value: ct,
                reason: "thrust coefficient must lie in (0, 1]",
            });
        }
        self.ct = ct;
        Ok(self)
    }

    /// Attach operating data: power curve, rated power and operating range
    pub fn with_operating_range(
        mut self,
        power_curve: PowerCurve,
        rated_power: f64,
        cut_in_speed: f64,
        cut_out_speed: f64,
    ) -> Self {
        self.power_curve = power_curve;
        self.rated_power = Some(rated_power);
        self.cut_in_speed = Some(cut_in_speed);
        self.cut_out_speed = Some(cut_out_speed);
        self
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Rotor radius (m)
    pub fn radius(&self) -> f64 {
        self.rotor_diameter / 2.0
    }

    /// Rotor swept area (m²)
    pub fn swept_area(&self) -> f64 {
        std::f64::consts::PI * self.radius().powi(2)
    }

    fn is_operating(&self, wind_speed: f64) -> bool {
        let cut_in = self.cut_in_speed.unwrap_or(0.0);
        let cut_out = self.cut_out_speed.unwrap_or(DEFAULT_CUT_OUT_SPEED);
        wind_speed >= cut_in && wind_speed < cut_out
    }

    /// Electrical power at a hub-height wind speed (kW)
    ///
    /// Zero outside [cut-in, cut-out). Interpolates the power curve when one
    /// is present, otherwise returns the rated power.
    pub fn power_at(&self, wind_speed: f64) -> f64 {
        if !self.is_operating(wind_speed) {
            return 0.0;
        }
        if self.power_curve.is_empty() {
            return self.rated_power.unwrap_or(0.0);
        }
        let power = self.power_curve.interpolate(wind_speed);
        match self.rated_power {
            Some(rated) => power.min(rated),
            None => power,
        }
    }

    /// Speed-dependent thrust coefficient
    ///
    /// ```text
    /// Ct(U) = 0.8                          U < 10 m/s
    /// Ct(U) = max(0.1, 0.8 - 0.05 (U - 10)) U ≥ 10 m/s
    /// ```
    /// and zero outside the operating range. Generic approximation until
    /// manufacturer Ct curves are supplied.
    pub fn thrust_coefficient_at(&self, wind_speed: f64) -> f64 {
        if !self.is_operating(wind_speed) {
            return 0.0;
        }
        if wind_speed < 10.0 {
            DEFAULT_THRUST_COEFFICIENT
        } else {
            (DEFAULT_THRUST_COEFFICIENT - 0.05 * (wind_speed - 10.0)).max(0.1)
        }
    }
}

/// A named collection of turbines
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WindFarm {
    pub name: String,
    pub turbines: Vec<Turbine>,
}

impl WindFarm {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            turbines: Vec::new(),
        }
    }

    pub fn add_turbine(&mut self, turbine: Turbine) {
        self.turbines.push(turbine);
    }

    pub fn len(&self) -> usize {
        self.turbines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turbines.is_empty()
    }

    /// Installed capacity (kW); turbines without a rating count as zero
    pub fn total_rated_power(&self) -> f64 {
        self.turbines.iter().filter_map(|t| t.rated_power).sum()
    }

    /// `(min_x, min_y, max_x, max_y)`, or `None` for an empty farm
    pub fn bounding_box(&self) -> Option<(f64, f64, f64, f64)> {
        let first = self.turbines.first()?;
        Some(self.turbines.iter().fold(
            (first.x, first.y, first.x, first.y),
            |(min_x, min_y, max_x, max_y), t| {
                (min_x.min(t.x), min_y.min(t.y), max_x.max(t.x), max_y.max(t.y))
            },
        ))
    }
}
