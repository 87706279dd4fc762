//! Single-turbine wake deficit models
//!
//! A point is first projected into wind-aligned coordinates relative to the
//! turbine. For wind direction θ (radians) and offset (dx, dy) from the hub:
//!
//! ```text
//! downstream = -dx·cos θ - dy·sin θ
//! lateral    = -dx·sin θ + dy·cos θ
//! ```
//!
//! Points at or behind the rotor plane (`downstream ≤ 0`) and points outside
//! the linearly expanding wake cone carry no deficit.
//!
//! # References
//! - Jensen, N.O. (1983). "A note on wind generator interaction." Risø-M-2411.
//! - Larsen, G.C. (1988). "A simple wake calculation procedure." Risø-M-2760.

use crate::core_types::turbine::{Turbine, WindFarm};
use crate::core_types::vec2::Vec2;
use crate::error::{Result, SitingError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Wake deficit formulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WakeModelKind {
    /// Top-hat momentum deficit with cosine cone shaping
    #[default]
    Jensen,
    /// Similarity-width deficit scaled by turbulence intensity
    Larsen,
}

impl WakeModelKind {
    /// Lenient selector: unknown names fall back to [`WakeModelKind::Jensen`]
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            warn!(model = name, "unknown wake model, using Jensen");
            Self::Jensen
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Jensen => "jensen",
            Self::Larsen => "larsen",
        }
    }
}

impl FromStr for WakeModelKind {
    type Err = SitingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jensen" | "park" => Ok(Self::Jensen),
            "larsen" => Ok(Self::Larsen),
            _ => Err(SitingError::UnknownSelector {
                kind: "wake model",
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for WakeModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Wake model parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WakeModelConfig {
    pub model: WakeModelKind,
    /// Linear wake expansion rate (default 0.1)
    pub k_wake: f64,
    /// Ambient turbulence intensity, used by Larsen (default 0.1)
    pub turbulence_intensity: f64,
    /// Lateral drift of the wake centreline per metre downstream (default 0)
    pub deflection_coefficient: f64,
}

impl Default for WakeModelConfig {
    fn default() -> Self {
        Self {
            model: WakeModelKind::Jensen,
            k_wake: 0.1,
            turbulence_intensity: 0.1,
            deflection_coefficient: 0.0,
        }
    }
}

/// Wake source: a turbine reduced to what the deficit models need
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurbineWake {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub hub_height: f64,
    pub rotor_diameter: f64,
    pub ct: f64,
}

impl TurbineWake {
    pub fn new(id: impl Into<String>, x: f64, y: f64, hub_height: f64, rotor_diameter: f64, ct: f64) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            hub_height,
            rotor_diameter,
            ct,
        }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Wake half-width `D/2 · (1 + k·x)` at `downstream` metres
    pub fn wake_radius_at(&self, downstream: f64, k_wake: f64) -> f64 {
        0.5 * self.rotor_diameter * (1.0 + k_wake * downstream)
    }
}

impl From<&Turbine> for TurbineWake {
    fn from(turbine: &Turbine) -> Self {
        Self::new(
            turbine.name.clone(),
            turbine.x,
            turbine.y,
            turbine.hub_height,
            turbine.rotor_diameter,
            turbine.ct,
        )
    }
}

impl WindFarm {
    /// Wake sources for every turbine in the farm
    pub fn wakes(&self) -> Vec<TurbineWake> {
        self.turbines.iter().map(TurbineWake::from).collect()
    }
}

/// Unit vector pointing downstream for a wind direction in degrees
pub fn downstream_unit(wind_direction: f64) -> Vec2 {
    let theta = wind_direction.to_radians();
    Vec2::new(-theta.cos(), -theta.sin())
}

/// Split an offset from the hub into (downstream, lateral) components
pub fn wind_frame(offset: Vec2, wind_direction: f64) -> (f64, f64) {
    let (sin, cos) = wind_direction.to_radians().sin_cos();
    let downstream = -offset.x * cos - offset.y * sin;
    let lateral = -offset.x * sin + offset.y * cos;
    (downstream, lateral)
}

/// Deficit evaluator for one [`WakeModelConfig`]
///
/// Stateless apart from its parameters; every method is a pure function of
/// its arguments and safe to call from many threads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WakeModel {
    pub config: WakeModelConfig,
}

impl WakeModel {
    pub fn new(config: WakeModelConfig) -> Self {
        Self { config }
    }

    pub fn jensen() -> Self {
        Self::default()
    }

    pub fn larsen() -> Self {
        Self::new(WakeModelConfig {
            model: WakeModelKind::Larsen,
            ..Default::default()
        })
    }

    pub fn kind(&self) -> WakeModelKind {
        self.config.model
    }

    /// Jensen deficit at `downstream` metres
    ///
    /// ```text
    /// c = 0.5·(1 + cos(π·r_w / (D/2)))
    /// deficit = 1 - sqrt(1 - 2·Ct·(1 - c)·x / (x + 2k·D))
    /// ```
    ///
    /// The square-root argument is floored at zero, so strong wakes saturate
    /// at a deficit of 1.
    ///
    /// # Arguments
    ///
    /// * `downstream` - Distance behind the rotor (m), positive
    /// * `rotor_diameter` - D (m)
    /// * `ct` - Thrust coefficient
    /// * `wake_radius` - Wake half-width at `downstream` (m)
    pub fn jensen_deficit(&self, downstream: f64, rotor_diameter: f64, ct: f64, wake_radius: f64) -> f64 {
        let cone = 0.5 * (1.0 + (std::f64::consts::PI * wake_radius / (0.5 * rotor_diameter)).cos());
        let ratio = downstream / (downstream + 2.0 * self.config.k_wake * rotor_diameter);
        let recovery = (1.0 - 2.0 * ct * (1.0 - cone) * ratio).max(0.0).sqrt();
        (1.0 - recovery).clamp(0.0, 1.0)
    }

    /// Larsen deficit at `downstream` metres
    ///
    /// ```text
    /// L = 9.5·D / (TI + 0.1)
    /// σ = 0.2·x  (x > L)
    ///     0.3·x  (x ≤ L)
    /// deficit = 0.5·Ct·(D/σ)²
    /// ```
    pub fn larsen_deficit(&self, downstream: f64, rotor_diameter: f64, ct: f64) -> f64 {
        let length_scale = 9.5 * rotor_diameter / (self.config.turbulence_intensity + 0.1);
        let width = if downstream > length_scale {
            0.2 * downstream
        } else {
            0.3 * downstream
        };
        if width <= 0.0 {
            return 0.0;
        }
        (0.5 * ct * (rotor_diameter / width).powi(2)).clamp(0.0, 1.0)
    }

    /// Fractional velocity deficit caused by `wake` at `point`
    ///
    /// Returns a value in `[0, 1]`; zero upstream of the rotor or outside the
    /// wake cone.
    pub fn deficit_at(&self, point: Vec2, wake: &TurbineWake, wind_direction: f64) -> f64 {
        let (downstream, lateral) = wind_frame(point - wake.position(), wind_direction);
        if downstream <= 0.0 {
            return 0.0;
        }

        let wake_radius = wake.wake_radius_at(downstream, self.config.k_wake);
        let offset = lateral - self.config.deflection_coefficient * downstream;
        if offset.abs() > wake_radius {
            return 0.0;
        }

        match self.config.model {
            WakeModelKind::Jensen => self.jensen_deficit(downstream, wake.rotor_diameter, wake.ct, wake_radius),
            WakeModelKind::Larsen => self.larsen_deficit(downstream, wake.rotor_diameter, wake.ct),
        }
    }

    /// Quadratic superposition of every wake's deficit at `point`
    ///
    /// ```text
    /// total = min(1, sqrt(Σ deficit_i²))
    /// ```
    pub fn total_deficit(&self, point: Vec2, wakes: &[TurbineWake], wind_direction: f64) -> f64 {
        wakes
            .iter()
            .map(|wake| self.deficit_at(point, wake, wind_direction).powi(2))
            .sum::<f64>()
            .sqrt()
            .min(1.0)
    }
}
