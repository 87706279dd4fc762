//! Layout scoring
//!
//! Higher scores are better. Objectives are pure functions of the positions
//! so a population can be scored in parallel.

use crate::core_types::turbine::DEFAULT_THRUST_COEFFICIENT;
use crate::core_types::vec2::Vec2;
use crate::core_types::wind_rose::WindRose;
use crate::wake::{TurbineWake, WakeModel};
use serde::{Deserialize, Serialize};

/// Pairs further apart than this (m) do not interact in [`WakeObjective`]
pub const INTERACTION_RADIUS: f64 = 2000.0;

/// Fitness function for a set of turbine positions
pub trait LayoutObjective: Send + Sync {
    fn name(&self) -> &'static str;

    fn score(&self, positions: &[Vec2]) -> f64;
}

/// Turbine geometry assumed at every candidate position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceTurbine {
    pub rotor_diameter: f64,
    pub hub_height: f64,
    pub ct: f64,
}

impl Default for ReferenceTurbine {
    fn default() -> Self {
        Self {
            rotor_diameter: 100.0,
            hub_height: 80.0,
            ct: DEFAULT_THRUST_COEFFICIENT,
        }
    }
}

impl ReferenceTurbine {
    pub fn wake_at(&self, id: impl Into<String>, position: Vec2) -> TurbineWake {
        TurbineWake::new(id, position.x, position.y, self.hub_height, self.rotor_diameter, self.ct)
    }
}

/// Mean pairwise distance in kilometres
///
/// Layouts with at most one turbine score 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispersionObjective;

impl LayoutObjective for DispersionObjective {
    fn name(&self) -> &'static str {
        "dispersion"
    }

    fn score(&self, positions: &[Vec2]) -> f64 {
        let n = positions.len();
        if n <= 1 {
            return 1.0;
        }
        let mut total = 0.0;
        for (i, a) in positions.iter().enumerate() {
            for b in &positions[i + 1..] {
                total += (a - b).norm();
            }
        }
        let pairs = (n * (n - 1) / 2) as f64;
        total / pairs / 1000.0
    }
}

/// Wind-rose-weighted pairwise wake loss
///
/// ```text
/// fitness = 1 - Σ_s f_s · Σ_{i≠j, |p_i - p_j| < 2000} deficit(j → i, θ_s) / (n · n_sectors)
/// θ_s = s · 360 / n_sectors
/// ```
///
/// `deficit(j → i, θ)` is the deficit of turbine j's wake at turbine i.
#[derive(Debug, Clone, PartialEq)]
pub struct WakeObjective {
    pub model: WakeModel,
    pub turbine: ReferenceTurbine,
    pub wind_rose: WindRose,
}

impl WakeObjective {
    pub fn new(model: WakeModel, turbine: ReferenceTurbine, wind_rose: WindRose) -> Self {
        Self {
            model,
            turbine,
            wind_rose,
        }
    }
}

impl LayoutObjective for WakeObjective {
    fn name(&self) -> &'static str {
        "wake"
    }

    fn score(&self, positions: &[Vec2]) -> f64 {
        let n = positions.len();
        let n_sectors = self.wind_rose.n_sectors();
        if n == 0 || n_sectors == 0 {
            return 1.0;
        }

        let wakes: Vec<TurbineWake> = positions
            .iter()
            .enumerate()
            .map(|(j, p)| self.turbine.wake_at(j.to_string(), *p))
            .collect();
        let width = self.wind_rose.sector_width();

        let mut total_loss = 0.0;
        for (sector, &frequency) in self.wind_rose.frequencies().iter().enumerate() {
            let direction = sector as f64 * width;
            let mut sector_loss = 0.0;
            for (i, point) in positions.iter().enumerate() {
                for (j, wake) in wakes.iter().enumerate() {
                    if i == j || (point - positions[j]).norm() >= INTERACTION_RADIUS {
                        continue;
                    }
                    sector_loss += self.model.deficit_at(*point, wake, direction);
                }
            }
            total_loss += sector_loss * frequency;
        }

        1.0 - total_loss / (n * n_sectors) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_dispersion() {
        let obj = DispersionObjective;
        assert_eq!(obj.score(&[]), 1.0);
        assert_eq!(obj.score(&[Vec2::new(5.0, 5.0)]), 1.0);
        // Pairs: 3000, 4000, 5000 → mean 4000 m
        let positions = [Vec2::new(0.0, 0.0), Vec2::new(3000.0, 0.0), Vec2::new(0.0, 4000.0)];
        assert_abs_diff_eq!(obj.score(&positions), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_wake_objective_isolated_turbines() {
        let obj = WakeObjective::new(WakeModel::larsen(), ReferenceTurbine::default(), WindRose::uniform(12));
        let far_apart = [Vec2::new(0.0, 0.0), Vec2::new(5000.0, 0.0)];
        assert_eq!(obj.score(&far_apart), 1.0);
        assert_eq!(obj.score(&[]), 1.0);
    }

    #[test]
    fn test_wake_objective_penalises_aligned_pairs() {
        // All weight in sector 0, whose wake points towards -x
        let rose = WindRose::from_weights(&[1.0, 0.0, 0.0, 0.0]);
        let obj = WakeObjective::new(WakeModel::larsen(), ReferenceTurbine::default(), rose);

        let aligned = [Vec2::new(0.0, 0.0), Vec2::new(-500.0, 0.0)];
        let expected_deficit = 0.4 / 2.25;
        assert_abs_diff_eq!(obj.score(&aligned), 1.0 - expected_deficit / 8.0, epsilon = 1e-9);

        let side_by_side = [Vec2::new(0.0, 0.0), Vec2::new(0.0, 1500.0)];
        assert!(obj.score(&side_by_side) > obj.score(&aligned));
    }
}
