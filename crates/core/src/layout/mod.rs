//! Turbine layout generation and search
//!
//! Generators and evaluators are interchangeable:
//!
//! - `grid`: deterministic rectangular and staggered lattices
//! - `random`: independent uniform candidates, best score kept
//! - `genetic`: tournament selection, midpoint crossover and bounded mutation
//! - `objective`: scoring functions shared by the searches
//! - `metrics`: geometric statistics of a finished layout

mod genetic;
mod grid;
mod metrics;
mod objective;
mod random;

pub use genetic::{genetic_search, GeneticConfig, GeneticRun, MAX_PLACEMENT_ATTEMPTS};
pub use grid::{grid, optimize_grid, staggered, GridSpec, DEFAULT_ASPECT_RATIO};
pub use metrics::LayoutMetrics;
pub use objective::{
    DispersionObjective, LayoutObjective, ReferenceTurbine, WakeObjective, INTERACTION_RADIUS,
};
pub use random::{random_search, RandomSearchConfig};

use crate::core_types::vec2::Vec2;
use crate::error::{Result, SitingError};
use crate::wake::TurbineWake;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Rectangular area available for turbines (m)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl LayoutBounds {
    /// # Errors
    /// [`SitingError::InvalidBounds`] unless every value is finite and each
    /// minimum lies strictly below its maximum.
    pub fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Result<Self> {
        let finite = [min_x, max_x, min_y, max_y].iter().all(|v| v.is_finite());
        if !finite || min_x >= max_x || min_y >= max_y {
            return Err(SitingError::InvalidBounds {
                min_x,
                max_x,
                min_y,
                max_y,
            });
        }
        Ok(Self {
            min_x,
            max_x,
            min_y,
            max_y,
        })
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn contains(&self, point: Vec2) -> bool {
        (self.min_x..=self.max_x).contains(&point.x) && (self.min_y..=self.max_y).contains(&point.y)
    }

    pub fn clamp(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            point.x.clamp(self.min_x, self.max_x),
            point.y.clamp(self.min_y, self.max_y),
        )
    }

    /// Uniformly distributed point inside the bounds
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        Vec2::new(
            rng.random_range(self.min_x..=self.max_x),
            rng.random_range(self.min_y..=self.max_y),
        )
    }
}

/// Candidate or final turbine arrangement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// Generator that produced the layout
    pub name: String,
    pub turbines: Vec<Vec2>,
    /// Score assigned by the producing search; 0 for generated grids
    pub fitness: f64,
}

impl Layout {
    pub fn new(name: impl Into<String>, turbines: Vec<Vec2>) -> Self {
        Self {
            name: name.into(),
            turbines,
            fitness: 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.turbines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turbines.is_empty()
    }

    pub fn metrics(&self) -> LayoutMetrics {
        LayoutMetrics::from_positions(&self.turbines)
    }

    /// Smallest pairwise distance, `None` with fewer than two turbines
    pub fn min_spacing(&self) -> Option<f64> {
        let mut min: Option<f64> = None;
        for (i, a) in self.turbines.iter().enumerate() {
            for b in &self.turbines[i + 1..] {
                let d = (a - b).norm();
                min = Some(min.map_or(d, |m| m.min(d)));
            }
        }
        min
    }

    /// Wake sources for the layout with every position carrying `turbine`
    pub fn wakes(&self, turbine: &ReferenceTurbine) -> Vec<TurbineWake> {
        self.turbines
            .iter()
            .enumerate()
            .map(|(i, p)| turbine.wake_at(format!("T{:02}", i + 1), *p))
            .collect()
    }
}
