//! Uniform random search

use super::genetic::seeded_rng;
use super::objective::LayoutObjective;
use super::{Layout, LayoutBounds};
use crate::core_types::vec2::Vec2;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Random search parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomSearchConfig {
    pub n_turbines: usize,
    pub iterations: usize,
    /// Fixed seed for reproducible runs; `None` draws from the thread RNG
    pub seed: Option<u64>,
}

impl Default for RandomSearchConfig {
    fn default() -> Self {
        Self {
            n_turbines: 10,
            iterations: 1000,
            seed: None,
        }
    }
}

/// Sample `iterations` unconstrained layouts and keep the highest scoring one
///
/// At least one candidate is always drawn. Ties keep the earlier candidate.
pub fn random_search(
    config: &RandomSearchConfig,
    bounds: &LayoutBounds,
    objective: &dyn LayoutObjective,
) -> Layout {
    let mut rng = seeded_rng(config.seed);
    let mut best: Option<Layout> = None;

    for _ in 0..config.iterations.max(1) {
        let positions: Vec<Vec2> = (0..config.n_turbines).map(|_| bounds.sample(&mut rng)).collect();
        let fitness = objective.score(&positions);
        if best.as_ref().is_none_or(|b| fitness > b.fitness) {
            best = Some(Layout {
                name: "random_search".to_string(),
                turbines: positions,
                fitness,
            });
        }
    }

    let best = best.unwrap_or_else(|| Layout::new("random_search", Vec::new()));
    debug!(
        objective = objective.name(),
        iterations = config.iterations,
        fitness = best.fitness,
        "random search finished"
    );
    best
}
