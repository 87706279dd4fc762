//! Top-level run configuration
//!
//! Every section falls back to its documented defaults, so a partial JSON
//! document such as `{"mcp": {"method": "bins"}}` is a valid configuration.

use crate::layout::{GeneticConfig, RandomSearchConfig, ReferenceTurbine};
use crate::mcp::McpConfig;
use crate::met_filter::FilterOptions;
use crate::wake::WakeModelConfig;
use serde::{Deserialize, Serialize};

/// Settings for a full siting run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SitingConfig {
    pub filter: FilterOptions,
    pub mcp: McpConfig,
    pub wake: WakeModelConfig,
    pub genetic: GeneticConfig,
    pub random_search: RandomSearchConfig,
    /// Geometry assumed for candidate layout positions
    pub turbine: ReferenceTurbine,
    /// Sector count of the wind rose weighting the layout fitness
    pub wind_rose_sectors: Option<usize>,
}

impl SitingConfig {
    /// Wind-rose sector count, defaulting to the MCP sector count
    pub fn rose_sectors(&self) -> usize {
        self.wind_rose_sectors.unwrap_or(self.mcp.sectors).max(1)
    }

    /// Apply one seed to both layout searches
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.genetic.seed = Some(seed);
        self.random_search.seed = Some(seed);
        self
    }
}
