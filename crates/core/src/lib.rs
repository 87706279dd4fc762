//! Wind Farm Siting Core Library
//!
//! Numerical core for wind resource assessment and turbine siting:
//!
//! - [`met_filter`]: met-mast cleaning (tower shadow, icing, variability) and shear extrapolation
//! - [`mcp`]: Measure-Correlate-Predict between a reference station and the site
//! - [`wake`]: analytical wake deficits and farm-level wake losses
//! - [`layout`]: lattice generators, random and genetic layout search, layout metrics
//!
//! Every operation is a synchronous function of its inputs. Invalid input is
//! rejected with [`SitingError`]; numerically degenerate input falls back to
//! documented neutral values.

// Shared types
pub mod config;
pub mod core_types;
pub mod error;

// Pipeline stages
pub mod layout;
pub mod mcp;
pub mod met_filter;
pub mod wake;

pub use config::SitingConfig;
pub use core_types::{
    MetRecord, MetSample, MetSeries, MetStats, PowerCurve, Turbine, Vec2, WindFarm, WindRose,
};
pub use error::{Result, SitingError};

pub use layout::{
    genetic_search, optimize_grid, random_search, DispersionObjective, GeneticConfig, Layout,
    LayoutBounds, LayoutMetrics, LayoutObjective, RandomSearchConfig, ReferenceTurbine,
    WakeObjective,
};
pub use mcp::{McpConfig, McpMethod, McpResult, PairedSeries, RegressionResult};
pub use met_filter::{filter, FilterOptions, FilterReport};
pub use wake::{
    TurbineWake, WakeCollection, WakeGrid, WakeLossReport, WakeMap, WakeModel, WakeModelConfig,
    WakeModelKind,
};
