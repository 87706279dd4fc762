//! Turbine wake modelling
//!
//! - `model`: analytical single-wake deficit (Jensen, Larsen) and quadratic superposition
//! - `farm`: sector losses, global loss and deficit maps for a set of turbines

mod farm;
mod model;

pub use farm::{
    SectorLoss, WakeCollection, WakeGrid, WakeLossReport, WakeMap, DEFAULT_GRID_RESOLUTION,
    GLOBAL_LOSS_SECTORS, SAMPLE_DISTANCE_DIAMETERS,
};
pub use model::{
    downstream_unit, wind_frame, TurbineWake, WakeModel, WakeModelConfig, WakeModelKind,
};
