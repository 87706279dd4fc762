//! Core types shared by the filtering, correlation, wake and layout modules

pub mod met;
pub mod turbine;
pub mod vec2;
pub mod wind_rose;

pub use met::{MetRecord, MetSample, MetSeries, MetStats};
pub use turbine::{PowerCurve, Turbine, WindFarm, DEFAULT_THRUST_COEFFICIENT};
pub use vec2::{sector_index, wrap_degrees, Vec2};
pub use wind_rose::WindRose;
