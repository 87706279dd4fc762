//! Farm-level wake aggregation
//!
//! [`WakeCollection`] holds every turbine's wake and reduces them to sector
//! losses, a single global loss figure and 2-D deficit maps.

use super::model::{downstream_unit, TurbineWake, WakeModel};
use crate::core_types::turbine::WindFarm;
use crate::core_types::vec2::Vec2;
use nalgebra::DMatrix;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Sample distance behind each turbine, in rotor diameters
pub const SAMPLE_DISTANCE_DIAMETERS: f64 = 5.0;

/// Sector count used by [`WakeCollection::global_loss`]
pub const GLOBAL_LOSS_SECTORS: usize = 12;

/// Default number of points per axis for [`WakeGrid::around`]
pub const DEFAULT_GRID_RESOLUTION: usize = 50;

/// Mean wake loss for one direction sector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorLoss {
    pub sector: usize,
    /// `[start, end)` in degrees
    pub direction_range: (f64, f64),
    pub loss_fraction: f64,
    pub loss_percent: f64,
}

impl SectorLoss {
    /// Wind direction the sector is evaluated at: the centre of its range
    pub fn wind_direction(&self) -> f64 {
        0.5 * (self.direction_range.0 + self.direction_range.1)
    }
}

/// Summary of a farm's wake losses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WakeLossReport {
    pub global_loss: f64,
    pub global_loss_percent: f64,
    pub sector_losses: Vec<SectorLoss>,
    pub n_turbines: usize,
}

/// Evaluation axes for a wake map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WakeGrid {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
}

impl WakeGrid {
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> Self {
        Self { xs, ys }
    }

    /// `resolution` evenly spaced points per axis spanning the wakes'
    /// bounding box grown by `margin` on every side
    ///
    /// An empty wake set yields an empty grid.
    pub fn around(wakes: &[TurbineWake], resolution: usize, margin: f64) -> Self {
        let Some(first) = wakes.first() else {
            return Self::new(Vec::new(), Vec::new());
        };
        let (min_x, min_y, max_x, max_y) = wakes.iter().fold(
            (first.x, first.y, first.x, first.y),
            |(min_x, min_y, max_x, max_y), w| (min_x.min(w.x), min_y.min(w.y), max_x.max(w.x), max_y.max(w.y)),
        );
        Self::new(
            linspace(min_x - margin, max_x + margin, resolution),
            linspace(min_y - margin, max_y + margin, resolution),
        )
    }

    pub fn n_cells(&self) -> usize {
        self.xs.len() * self.ys.len()
    }
}

fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

/// Total deficit over a grid for one wind direction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WakeMap {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    pub hub_height: f64,
    pub wind_direction: f64,
    /// Deficit fractions, `deficits[(row, col)]` at `(xs[col], ys[row])`
    pub deficits: DMatrix<f64>,
}

impl WakeMap {
    pub fn max_deficit(&self) -> f64 {
        self.deficits.iter().copied().fold(0.0, f64::max)
    }

    pub fn mean_deficit(&self) -> f64 {
        if self.deficits.is_empty() {
            0.0
        } else {
            self.deficits.mean()
        }
    }

    /// Deficit at the cell nearest to `(x, y)`, `None` for an empty map
    pub fn sample(&self, x: f64, y: f64) -> Option<f64> {
        let col = nearest_index(&self.xs, x)?;
        let row = nearest_index(&self.ys, y)?;
        Some(self.deficits[(row, col)])
    }
}

fn nearest_index(axis: &[f64], value: f64) -> Option<usize> {
    axis.iter()
        .enumerate()
        .min_by(|a, b| (a.1 - value).abs().total_cmp(&(b.1 - value).abs()))
        .map(|(i, _)| i)
}

/// Every wake source of a farm together with the model evaluating them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WakeCollection {
    pub model: WakeModel,
    pub wakes: Vec<TurbineWake>,
}

impl WakeCollection {
    pub fn new(model: WakeModel) -> Self {
        Self {
            model,
            wakes: Vec::new(),
        }
    }

    pub fn with_wakes(model: WakeModel, wakes: Vec<TurbineWake>) -> Self {
        Self { model, wakes }
    }

    pub fn from_farm(model: WakeModel, farm: &WindFarm) -> Self {
        Self::with_wakes(model, farm.wakes())
    }

    pub fn add_wake(&mut self, wake: TurbineWake) {
        self.wakes.push(wake);
    }

    pub fn len(&self) -> usize {
        self.wakes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wakes.is_empty()
    }

    /// Mean deficit per direction sector
    ///
    /// For sector `s` the wind blows from the sector centre
    /// `(s + 0.5)·360/n`. Each turbine is sampled
    /// [`SAMPLE_DISTANCE_DIAMETERS`] rotor diameters straight downstream and
    /// the sample reads that turbine's own wake only. The sector loss is the
    /// mean over turbines.
    ///
    /// Empty farms and `n_sectors == 0` give an empty list.
    pub fn sector_losses(&self, n_sectors: usize) -> Vec<SectorLoss> {
        if self.wakes.is_empty() || n_sectors == 0 {
            return Vec::new();
        }
        let width = 360.0 / n_sectors as f64;

        (0..n_sectors)
            .into_par_iter()
            .map(|sector| {
                let start = sector as f64 * width;
                let mut loss = SectorLoss {
                    sector,
                    direction_range: (start, start + width),
                    loss_fraction: 0.0,
                    loss_percent: 0.0,
                };
                let direction = loss.wind_direction();
                let downstream = downstream_unit(direction);

                let total: f64 = self
                    .wakes
                    .iter()
                    .map(|wake| {
                        let point: Vec2 =
                            wake.position() + downstream * (SAMPLE_DISTANCE_DIAMETERS * wake.rotor_diameter);
                        self.model.deficit_at(point, wake, direction)
                    })
                    .sum();
                loss.loss_fraction = total / self.wakes.len() as f64;
                loss.loss_percent = loss.loss_fraction * 100.0;
                loss
            })
            .collect()
    }

    /// Unweighted mean of the [`GLOBAL_LOSS_SECTORS`] sector losses
    ///
    /// This treats every direction as equally likely. It is a climatological
    /// proxy only: an energy-loss figure needs each sector weighted by its
    /// wind-rose frequency.
    pub fn global_loss(&self) -> f64 {
        mean_loss(&self.sector_losses(GLOBAL_LOSS_SECTORS))
    }

    /// Total deficit on every grid cell for one wind direction
    ///
    /// Deficit models are planar, so `hub_height` is carried into the map
    /// for reference only.
    pub fn wake_map(&self, grid: &WakeGrid, hub_height: f64, wind_direction: f64) -> WakeMap {
        let values: Vec<f64> = grid
            .ys
            .par_iter()
            .flat_map_iter(|&y| {
                grid.xs
                    .iter()
                    .map(move |&x| self.model.total_deficit(Vec2::new(x, y), &self.wakes, wind_direction))
            })
            .collect();

        WakeMap {
            xs: grid.xs.clone(),
            ys: grid.ys.clone(),
            hub_height,
            wind_direction,
            deficits: DMatrix::from_row_slice(grid.ys.len(), grid.xs.len(), &values),
        }
    }

    /// Global loss and the default 12-sector breakdown
    pub fn report(&self) -> WakeLossReport {
        let sector_losses = self.sector_losses(GLOBAL_LOSS_SECTORS);
        let global_loss = mean_loss(&sector_losses);

        info!(
            model = %self.model.kind(),
            turbines = self.wakes.len(),
            global_loss_percent = global_loss * 100.0,
            "wake loss evaluated"
        );

        WakeLossReport {
            global_loss,
            global_loss_percent: global_loss * 100.0,
            sector_losses,
            n_turbines: self.wakes.len(),
        }
    }
}

fn mean_loss(sectors: &[SectorLoss]) -> f64 {
    if sectors.is_empty() {
        return 0.0;
    }
    sectors.iter().map(|s| s.loss_fraction).sum::<f64>() / sectors.len() as f64
}
