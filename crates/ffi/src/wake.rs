//! Wake loss entry points.

use windsite_core::wake::{TurbineWake, WakeCollection, WakeModel, WakeModelConfig, WakeModelKind};
use windsite_core::Turbine;

use crate::error::{DefaultSitingError, SitingErrorCode};
use crate::helpers::{handle_ffi_result, input_slice, output_slice, write_out};

/// C-compatible turbine description.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindsiteTurbine {
    /// Easting (meters)
    pub x: f64,
    /// Northing (meters)
    pub y: f64,
    /// Hub height (meters)
    pub hub_height: f64,
    /// Rotor diameter (meters)
    pub rotor_diameter: f64,
    /// Thrust coefficient
    pub ct: f64,
}

/// Map the C model code: 0 = Jensen, 1 = Larsen.
fn model_from_code(code: u32) -> Result<WakeModel, DefaultSitingError> {
    let kind = match code {
        0 => WakeModelKind::Jensen,
        1 => WakeModelKind::Larsen,
        other => {
            return Err(DefaultSitingError::invalid_parameter(format!(
                "Unknown wake model code {other}, expected 0 (jensen) or 1 (larsen)"
            )))
        }
    };
    Ok(WakeModel::new(WakeModelConfig {
        model: kind,
        ..Default::default()
    }))
}

/// # Safety
/// Same contract as `input_slice`.
unsafe fn collection(turbines: *const WindsiteTurbine, count: usize, model: u32) -> Result<WakeCollection, DefaultSitingError> {
    let model = model_from_code(model)?;
    let turbines = unsafe { input_slice(turbines, count, "turbines") }?;
    let wakes = turbines
        .iter()
        .enumerate()
        .map(|(i, t)| -> Result<TurbineWake, DefaultSitingError> {
            let turbine = Turbine::new(format!("T{i}"), t.x, t.y, t.hub_height, t.rotor_diameter)?.with_ct(t.ct)?;
            Ok(TurbineWake::from(&turbine))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(WakeCollection::with_wakes(model, wakes))
}

/// Unweighted 12-sector mean wake loss fraction of a farm.
///
/// An empty farm (`count == 0`) reports zero loss.
///
/// # Safety
/// `turbines` must reference `count` readable values when `count > 0` and
/// `out_loss` must be valid for writes.
#[no_mangle]
pub unsafe extern "C" fn windsite_wake_global_loss(
    turbines: *const WindsiteTurbine,
    count: usize,
    model: u32,
    out_loss: *mut f64,
) -> SitingErrorCode {
    handle_ffi_result(|| {
        let farm = unsafe { collection(turbines, count, model) }?;
        unsafe { write_out(out_loss, farm.global_loss(), "out_loss") }
    })
}

/// Mean wake loss fraction per direction sector.
///
/// Writes `n_sectors` values into `out_losses`; with `count == 0` every
/// sector is written as zero.
///
/// # Safety
/// `turbines` must reference `count` readable values when `count > 0` and
/// `out_losses` must reference `capacity` writable values.
#[no_mangle]
pub unsafe extern "C" fn windsite_wake_sector_losses(
    turbines: *const WindsiteTurbine,
    count: usize,
    model: u32,
    n_sectors: usize,
    out_losses: *mut f64,
    capacity: usize,
) -> SitingErrorCode {
    handle_ffi_result(|| {
        if n_sectors == 0 {
            return Err(DefaultSitingError::invalid_parameter(
                "n_sectors must be positive".to_string(),
            ));
        }
        let farm = unsafe { collection(turbines, count, model) }?;
        let out = unsafe { output_slice(out_losses, capacity, n_sectors, "out_losses") }?;

        out.fill(0.0);
        for loss in farm.sector_losses(n_sectors) {
            out[loss.sector] = loss.loss_fraction;
        }
        Ok(())
    })
}
