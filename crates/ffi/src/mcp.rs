//! MCP regression entry points.

use windsite_core::mcp::{self, McpConfig, McpMethod, PairedSeries};

use crate::error::{DefaultSitingError, SitingErrorCode};
use crate::helpers::{handle_ffi_result, input_slice, write_out};

/// C-compatible linear relation `target = slope * reference + intercept`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindsiteRegression {
    pub slope: f64,
    pub intercept: f64,
    /// Pearson correlation of the fitted pairs
    pub correlation: f64,
}

impl From<mcp::RegressionResult> for WindsiteRegression {
    fn from(r: mcp::RegressionResult) -> Self {
        Self {
            slope: r.slope,
            intercept: r.intercept,
            correlation: r.correlation,
        }
    }
}

/// Map the C method code: 0 = orthogonal, 1 = bins, 2 = matrix.
pub(crate) fn method_from_code(code: u32) -> Result<McpMethod, DefaultSitingError> {
    match code {
        0 => Ok(McpMethod::Orthogonal),
        1 => Ok(McpMethod::Bins),
        2 => Ok(McpMethod::Matrix),
        other => Err(DefaultSitingError::invalid_parameter(format!(
            "Unknown MCP method code {other}, expected 0 (orthogonal), 1 (bins) or 2 (matrix)"
        ))),
    }
}

/// Fit reference and target speeds with the selected MCP method.
///
/// # Arguments
/// * `reference` - Reference speeds (m/s), `len` values
/// * `target` - Concurrent target speeds (m/s), `len` values
/// * `directions` - Reference directions (degrees), `len` values; may be null,
///   in which case every sample falls in sector 0
/// * `method` - 0 = orthogonal, 1 = bins, 2 = matrix
/// * `out_result` - Receives the fitted relation
///
/// # Returns
/// `Ok` on success; `InvalidSeries` when `len` is 0.
///
/// # Safety
/// Non-null array pointers must reference `len` readable `f64` values and
/// `out_result` must be valid for writes.
#[no_mangle]
pub unsafe extern "C" fn windsite_mcp_fit(
    reference: *const f64,
    target: *const f64,
    directions: *const f64,
    len: usize,
    method: u32,
    out_result: *mut WindsiteRegression,
) -> SitingErrorCode {
    handle_ffi_result(|| {
        let method = method_from_code(method)?;
        let reference = unsafe { input_slice(reference, len, "reference") }?;
        let target = unsafe { input_slice(target, len, "target") }?;
        let directions = if directions.is_null() {
            vec![0.0; len]
        } else {
            unsafe { input_slice(directions, len, "directions") }?.to_vec()
        };

        let paired = PairedSeries::new(reference.to_vec(), target.to_vec(), directions)?;
        let config = McpConfig {
            method,
            ..Default::default()
        };
        let fit = mcp::fit_paired(&paired, &config);

        unsafe { write_out(out_result, WindsiteRegression::from(fit), "out_result") }
    })
}
