use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

use windsite_core::SitingError;

/// Common interface for errors crossing the FFI boundary.
///
/// - `code()` - Returns the error code passed back to C
/// - `msg()` - Returns the diagnostic message stored for `windsite_get_last_error`
pub(crate) trait FfiError {
    fn code(&self) -> SitingErrorCode;

    fn msg(&self) -> &str;
}

/// Default implementation of `FfiError` for FFI argument checks and core errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DefaultSitingError {
    code: SitingErrorCode,
    msg: String,
}

impl DefaultSitingError {
    /// Create error for null pointer passed where non-null required.
    ///
    /// # Arguments
    /// * `param_name` - The name of the parameter that was null (e.g., `"out_result"`)
    pub fn null_pointer(param_name: &str) -> Self {
        Self {
            code: SitingErrorCode::NullPointer,
            msg: format!("Parameter '{param_name}' cannot be null"),
        }
    }

    /// Create error for an invalid scalar argument.
    pub fn invalid_parameter(message: String) -> Self {
        Self {
            code: SitingErrorCode::InvalidParameter,
            msg: message,
        }
    }

    /// Create error for an output buffer that cannot hold the result.
    ///
    /// # Arguments
    /// * `param_name` - The buffer parameter
    /// * `required` - Elements needed
    /// * `capacity` - Elements supplied by the caller
    pub fn buffer_too_small(param_name: &str, required: usize, capacity: usize) -> Self {
        Self {
            code: SitingErrorCode::BufferTooSmall,
            msg: format!("Buffer '{param_name}' holds {capacity} elements, {required} required"),
        }
    }
}

impl From<SitingError> for DefaultSitingError {
    fn from(error: SitingError) -> Self {
        let code = match error {
            SitingError::MissingField { .. }
            | SitingError::InvalidValue { .. }
            | SitingError::InvalidBounds { .. }
            | SitingError::UnknownSelector { .. } => SitingErrorCode::InvalidParameter,
            SitingError::EmptySeries | SitingError::LengthMismatch { .. } => SitingErrorCode::InvalidSeries,
            SitingError::InsufficientSectors { .. } => SitingErrorCode::InsufficientData,
        };
        Self {
            code,
            msg: error.to_string(),
        }
    }
}

impl FfiError for DefaultSitingError {
    fn code(&self) -> SitingErrorCode {
        self.code
    }

    fn msg(&self) -> &str {
        &self.msg
    }
}

/// FFI error codes returned by siting functions.
/// Follows standard C convention: 0 = success, non-zero = error.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SitingErrorCode {
    /// Operation completed successfully.
    Ok = 0,

    /// Invalid pointer: null pointer passed where non-null required.
    NullPointer = 1,

    /// Invalid parameter: unknown selector, bad bounds or turbine geometry.
    InvalidParameter = 2,

    /// Input series empty or of mismatched lengths.
    InvalidSeries = 3,

    /// Too few samples to produce a result.
    InsufficientData = 4,

    /// Caller-provided output buffer is too small.
    BufferTooSmall = 5,
}

impl From<DefaultSitingError> for SitingErrorCode {
    fn from(error: DefaultSitingError) -> Self {
        error.code
    }
}

thread_local! {
    /// Thread-local storage for the most recent FFI error (C string, error code).
    /// The CString is owned here so pointers handed to C stay valid until the next call.
    static LAST_ERROR: RefCell<(Option<CString>, SitingErrorCode)> = const { RefCell::new((None, SitingErrorCode::Ok)) };
}

/// Internal helper to read `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error<F, R>(f: F) -> R
where
    F: FnOnce(&(Option<CString>, SitingErrorCode)) -> R,
{
    LAST_ERROR.with_borrow(f)
}

/// Internal helper to mutate `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut (Option<CString>, SitingErrorCode)) -> R,
{
    LAST_ERROR.with_borrow_mut(f)
}

/// Retrieve the most recent FFI error message as a null-terminated C string.
///
/// Returns:
/// - A borrowed pointer to the error message if the last call on this thread failed.
/// - `null` if the last call succeeded.
///
/// # Lifetime
/// The returned pointer is valid until the next FFI call on this thread.
///
/// **DO NOT FREE THIS POINTER** - it is managed internally.
///
/// Example:
/// ```c
/// WindsiteRegression fit;
/// if (windsite_mcp_fit(ref, tgt, n, 0, &fit) != Ok) {
///     const char* error = windsite_get_last_error();
///     if (error) {
///         printf("MCP fit failed: %s\n", error);
///     }
/// }
/// ```
#[no_mangle]
pub extern "C" fn windsite_get_last_error() -> *const c_char {
    with_last_error(|(cstring, _code)| cstring.as_ref().map_or(ptr::null(), |cs| cs.as_ptr()))
}

/// Retrieve the most recent FFI error code.
///
/// Error state is per thread; each thread sees only its own calls.
#[no_mangle]
pub extern "C" fn windsite_get_last_error_code() -> SitingErrorCode {
    with_last_error(|(_cstring, code)| *code)
}
