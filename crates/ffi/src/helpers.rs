use crate::error::{with_last_error_mut, DefaultSitingError, FfiError, SitingErrorCode};
use std::ffi::CString;
use std::slice;

/// Set the thread-local error message and code.
pub(crate) fn set_last_error(error: &impl FfiError) {
    with_last_error_mut(|(cstring, code)| {
        *cstring = CString::new(error.msg()).ok();
        *code = error.code();
    });
}

/// Track an error by setting it in thread-local storage and returning its code.
#[inline]
pub(crate) fn track_error(error: &impl FfiError) -> SitingErrorCode {
    set_last_error(error);
    error.code()
}

/// Clear the thread-local error message and code.
/// Called by every entry point before it reports success.
pub(crate) fn clear_last_error() {
    with_last_error_mut(|(cstring, code)| {
        *cstring = None;
        *code = SitingErrorCode::Ok;
    });
}

/// Run an entry point body, recording its error or clearing the last one.
pub(crate) fn handle_ffi_result<F>(f: F) -> SitingErrorCode
where
    F: FnOnce() -> Result<(), DefaultSitingError>,
{
    match f() {
        Ok(()) => {
            clear_last_error();
            SitingErrorCode::Ok
        }
        Err(error) => track_error(&error),
    }
}

/// Borrow a caller-owned input array.
///
/// A null pointer is accepted for an empty array.
///
/// # Safety
/// When non-null, `ptr` must point to `len` initialised values that stay
/// valid and unmodified for `'a`.
pub(crate) unsafe fn input_slice<'a, T>(
    ptr: *const T,
    len: usize,
    param_name: &str,
) -> Result<&'a [T], DefaultSitingError> {
    if len == 0 {
        return Ok(&[]);
    }
    if ptr.is_null() {
        return Err(DefaultSitingError::null_pointer(param_name));
    }
    // SAFETY: non-null and sized by the caller's contract
    Ok(unsafe { slice::from_raw_parts(ptr, len) })
}

/// Borrow a caller-owned output buffer of at least `required` elements.
///
/// # Safety
/// When non-null, `ptr` must point to `capacity` writable values that stay
/// valid and unaliased for `'a`.
pub(crate) unsafe fn output_slice<'a, T>(
    ptr: *mut T,
    capacity: usize,
    required: usize,
    param_name: &str,
) -> Result<&'a mut [T], DefaultSitingError> {
    if capacity < required {
        return Err(DefaultSitingError::buffer_too_small(param_name, required, capacity));
    }
    if required == 0 {
        return Ok(&mut []);
    }
    if ptr.is_null() {
        return Err(DefaultSitingError::null_pointer(param_name));
    }
    // SAFETY: non-null and sized by the caller's contract
    Ok(unsafe { slice::from_raw_parts_mut(ptr, required) })
}

/// Write a single result through a caller-owned pointer.
///
/// # Safety
/// When non-null, `ptr` must be valid for a write of `T`.
pub(crate) unsafe fn write_out<T>(ptr: *mut T, value: T, param_name: &str) -> Result<(), DefaultSitingError> {
    if ptr.is_null() {
        return Err(DefaultSitingError::null_pointer(param_name));
    }
    // SAFETY: non-null and valid for writes by the caller's contract
    unsafe { ptr.write(value) };
    Ok(())
}
