//! C-ABI Foreign Function Interface for swarmset.
//!
//! Lets a host application build a dataset from a workbook and receive it as
//! JSON without linking against Rust.
//!
//! # Memory Management
//!
//! All strings returned by this library must be freed using
//! `swarmset_free_string`. All dataset handles must be freed using
//! `swarmset_free_dataset`.
//!
//! # Error Handling
//!
//! Functions that can fail return a null pointer (or -1) on error. Use
//! `swarmset_last_error` to retrieve the error message.
//!
//! # Example (C)
//!
//! ```c
//! #include <stdio.h>
//! #include "swarmset.h"
//!
//! int main() {
//!     SwarmsetDataset* ds = swarmset_build_file("telemetry.xlsx");
//!     if (!ds) {
//!         fprintf(stderr, "Error: %s\n", swarmset_last_error());
//!         return 1;
//!     }
//!
//!     char* json = swarmset_to_json(ds, SWARMSET_JSON_COMPACT);
//!     if (json) {
//!         printf("%s\n", json);
//!         swarmset_free_string(json);
//!     }
//!
//!     swarmset_free_dataset(ds);
//!     return 0;
//! }
//! ```

use std::cell::RefCell;
use std::ffi::{c_char, c_int, CStr, CString};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::ptr;

use crate::model::Dataset;
use crate::render::JsonFormat;

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Opaque handle to a built dataset.
pub struct SwarmsetDataset {
    inner: Dataset,
}

/// JSON format options.
pub const SWARMSET_JSON_PRETTY: c_int = 0;
pub const SWARMSET_JSON_COMPACT: c_int = 1;

/// Box a build result into a handle, recording any failure.
fn into_handle<F>(build: F) -> *mut SwarmsetDataset
where
    F: FnOnce() -> Result<Dataset, String>,
{
    match catch_unwind(AssertUnwindSafe(build)) {
        Ok(Ok(dataset)) => Box::into_raw(Box::new(SwarmsetDataset { inner: dataset })),
        Ok(Err(e)) => {
            set_last_error(&e);
            ptr::null_mut()
        }
        Err(_) => {
            set_last_error("panic occurred while building dataset");
            ptr::null_mut()
        }
    }
}

/// Get the version of the library.
///
/// # Safety
///
/// Returns a static string that must not be freed.
#[no_mangle]
pub extern "C" fn swarmset_version() -> *const c_char {
    concat!(env!("CARGO_PKG_VERSION"), "\0").as_ptr() as *const c_char
}

/// Get the last error message.
///
/// # Safety
///
/// Returns a pointer to a thread-local error string. The pointer is valid
/// until the next call to any swarmset function on the same thread.
#[no_mangle]
pub extern "C" fn swarmset_last_error() -> *const c_char {
    LAST_ERROR.with(|e| {
        e.borrow()
            .as_ref()
            .map(|s| s.as_ptr())
            .unwrap_or(ptr::null())
    })
}

/// Build a dataset from a workbook file path.
///
/// # Safety
///
/// - `path` must be a valid null-terminated UTF-8 string.
/// - Returns null on error. Use `swarmset_last_error` to get the message.
/// - The returned handle must be freed with `swarmset_free_dataset`.
#[no_mangle]
pub unsafe extern "C" fn swarmset_build_file(path: *const c_char) -> *mut SwarmsetDataset {
    clear_last_error();

    if path.is_null() {
        set_last_error("path is null");
        return ptr::null_mut();
    }

    into_handle(|| {
        let path_str = CStr::from_ptr(path).to_str().map_err(|e| e.to_string())?;
        crate::build_dataset_from_file(path_str).map_err(|e| e.to_string())
    })
}

/// Build a dataset from workbook bytes.
///
/// # Safety
///
/// - `data` must point to at least `len` readable bytes.
/// - Returns null on error. Use `swarmset_last_error` to get the message.
/// - The returned handle must be freed with `swarmset_free_dataset`.
#[no_mangle]
pub unsafe extern "C" fn swarmset_build_bytes(data: *const u8, len: usize) -> *mut SwarmsetDataset {
    clear_last_error();

    if data.is_null() {
        set_last_error("data is null");
        return ptr::null_mut();
    }

    into_handle(|| {
        let bytes = std::slice::from_raw_parts(data, len);
        crate::build_dataset_from_bytes(bytes).map_err(|e| e.to_string())
    })
}

/// Free a dataset handle.
///
/// # Safety
///
/// - `dataset` must be a handle returned by `swarmset_build_file` or
///   `swarmset_build_bytes`, or null.
/// - After calling this function, the handle is invalid and must not be used.
#[no_mangle]
pub unsafe extern "C" fn swarmset_free_dataset(dataset: *mut SwarmsetDataset) {
    if !dataset.is_null() {
        drop(Box::from_raw(dataset));
    }
}

/// Serialize a dataset to JSON.
///
/// # Safety
///
/// - `dataset` must be a valid dataset handle.
/// - `format` is one of `SWARMSET_JSON_PRETTY` or `SWARMSET_JSON_COMPACT`.
/// - Returns null on error. Use `swarmset_last_error` to get the message.
/// - The returned string must be freed with `swarmset_free_string`.
#[no_mangle]
pub unsafe extern "C" fn swarmset_to_json(
    dataset: *const SwarmsetDataset,
    format: c_int,
) -> *mut c_char {
    clear_last_error();

    if dataset.is_null() {
        set_last_error("dataset is null");
        return ptr::null_mut();
    }

    let result = catch_unwind(AssertUnwindSafe(|| {
        let json_format = if format == SWARMSET_JSON_COMPACT {
            JsonFormat::Compact
        } else {
            JsonFormat::Pretty
        };
        crate::render::to_json(&(*dataset).inner, json_format).map_err(|e| e.to_string())
    }));

    match result {
        Ok(Ok(json)) => match CString::new(json) {
            Ok(s) => s.into_raw(),
            Err(_) => {
                set_last_error("output contains null byte");
                ptr::null_mut()
            }
        },
        Ok(Err(e)) => {
            set_last_error(&e);
            ptr::null_mut()
        }
        Err(_) => {
            set_last_error("panic occurred during rendering");
            ptr::null_mut()
        }
    }
}

/// Get the number of records in a dataset.
///
/// # Safety
///
/// - `dataset` must be a valid dataset handle.
/// - Returns -1 on error.
#[no_mangle]
pub unsafe extern "C" fn swarmset_record_count(dataset: *const SwarmsetDataset) -> c_int {
    if dataset.is_null() {
        set_last_error("dataset is null");
        return -1;
    }
    c_int::try_from((*dataset).inner.len()).unwrap_or(c_int::MAX)
}

/// Get the number of distinct drones in a dataset.
///
/// # Safety
///
/// - `dataset` must be a valid dataset handle.
/// - Returns -1 on error.
#[no_mangle]
pub unsafe extern "C" fn swarmset_drone_count(dataset: *const SwarmsetDataset) -> c_int {
    if dataset.is_null() {
        set_last_error("dataset is null");
        return -1;
    }
    c_int::try_from((*dataset).inner.metadata.total_drones).unwrap_or(c_int::MAX)
}

/// Free a string allocated by this library.
///
/// # Safety
///
/// - `s` must be a pointer returned by a swarmset function, or null.
/// - After calling this function, the pointer is invalid and must not be used.
#[no_mangle]
pub unsafe extern "C" fn swarmset_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}
