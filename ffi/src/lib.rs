//! C-ABI wrapper around `todo-core`.
//!
//! # Overview
//! Exposes item construction and both codecs (JSON object form, CSV line
//! form) through `extern "C"` functions so any language with a C FFI can work
//! with to-do items without linking Rust types or serde directly.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Parse functions return a single `FfiTodoResult` envelope; serialize
//!   functions return an owned C string or null.
//! - Parse failures are reported through `log` at debug level. The host
//!   installs whatever logger it wants; none is set up here.
//! - The C caller owns all returned pointers and must call the matching
//!   `todo_*_free` function to release them.

pub mod types;

use std::ffi::CString;
use std::os::raw::c_char;
use std::panic::catch_unwind;

use log::debug;
use todo_core::{csv, json, CsvSeparator, TodoItem};

use types::*;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "\0");

/// Library version as a static, NUL-terminated string. Never free it.
#[unsafe(no_mangle)]
pub extern "C" fn todo_ffi_version() -> *const c_char {
    VERSION.as_ptr() as *const c_char
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

/// Create a new item with a generated id and the current time as its
/// creation date. Every other optional field is left at its default.
///
/// Returns null if `text` is null or not UTF-8.
/// The caller must free the returned pointer with `todo_item_free`.
#[unsafe(no_mangle)]
pub extern "C" fn todo_item_new(
    text: *const c_char,
    importance: FfiImportance,
) -> *mut FfiTodoItem {
    catch_unwind(|| {
        let Some(text) = (unsafe { read_str(text) }) else {
            return std::ptr::null_mut();
        };
        let item = TodoItem::builder(text).importance(importance.into()).build();
        match FfiTodoItem::from_core(&item) {
            Ok(ffi_item) => Box::into_raw(Box::new(ffi_item)),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Parse functions
// ---------------------------------------------------------------------------

/// Parse JSON text holding one item object.
///
/// Returns a result with `error_code = Ok` and a non-null `item` on success.
#[unsafe(no_mangle)]
pub extern "C" fn todo_item_parse_json(input: *const c_char) -> *mut FfiTodoResult {
    catch_unwind(|| {
        let Some(input) = (unsafe { read_str(input) }) else {
            return FfiTodoResult::null_arg("input");
        };
        match json::parse_json_str(input) {
            Ok(item) => FfiTodoResult::ok_item(&item),
            Err(err) => {
                debug!("event=parse_failed form=json reason={err}");
                FfiTodoResult::from_error(&err)
            }
        }
    })
    .unwrap_or_else(|_| FfiTodoResult::panic("panic in todo_item_parse_json"))
}

/// Parse one CSV line using `separator`.
///
/// Returns a result with `error_code = Ok` and a non-null `item` on success.
#[unsafe(no_mangle)]
pub extern "C" fn todo_item_parse_csv(
    line: *const c_char,
    separator: FfiSeparator,
) -> *mut FfiTodoResult {
    catch_unwind(|| {
        let Some(line) = (unsafe { read_str(line) }) else {
            return FfiTodoResult::null_arg("line");
        };
        match csv::parse_csv_with(line, CsvSeparator::from(separator)) {
            Ok(item) => FfiTodoResult::ok_item(&item),
            Err(err) => {
                debug!("event=parse_failed form=csv reason={err}");
                FfiTodoResult::from_error(&err)
            }
        }
    })
    .unwrap_or_else(|_| FfiTodoResult::panic("panic in todo_item_parse_csv"))
}

// ---------------------------------------------------------------------------
// Serialize functions
// ---------------------------------------------------------------------------

/// Read an item handed in by the caller. The struct may be one returned by
/// this library or one the caller filled in itself.
fn item_from_ptr(item: *const FfiTodoItem) -> Option<TodoItem> {
    if item.is_null() {
        return None;
    }
    unsafe { (*item).to_core() }
}

fn into_c_string(s: String) -> *mut c_char {
    CString::new(s)
        .map(CString::into_raw)
        .unwrap_or(std::ptr::null_mut())
}

/// Serialize an item to its JSON object form.
///
/// Returns null if `item` is null or its `id`/`text` is null or not UTF-8.
/// The caller must free the returned string with `todo_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn todo_item_to_json(item: *const FfiTodoItem) -> *mut c_char {
    catch_unwind(|| match item_from_ptr(item) {
        Some(item) => into_c_string(json::to_json_string(&item)),
        None => std::ptr::null_mut(),
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Serialize an item to a CSV line using `separator`.
///
/// Returns null under the same conditions as `todo_item_to_json`.
/// The caller must free the returned string with `todo_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn todo_item_to_csv(
    item: *const FfiTodoItem,
    separator: FfiSeparator,
) -> *mut c_char {
    catch_unwind(|| match item_from_ptr(item) {
        Some(item) => into_c_string(csv::to_csv_with(&item, separator.into())),
        None => std::ptr::null_mut(),
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiTodoItem` returned by `todo_item_new`. Safe to call with null.
/// Items owned by an `FfiTodoResult` are released by `todo_free_result`.
#[unsafe(no_mangle)]
pub extern "C" fn todo_item_free(item: *mut FfiTodoItem) {
    if item.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let item = unsafe { Box::from_raw(item) };
        unsafe { item.free_fields() };
    });
}

/// Free an `FfiTodoResult` returned by any `todo_item_parse_*` function,
/// including the item it carries. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn todo_free_result(result: *mut FfiTodoResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        if !result.error_message.is_null() {
            drop(unsafe { CString::from_raw(result.error_message) });
        }
        if !result.item.is_null() {
            let item = unsafe { Box::from_raw(result.item) };
            unsafe { item.free_fields() };
        }
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn todo_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { CString::from_raw(s) });
        });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
