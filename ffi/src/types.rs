//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, `(has_x, x)` pairs instead of
//! `Option<Timestamp>`, a nullable pointer instead of `Option<String>`, and
//! enums with explicit discriminants. Conversion functions live here to keep
//! `lib.rs` focused on the `extern "C"` surface.

use std::ffi::{CStr, CString, NulError};
use std::os::raw::c_char;

use todo_core::{CsvSeparator, Importance, ParseError, Timestamp, TodoItem};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Task priority as a C enum.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiImportance {
    Unimportant = 0,
    Ordinary = 1,
    Important = 2,
}

impl From<Importance> for FfiImportance {
    fn from(i: Importance) -> Self {
        match i {
            Importance::Unimportant => FfiImportance::Unimportant,
            Importance::Ordinary => FfiImportance::Ordinary,
            Importance::Important => FfiImportance::Important,
        }
    }
}

impl From<FfiImportance> for Importance {
    fn from(i: FfiImportance) -> Self {
        match i {
            FfiImportance::Unimportant => Importance::Unimportant,
            FfiImportance::Ordinary => Importance::Ordinary,
            FfiImportance::Important => Importance::Important,
        }
    }
}

/// CSV column separator as a C enum.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiSeparator {
    Semicolon = 0,
    Comma = 1,
}

impl From<FfiSeparator> for CsvSeparator {
    fn from(s: FfiSeparator) -> Self {
        match s {
            FfiSeparator::Semicolon => CsvSeparator::Semicolon,
            FfiSeparator::Comma => CsvSeparator::Comma,
        }
    }
}

// ---------------------------------------------------------------------------
// Item
// ---------------------------------------------------------------------------

/// A to-do item exposed to C.
///
/// `date_deadline` and `date_changing` are only meaningful when the matching
/// `has_*` flag is set. `hex_color` is null when absent. Timestamps are
/// seconds since the Unix epoch.
#[repr(C)]
pub struct FfiTodoItem {
    pub id: *mut c_char,
    pub text: *mut c_char,
    pub importance: FfiImportance,
    pub has_date_deadline: bool,
    pub date_deadline: f64,
    pub is_done: bool,
    pub date_creation: f64,
    pub has_date_changing: bool,
    pub date_changing: f64,
    pub hex_color: *mut c_char,
}

impl FfiTodoItem {
    /// Copy a core item into freshly allocated C strings.
    ///
    /// Fails without allocating anything if a string field holds an interior
    /// NUL byte (possible for items parsed from JSON `\u0000` escapes).
    pub(crate) fn from_core(item: &TodoItem) -> Result<Self, NulError> {
        let id = CString::new(item.id())?;
        let text = CString::new(item.text())?;
        let hex_color = item.hex_color().map(CString::new).transpose()?;

        Ok(FfiTodoItem {
            id: id.into_raw(),
            text: text.into_raw(),
            importance: item.importance().into(),
            has_date_deadline: item.deadline().is_some(),
            date_deadline: item.deadline().map_or(0.0, Timestamp::as_secs),
            is_done: item.is_done(),
            date_creation: item.created_at().as_secs(),
            has_date_changing: item.changed_at().is_some(),
            date_changing: item.changed_at().map_or(0.0, Timestamp::as_secs),
            hex_color: hex_color.map_or(std::ptr::null_mut(), CString::into_raw),
        })
    }

    /// Read the C fields back into a core item.
    ///
    /// Returns `None` if `id` or `text` is null, any string is not UTF-8, or
    /// `date_creation` is not finite. A non-finite optional date is read as
    /// absent.
    ///
    /// # Safety
    /// Every non-null string pointer must point to a NUL-terminated buffer
    /// that stays alive for the duration of the call.
    pub(crate) unsafe fn to_core(&self) -> Option<TodoItem> {
        let id = read_str(self.id)?;
        let text = read_str(self.text)?;
        let created_at = Timestamp::try_from_secs(self.date_creation)?;
        let hex_color = if self.hex_color.is_null() {
            None
        } else {
            Some(read_str(self.hex_color)?.to_string())
        };

        Some(
            TodoItem::builder(text)
                .id(id)
                .importance(self.importance.into())
                .deadline(optional_timestamp(
                    self.has_date_deadline,
                    self.date_deadline,
                ))
                .done(self.is_done)
                .created_at(created_at)
                .changed_at(optional_timestamp(
                    self.has_date_changing,
                    self.date_changing,
                ))
                .hex_color(hex_color)
                .build(),
        )
    }

    /// Free the C-string fields (but not the struct itself).
    ///
    /// # Safety
    /// The fields must have been allocated by `from_core` and not freed yet.
    pub(crate) unsafe fn free_fields(&self) {
        for ptr in [self.id, self.text, self.hex_color] {
            if !ptr.is_null() {
                drop(CString::from_raw(ptr));
            }
        }
    }
}

fn optional_timestamp(present: bool, secs: f64) -> Option<Timestamp> {
    if present {
        Timestamp::try_from_secs(secs)
    } else {
        None
    }
}

/// Borrow a C string as `&str`. `None` for null or non-UTF-8 input.
///
/// # Safety
/// A non-null `ptr` must point to a NUL-terminated buffer that outlives `'a`.
pub(crate) unsafe fn read_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok()
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiTodoResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    Parse = 1,
    Encoding = 2,
    Panic = 3,
    NullArg = 4,
}

/// Result envelope for the parse operations.
///
/// On success `error_code` is `Ok`, `error_message` is null, and `item`
/// points to the parsed item. On failure `error_code` describes the category,
/// `error_message` is a human-readable C string, and `item` is null.
#[repr(C)]
pub struct FfiTodoResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub item: *mut FfiTodoItem,
}

impl FfiTodoResult {
    /// Build a success result carrying a copy of `item`.
    pub(crate) fn ok_item(item: &TodoItem) -> *mut Self {
        match FfiTodoItem::from_core(item) {
            Ok(ffi_item) => Self::boxed(
                FfiErrorCode::Ok,
                None,
                Box::into_raw(Box::new(ffi_item)),
            ),
            Err(err) => Self::boxed(
                FfiErrorCode::Encoding,
                Some(format!("item cannot be represented as C strings: {err}")),
                std::ptr::null_mut(),
            ),
        }
    }

    /// Build an error result from a `ParseError`.
    pub(crate) fn from_error(err: &ParseError) -> *mut Self {
        Self::boxed(
            FfiErrorCode::Parse,
            Some(err.to_string()),
            std::ptr::null_mut(),
        )
    }

    /// Build an error result for a null (or non-UTF-8) argument.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::boxed(
            FfiErrorCode::NullArg,
            Some(format!("null argument: {name}")),
            std::ptr::null_mut(),
        )
    }

    /// Build an error result for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::boxed(FfiErrorCode::Panic, Some(msg.to_string()), std::ptr::null_mut())
    }

    fn boxed(
        error_code: FfiErrorCode,
        message: Option<String>,
        item: *mut FfiTodoItem,
    ) -> *mut Self {
        let error_message = match message {
            Some(msg) => CString::new(msg).unwrap_or_default().into_raw(),
            None => std::ptr::null_mut(),
        };
        Box::into_raw(Box::new(FfiTodoResult {
            error_code,
            error_message,
            item,
        }))
    }
}
