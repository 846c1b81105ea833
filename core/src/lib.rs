//! To-do item model with its JSON and CSV codecs.
//!
//! # Overview
//! `TodoItem` is a flat, immutable record. Two independent codecs view the
//! same record: a JSON object form (`json`) and a single-line,
//! separator-delimited form (`csv`). Both are pure functions with no I/O and
//! no logging; callers decide what to do with a record that fails to parse.
//!
//! # Design
//! - Parsing returns `Result<TodoItem, ParseError>`; the `from_*` variants
//!   drop the reason and return `Option`.
//! - Only `id`, `text` and `date_creation` can fail a parse. Every other field
//!   falls back to its default when missing or malformed.
//! - `field` holds the one table of wire keys, CSV column order and
//!   default-omission rules that both codecs walk.

pub mod csv;
pub mod error;
pub mod field;
pub mod item;
pub mod json;

pub use csv::CsvSeparator;
pub use error::{ParseError, UnknownVariant};
pub use field::{Field, CSV_COLUMNS};
pub use item::{Importance, Timestamp, TodoItem, TodoItemBuilder};

use serde_json::{Map, Value};

impl TodoItem {
    pub fn to_json(&self) -> Map<String, Value> {
        json::to_json(self)
    }

    pub fn from_json(value: &Value) -> Option<Self> {
        json::from_json(value)
    }

    pub fn to_csv(&self) -> String {
        csv::to_csv(self)
    }

    pub fn from_csv(line: &str) -> Option<Self> {
        csv::from_csv(line)
    }
}
