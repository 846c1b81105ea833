//! The field table shared by both codecs.
//!
//! Every per-field fact the codecs need lives here: the wire key, the CSV
//! column order and the rule for leaving a field off the wire when it holds
//! its default. The JSON and CSV modules only walk this table, so the two
//! forms cannot drift apart.

use std::fmt;

use crate::item::{Importance, TodoItem};

/// One attribute of a `TodoItem` as it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    Text,
    Importance,
    DateDeadline,
    IsDone,
    DateCreation,
    DateChanging,
    HexColor,
}

/// Column order of the CSV form. Shared by the writer and the parser.
pub const CSV_COLUMNS: [Field; 8] = [
    Field::Id,
    Field::Text,
    Field::Importance,
    Field::DateDeadline,
    Field::IsDone,
    Field::DateCreation,
    Field::DateChanging,
    Field::HexColor,
];

/// Lines with only the first seven columns are accepted; the trailing
/// `hex_color` column was left off by older writers when it was absent.
pub const CSV_MIN_COLUMNS: usize = 7;

impl Field {
    /// Key in the JSON form, also used in error messages.
    pub fn key(self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Text => "text",
            Field::Importance => "importance",
            Field::DateDeadline => "date_deadline",
            Field::IsDone => "is_done",
            Field::DateCreation => "date_creation",
            Field::DateChanging => "date_changing",
            Field::HexColor => "hex_color",
        }
    }

    /// Position in `CSV_COLUMNS`.
    pub fn column(self) -> usize {
        CSV_COLUMNS
            .iter()
            .position(|&field| field == self)
            .unwrap_or(CSV_COLUMNS.len())
    }

    /// Whether `item` holds the default for this field, in which case JSON
    /// omits the key and CSV writes an empty column.
    pub fn is_omitted(self, item: &TodoItem) -> bool {
        match self {
            Field::Id | Field::Text | Field::IsDone | Field::DateCreation => false,
            Field::Importance => item.importance() == Importance::Ordinary,
            Field::DateDeadline => item.deadline().is_none(),
            Field::DateChanging => item.changed_at().is_none(),
            Field::HexColor => item.hex_color().is_none(),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
