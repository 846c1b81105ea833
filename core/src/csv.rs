//! CSV form of a `TodoItem`: one line of positional, separator-joined fields.
//!
//! # Design
//! Column positions come from `field::CSV_COLUMNS`; nothing here hardcodes an
//! index. Every optional field writes an empty column when absent, so a
//! written line always has exactly eight columns. The parser also accepts
//! seven-column lines (no `hex_color`) and ignores anything past the eighth.
//!
//! There is no quoting or escaping. A `text` containing the separator will
//! shift every following column and the line will not read back; callers
//! that need a readable document check `unwritable_field` first.

use std::fmt;
use std::str::FromStr;

use crate::error::{ParseError, UnknownVariant};
use crate::field::{Field, CSV_COLUMNS, CSV_MIN_COLUMNS};
use crate::item::{Timestamp, TodoItem};

/// Column separator. Items are written with `Semicolon` unless the caller
/// opts into `Comma`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CsvSeparator {
    Comma,
    #[default]
    Semicolon,
}

impl CsvSeparator {
    pub fn as_char(self) -> char {
        match self {
            CsvSeparator::Comma => ',',
            CsvSeparator::Semicolon => ';',
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CsvSeparator::Comma => ",",
            CsvSeparator::Semicolon => ";",
        }
    }
}

impl fmt::Display for CsvSeparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CsvSeparator::Comma => "comma",
            CsvSeparator::Semicolon => "semicolon",
        })
    }
}

/// Accepts the name (`comma`, `semicolon`) or the character itself.
impl FromStr for CsvSeparator {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "comma" | "," => Ok(CsvSeparator::Comma),
            "semicolon" | ";" => Ok(CsvSeparator::Semicolon),
            other => Err(UnknownVariant {
                kind: "separator",
                value: other.to_string(),
            }),
        }
    }
}

/// Write `item` as a semicolon-separated line.
pub fn to_csv(item: &TodoItem) -> String {
    to_csv_with(item, CsvSeparator::Semicolon)
}

pub fn to_csv_with(item: &TodoItem, separator: CsvSeparator) -> String {
    CSV_COLUMNS
        .iter()
        .map(|&field| {
            if field.is_omitted(item) {
                String::new()
            } else {
                text_of(field, item)
            }
        })
        .collect::<Vec<_>>()
        .join(separator.as_str())
}

fn text_of(field: Field, item: &TodoItem) -> String {
    match field {
        Field::Id => item.id().to_string(),
        Field::Text => item.text().to_string(),
        Field::Importance => item.importance().to_string(),
        Field::DateDeadline => item.deadline().map(|ts| ts.to_string()).unwrap_or_default(),
        Field::IsDone => item.is_done().to_string(),
        Field::DateCreation => item.created_at().to_string(),
        Field::DateChanging => item.changed_at().map(|ts| ts.to_string()).unwrap_or_default(),
        Field::HexColor => item.hex_color().unwrap_or_default().to_string(),
    }
}

/// The first string column whose value would break the line: one holding
/// `separator` or a line break.
pub fn unwritable_field(item: &TodoItem, separator: CsvSeparator) -> Option<Field> {
    let breaks_line = |s: &str| s.contains([separator.as_char(), '\n', '\r']);
    [
        (Field::Id, Some(item.id())),
        (Field::Text, Some(item.text())),
        (Field::HexColor, item.hex_color()),
    ]
    .into_iter()
    .find_map(|(field, value)| value.filter(|&s| breaks_line(s)).map(|_| field))
}

/// Read a semicolon-separated line.
pub fn parse_csv(line: &str) -> Result<TodoItem, ParseError> {
    parse_csv_with(line, CsvSeparator::Semicolon)
}

/// `parse_csv` without the reason.
pub fn from_csv(line: &str) -> Option<TodoItem> {
    parse_csv(line).ok()
}

pub fn parse_csv_with(line: &str, separator: CsvSeparator) -> Result<TodoItem, ParseError> {
    let columns: Vec<&str> = line.split(separator.as_char()).collect();
    if columns.len() < CSV_MIN_COLUMNS {
        return Err(ParseError::TooFewColumns {
            expected: CSV_MIN_COLUMNS,
            found: columns.len(),
        });
    }
    let column = |field: Field| columns.get(field.column()).copied().unwrap_or("");

    let id = non_empty(column(Field::Id), Field::Id)?;
    let text = non_empty(column(Field::Text), Field::Text)?;
    let created_at = match column(Field::DateCreation) {
        "" => return Err(ParseError::MissingField(Field::DateCreation)),
        raw => parse_timestamp(raw).ok_or(ParseError::InvalidTimestamp(Field::DateCreation))?,
    };

    let hex_color = match column(Field::HexColor) {
        "" => None,
        raw => Some(raw.to_string()),
    };

    Ok(TodoItem::builder(text)
        .id(id)
        .importance(column(Field::Importance).parse().unwrap_or_default())
        .deadline(parse_timestamp(column(Field::DateDeadline)))
        .done(column(Field::IsDone).parse().unwrap_or(false))
        .created_at(created_at)
        .changed_at(parse_timestamp(column(Field::DateChanging)))
        .hex_color(hex_color)
        .build())
}

fn non_empty(raw: &str, field: Field) -> Result<&str, ParseError> {
    if raw.is_empty() {
        Err(ParseError::EmptyField(field))
    } else {
        Ok(raw)
    }
}

fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    raw.parse::<f64>().ok().and_then(Timestamp::try_from_secs)
}

/// Parse a document of one item per line. Blank lines are skipped; errors
/// carry the 1-based line number.
pub fn parse_lines(
    input: &str,
    separator: CsvSeparator,
) -> impl Iterator<Item = Result<TodoItem, ParseError>> + '_ {
    input
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(move |(index, line)| parse_csv_with(line, separator).map_err(|e| e.at(index + 1)))
}

/// Write one line per item, joined with `\n` (no trailing newline).
pub fn write_lines(items: &[TodoItem], separator: CsvSeparator) -> String {
    items
        .iter()
        .map(|item| to_csv_with(item, separator))
        .collect::<Vec<_>>()
        .join("\n")
}
