//! Error types for the todo item codecs.
//!
//! # Design
//! Parsing is a partial function: a representation either yields a whole
//! `TodoItem` or a `ParseError`, never a partially filled item. Only the
//! required fields (`id`, `text`, `date_creation`) and the overall shape of
//! the input can fail a parse. Malformed optional fields fall back to their
//! defaults and never show up here.

use std::fmt;

use crate::field::Field;

/// Reasons a JSON object or CSV line could not be turned into a `TodoItem`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The JSON value is not an object.
    NotAnObject,

    /// The JSON document is not an array of item objects.
    NotAnArray,

    /// The input text is not valid JSON.
    InvalidJson(String),

    /// A required field is absent (or an empty CSV column for a timestamp).
    MissingField(Field),

    /// A required field is present with the wrong JSON type.
    WrongType(Field),

    /// `id` or `text` is present but empty.
    EmptyField(Field),

    /// A required timestamp is not a finite number.
    InvalidTimestamp(Field),

    /// The CSV line has fewer columns than the format requires.
    TooFewColumns { expected: usize, found: usize },

    /// A record inside a multi-item document failed. `position` is 1-based:
    /// the line number for CSV documents, the array index + 1 for JSON ones.
    Record { position: usize, source: Box<ParseError> },
}

impl ParseError {
    pub(crate) fn at(self, position: usize) -> Self {
        ParseError::Record {
            position,
            source: Box::new(self),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::NotAnObject => write!(f, "expected a JSON object"),
            ParseError::NotAnArray => write!(f, "expected a JSON array of items"),
            ParseError::InvalidJson(msg) => write!(f, "invalid JSON: {msg}"),
            ParseError::MissingField(field) => write!(f, "missing required field `{field}`"),
            ParseError::WrongType(field) => write!(f, "field `{field}` has the wrong type"),
            ParseError::EmptyField(field) => write!(f, "field `{field}` must not be empty"),
            ParseError::InvalidTimestamp(field) => {
                write!(f, "field `{field}` is not a valid timestamp")
            }
            ParseError::TooFewColumns { expected, found } => {
                write!(f, "expected at least {expected} columns, found {found}")
            }
            ParseError::Record { position, source } => write!(f, "record {position}: {source}"),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Record { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// Returned by `FromStr` for the small string enums (`Importance`,
/// `CsvSeparator`) when the input names no known variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} `{}`", self.kind, self.value)
    }
}

impl std::error::Error for UnknownVariant {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn display_names_the_field_key() {
        let err = ParseError::MissingField(Field::DateCreation);
        assert_eq!(err.to_string(), "missing required field `date_creation`");
    }

    #[test]
    fn record_wraps_position_and_source() {
        let err = ParseError::EmptyField(Field::Id).at(3);
        assert_eq!(err.to_string(), "record 3: field `id` must not be empty");
        assert!(err.source().is_some());
    }
}
