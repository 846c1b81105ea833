//! JSON form of a `TodoItem`.
//!
//! # Design
//! Parsing works on an untyped `serde_json::Value` rather than a derived
//! struct because the rules are lenient in a way serde attributes cannot
//! express: an optional field with the wrong type is treated as absent instead
//! of failing the whole object. Only `id`, `text` and `date_creation` can fail
//! a parse.
//!
//! `TodoItem` still implements `Serialize`/`Deserialize` on top of these
//! functions, so it can be embedded in larger serde documents.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::ParseError;
use crate::field::{Field, CSV_COLUMNS};
use crate::item::{Timestamp, TodoItem};

/// Build the JSON object for `item`. Fields holding their default are left
/// out; key order is not significant.
pub fn to_json(item: &TodoItem) -> Map<String, Value> {
    CSV_COLUMNS
        .iter()
        .filter(|field| !field.is_omitted(item))
        .filter_map(|&field| value_of(field, item).map(|value| (field.key().to_string(), value)))
        .collect()
}

pub fn to_json_string(item: &TodoItem) -> String {
    Value::Object(to_json(item)).to_string()
}

/// `None` for an absent optional field, which `Field::is_omitted` has
/// already filtered out.
fn value_of(field: Field, item: &TodoItem) -> Option<Value> {
    match field {
        Field::Id => Some(Value::from(item.id())),
        Field::Text => Some(Value::from(item.text())),
        Field::Importance => Some(Value::from(item.importance().as_str())),
        Field::DateDeadline => item.deadline().map(timestamp_value),
        Field::IsDone => Some(Value::from(item.is_done())),
        Field::DateCreation => Some(timestamp_value(item.created_at())),
        Field::DateChanging => item.changed_at().map(timestamp_value),
        Field::HexColor => item.hex_color().map(Value::from),
    }
}

fn timestamp_value(ts: Timestamp) -> Value {
    Value::from(ts.as_secs())
}

/// Interpret a JSON value as an item, reporting why it was rejected.
pub fn parse_json(value: &Value) -> Result<TodoItem, ParseError> {
    let object = value.as_object().ok_or(ParseError::NotAnObject)?;

    let id = required_str(object, Field::Id)?;
    let text = required_str(object, Field::Text)?;
    let created_at = match object.get(Field::DateCreation.key()) {
        None | Some(Value::Null) => return Err(ParseError::MissingField(Field::DateCreation)),
        Some(value) => value
            .as_f64()
            .ok_or(ParseError::WrongType(Field::DateCreation))
            .and_then(|secs| {
                Timestamp::try_from_secs(secs)
                    .ok_or(ParseError::InvalidTimestamp(Field::DateCreation))
            })?,
    };

    let importance = object
        .get(Field::Importance.key())
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok())
        .unwrap_or_default();
    let is_done = object
        .get(Field::IsDone.key())
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let hex_color = object
        .get(Field::HexColor.key())
        .and_then(Value::as_str)
        .map(str::to_owned);

    Ok(TodoItem::builder(text)
        .id(id)
        .importance(importance)
        .deadline(optional_timestamp(object, Field::DateDeadline))
        .done(is_done)
        .created_at(created_at)
        .changed_at(optional_timestamp(object, Field::DateChanging))
        .hex_color(hex_color)
        .build())
}

/// `parse_json` without the reason.
pub fn from_json(value: &Value) -> Option<TodoItem> {
    parse_json(value).ok()
}

/// Parse JSON text holding a single item object.
pub fn parse_json_str(input: &str) -> Result<TodoItem, ParseError> {
    let value: Value =
        serde_json::from_str(input).map_err(|e| ParseError::InvalidJson(e.to_string()))?;
    parse_json(&value)
}

/// Parse a JSON array of item objects. The outer error covers the document
/// shape; each element gets its own result so callers can skip bad records.
pub fn parse_array(value: &Value) -> Result<Vec<Result<TodoItem, ParseError>>, ParseError> {
    let elements = value.as_array().ok_or(ParseError::NotAnArray)?;
    Ok(elements
        .iter()
        .enumerate()
        .map(|(index, element)| parse_json(element).map_err(|e| e.at(index + 1)))
        .collect())
}

fn required_str(object: &Map<String, Value>, field: Field) -> Result<String, ParseError> {
    match object.get(field.key()) {
        None | Some(Value::Null) => Err(ParseError::MissingField(field)),
        Some(Value::String(s)) if s.is_empty() => Err(ParseError::EmptyField(field)),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(ParseError::WrongType(field)),
    }
}

fn optional_timestamp(object: &Map<String, Value>, field: Field) -> Option<Timestamp> {
    object
        .get(field.key())
        .and_then(Value::as_f64)
        .and_then(Timestamp::try_from_secs)
}

impl Serialize for TodoItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        to_json(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TodoItem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        parse_json(&value).map_err(D::Error::custom)
    }
}
