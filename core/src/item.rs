//! The `TodoItem` value type and its small companions.
//!
//! # Design
//! `TodoItem` is an immutable value: fields are private and every change goes
//! through a consuming `with_*` method that returns the updated copy. `id` and
//! `date_creation` have no such method, so they stay fixed for the lifetime of
//! an item once built.
//!
//! Construction never fails. Defaults (generated id, creation time of "now",
//! `Importance::Ordinary`, not done) are applied by `TodoItemBuilder::build`.
//! Emptiness of `id`/`text` is only checked on the parse paths.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::UnknownVariant;

// ---------------------------------------------------------------------------
// Timestamp
// ---------------------------------------------------------------------------

/// A point in time as seconds since the Unix epoch.
///
/// Both wire forms carry timestamps as floating point seconds, so the value
/// is stored exactly the way it travels.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(f64);

impl Timestamp {
    pub fn now() -> Self {
        Self::from(Utc::now())
    }

    /// Unchecked: NaN and infinities are stored as given, but neither wire
    /// form can carry them, so such an item will not parse back. Use
    /// `try_from_secs` for values that come from outside the program.
    pub fn from_secs(secs: f64) -> Self {
        Self(secs)
    }

    /// Like `from_secs`, but rejects NaN and infinities.
    pub fn try_from_secs(secs: f64) -> Option<Self> {
        secs.is_finite().then_some(Self(secs))
    }

    pub fn as_secs(self) -> f64 {
        self.0
    }

    /// Convert to a calendar time. `None` when the value is outside the
    /// range chrono can represent.
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        if !self.0.is_finite() {
            return None;
        }
        let mut secs = self.0.floor();
        let mut nanos = ((self.0 - secs) * 1e9).round();
        if nanos >= 1e9 {
            secs += 1.0;
            nanos = 0.0;
        }
        if secs < i64::MIN as f64 || secs > i64::MAX as f64 {
            return None;
        }
        DateTime::from_timestamp(secs as i64, nanos as u32)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt.timestamp() as f64 + f64::from(dt.timestamp_subsec_nanos()) / 1e9)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Importance
// ---------------------------------------------------------------------------

/// Priority of a task. `Ordinary` is the default and is left off the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Unimportant,
    #[default]
    Ordinary,
    Important,
}

impl Importance {
    pub fn as_str(self) -> &'static str {
        match self {
            Importance::Unimportant => "unimportant",
            Importance::Ordinary => "ordinary",
            Importance::Important => "important",
        }
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exact, case-sensitive match on the lowercase names.
impl FromStr for Importance {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unimportant" => Ok(Importance::Unimportant),
            "ordinary" => Ok(Importance::Ordinary),
            "important" => Ok(Importance::Important),
            other => Err(UnknownVariant {
                kind: "importance",
                value: other.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// TodoItem
// ---------------------------------------------------------------------------

/// A single entry of a to-do list.
#[derive(Debug, Clone, PartialEq)]
pub struct TodoItem {
    id: String,
    text: String,
    importance: Importance,
    deadline: Option<Timestamp>,
    is_done: bool,
    created_at: Timestamp,
    changed_at: Option<Timestamp>,
    hex_color: Option<String>,
}

impl TodoItem {
    /// An item with every optional field defaulted.
    pub fn new(text: impl Into<String>) -> Self {
        Self::builder(text).build()
    }

    pub fn builder(text: impl Into<String>) -> TodoItemBuilder {
        TodoItemBuilder::new(text)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn importance(&self) -> Importance {
        self.importance
    }

    pub fn deadline(&self) -> Option<Timestamp> {
        self.deadline
    }

    pub fn is_done(&self) -> bool {
        self.is_done
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Time of the last modification; `None` if never modified.
    pub fn changed_at(&self) -> Option<Timestamp> {
        self.changed_at
    }

    pub fn hex_color(&self) -> Option<&str> {
        self.hex_color.as_deref()
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..self
        }
    }

    pub fn with_importance(self, importance: Importance) -> Self {
        Self { importance, ..self }
    }

    pub fn with_deadline(self, deadline: Option<Timestamp>) -> Self {
        Self { deadline, ..self }
    }

    pub fn with_done(self, is_done: bool) -> Self {
        Self { is_done, ..self }
    }

    pub fn with_changed_at(self, changed_at: Option<Timestamp>) -> Self {
        Self { changed_at, ..self }
    }

    pub fn with_hex_color(self, hex_color: Option<String>) -> Self {
        Self { hex_color, ..self }
    }

    /// Stamp `date_changing` with the current time.
    pub fn touched(self) -> Self {
        self.with_changed_at(Some(Timestamp::now()))
    }
}

/// Collects constructor arguments; anything left unset gets its default in
/// `build`.
#[derive(Debug, Clone)]
pub struct TodoItemBuilder {
    id: Option<String>,
    text: String,
    importance: Importance,
    deadline: Option<Timestamp>,
    is_done: bool,
    created_at: Option<Timestamp>,
    changed_at: Option<Timestamp>,
    hex_color: Option<String>,
}

impl TodoItemBuilder {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: None,
            text: text.into(),
            importance: Importance::default(),
            deadline: None,
            is_done: false,
            created_at: None,
            changed_at: None,
            hex_color: None,
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn importance(mut self, importance: Importance) -> Self {
        self.importance = importance;
        self
    }

    pub fn deadline(mut self, deadline: Option<Timestamp>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn done(mut self, is_done: bool) -> Self {
        self.is_done = is_done;
        self
    }

    pub fn created_at(mut self, created_at: Timestamp) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn changed_at(mut self, changed_at: Option<Timestamp>) -> Self {
        self.changed_at = changed_at;
        self
    }

    pub fn hex_color(mut self, hex_color: Option<String>) -> Self {
        self.hex_color = hex_color;
        self
    }

    pub fn build(self) -> TodoItem {
        TodoItem {
            id: self.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            text: self.text,
            importance: self.importance,
            deadline: self.deadline,
            is_done: self.is_done,
            created_at: self.created_at.unwrap_or_else(Timestamp::now),
            changed_at: self.changed_at,
            hex_color: self.hex_color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_applies_defaults() {
        let before = Timestamp::now();
        let item = TodoItem::new("Buy milk");

        assert!(Uuid::parse_str(item.id()).is_ok());
        assert_eq!(item.text(), "Buy milk");
        assert_eq!(item.importance(), Importance::Ordinary);
        assert_eq!(item.deadline(), None);
        assert!(!item.is_done());
        assert!(item.created_at() >= before);
        assert_eq!(item.changed_at(), None);
        assert_eq!(item.hex_color(), None);
    }

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(TodoItem::new("a").id(), TodoItem::new("a").id());
    }

    #[test]
    fn construction_does_not_validate_text() {
        let item = TodoItem::builder("").id("").build();
        assert_eq!(item.text(), "");
        assert_eq!(item.id(), "");
    }

    #[test]
    fn with_methods_keep_identity() {
        let item = TodoItem::builder("draft")
            .id("fixed")
            .created_at(Timestamp::from_secs(10.0))
            .build();
        let edited = item
            .clone()
            .with_text("final")
            .with_importance(Importance::Important)
            .with_done(true)
            .with_hex_color(Some("#ff0000".to_string()));

        assert_eq!(edited.id(), "fixed");
        assert_eq!(edited.created_at(), Timestamp::from_secs(10.0));
        assert_eq!(edited.text(), "final");
        assert_eq!(edited.importance(), Importance::Important);
        assert!(edited.is_done());
        assert_eq!(edited.hex_color(), Some("#ff0000"));
        assert_eq!(item.text(), "draft");
    }

    #[test]
    fn touched_sets_changed_at() {
        let item = TodoItem::new("x").touched();
        assert!(item.changed_at().is_some());
    }

    #[test]
    fn importance_parses_exact_names_only() {
        assert_eq!("important".parse(), Ok(Importance::Important));
        assert_eq!("unimportant".parse(), Ok(Importance::Unimportant));
        assert!("Important".parse::<Importance>().is_err());
        assert!("".parse::<Importance>().is_err());
    }

    #[test]
    fn importance_serde_uses_lowercase() {
        let json = serde_json::to_value(Importance::Unimportant).unwrap();
        assert_eq!(json, "unimportant");
    }

    #[test]
    fn timestamp_rejects_non_finite() {
        assert!(Timestamp::try_from_secs(f64::NAN).is_none());
        assert!(Timestamp::try_from_secs(f64::INFINITY).is_none());
        assert_eq!(
            Timestamp::try_from_secs(1.5),
            Some(Timestamp::from_secs(1.5))
        );
    }

    #[test]
    fn unchecked_non_finite_timestamp_does_not_survive_the_wire() {
        let item = TodoItem::builder("x")
            .id("a")
            .created_at(Timestamp::from_secs(f64::NAN))
            .build();
        assert!(crate::json::from_json(&serde_json::Value::Object(item.to_json())).is_none());
        assert!(crate::csv::from_csv(&item.to_csv()).is_none());
    }

    #[test]
    fn timestamp_converts_to_and_from_chrono() {
        let ts = Timestamp::from_secs(1_700_000_000.0);
        let dt = ts.to_datetime().unwrap();
        assert_eq!(dt.timestamp(), 1_700_000_000);
        assert_eq!(Timestamp::from(dt), ts);

        let half = Timestamp::from_secs(1.5).to_datetime().unwrap();
        assert_eq!(half.timestamp_subsec_millis(), 500);
    }

    #[test]
    fn timestamp_displays_integral_values_without_fraction() {
        assert_eq!(Timestamp::from_secs(1_700_000_000.0).to_string(), "1700000000");
        assert_eq!(Timestamp::from_secs(0.25).to_string(), "0.25");
    }
}
