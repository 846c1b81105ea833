//! Cross-codec behavior of `TodoItem`.
//!
//! # Design
//! Items are built through the public builder, pushed through one or both
//! codecs and compared field-for-field. Items with a generated id and
//! creation time are used on purpose so defaults travel too.

use serde_json::{json, Value};
use todo_core::{CsvSeparator, Importance, Timestamp, TodoItem};

fn everything_set() -> TodoItem {
    TodoItem::builder("Renew passport")
        .importance(Importance::Important)
        .deadline(Some(Timestamp::from_secs(1_700_000_000.0)))
        .done(false)
        .changed_at(Some(Timestamp::from_secs(1_700_000_123.0)))
        .hex_color(Some("#0A0B0C".to_string()))
        .build()
}

fn nothing_set() -> TodoItem {
    TodoItem::new("Buy bread")
}

#[test]
fn json_roundtrip_preserves_items() {
    for item in [everything_set(), nothing_set()] {
        let value = Value::Object(item.to_json());
        assert_eq!(TodoItem::from_json(&value), Some(item));
    }
}

#[test]
fn csv_roundtrip_preserves_items() {
    for item in [everything_set(), nothing_set()] {
        assert_eq!(TodoItem::from_csv(&item.to_csv()), Some(item));
    }
}

#[test]
fn json_to_csv_and_back() {
    let item = everything_set();
    let via_csv = TodoItem::from_csv(&item.to_csv()).unwrap();
    let via_json = TodoItem::from_json(&Value::Object(via_csv.to_json())).unwrap();
    assert_eq!(via_json, item);
}

#[test]
fn minimal_json_gets_defaults() {
    let item = TodoItem::from_json(&json!({"id": "a", "text": "b", "date_creation": 0})).unwrap();
    assert_eq!(item.id(), "a");
    assert_eq!(item.text(), "b");
    assert_eq!(item.importance(), Importance::Ordinary);
    assert!(!item.is_done());
    assert_eq!(item.deadline(), None);
    assert_eq!(item.created_at(), Timestamp::from_secs(0.0));
    assert_eq!(item.changed_at(), None);
    assert_eq!(item.hex_color(), None);
}

#[test]
fn required_fields_are_enforced() {
    assert!(TodoItem::from_json(&json!({"text": "b", "date_creation": 0})).is_none());
    assert!(TodoItem::from_csv("").is_none());
    assert!(TodoItem::from_csv(";text;;;false;0;;").is_none());
}

#[test]
fn importance_is_only_written_when_not_ordinary() {
    let ordinary = TodoItem::new("x").to_json();
    assert!(!ordinary.contains_key("importance"));

    let important = TodoItem::new("x")
        .with_importance(Importance::Important)
        .to_json();
    assert_eq!(important["importance"], "important");
}

#[test]
fn deadline_is_encoded_as_epoch_seconds() {
    let item = TodoItem::new("x").with_deadline(Some(Timestamp::from_secs(1_700_000_000.0)));

    assert_eq!(item.to_json()["date_deadline"].as_f64(), Some(1_700_000_000.0));

    let line = item.to_csv();
    let columns: Vec<&str> = line.split(';').collect();
    assert_eq!(columns[3], "1700000000");
}

#[test]
fn absent_hex_color_keeps_eight_columns() {
    let line = nothing_set().to_csv();
    assert_eq!(line.split(';').count(), 8);
    assert!(line.ends_with(';'));
}

#[test]
fn empty_hex_color_column_reads_as_absent() {
    let item = TodoItem::from_csv("a;b;;;false;0;;").unwrap();
    assert_eq!(item.hex_color(), None);
}

#[test]
fn separator_inside_text_breaks_the_line() {
    let item = TodoItem::new("milk; eggs");
    assert_ne!(TodoItem::from_csv(&item.to_csv()), Some(item.clone()));
    assert_eq!(
        todo_core::csv::parse_csv_with(
            &todo_core::csv::to_csv_with(&item, CsvSeparator::Comma),
            CsvSeparator::Comma
        )
        .unwrap(),
        item
    );
}

#[test]
fn items_are_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<TodoItem>();

    let item = everything_set();
    let line = std::thread::spawn(move || item.to_csv()).join().unwrap();
    assert!(line.contains("Renew passport"));
}
