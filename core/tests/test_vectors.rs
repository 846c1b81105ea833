//! Verify both codecs against JSON test vectors stored in `test-vectors/`.
//!
//! Each case gives a raw input and either the expected re-serialized output or
//! a label for the expected error. JSON outputs are compared as parsed values
//! so key order does not matter.

use serde_json::Value;
use todo_core::{csv, json, ParseError};

/// Short, stable label for an error, as written in the vector files.
fn error_label(err: &ParseError) -> String {
    match err {
        ParseError::NotAnObject => "NotAnObject".to_string(),
        ParseError::NotAnArray => "NotAnArray".to_string(),
        ParseError::InvalidJson(_) => "InvalidJson".to_string(),
        ParseError::MissingField(field) => format!("MissingField({field})"),
        ParseError::WrongType(field) => format!("WrongType({field})"),
        ParseError::EmptyField(field) => format!("EmptyField({field})"),
        ParseError::InvalidTimestamp(field) => format!("InvalidTimestamp({field})"),
        ParseError::TooFewColumns { .. } => "TooFewColumns".to_string(),
        ParseError::Record { source, .. } => error_label(source),
    }
}

fn load(raw: &str) -> Vec<Value> {
    let vectors: Value = serde_json::from_str(raw).unwrap();
    vectors["cases"].as_array().unwrap().clone()
}

// ---------------------------------------------------------------------------
// JSON form
// ---------------------------------------------------------------------------

#[test]
fn json_test_vectors() {
    for case in load(include_str!("../../test-vectors/json.json")) {
        let name = case["name"].as_str().unwrap();
        let result = json::parse_json(&case["input"]);

        if let Some(expected_error) = case.get("expected_error") {
            let err = result.expect_err(name);
            assert_eq!(error_label(&err), expected_error.as_str().unwrap(), "{name}: error");
            assert!(json::from_json(&case["input"]).is_none(), "{name}: from_json");
        } else {
            let item = result.unwrap_or_else(|e| panic!("{name}: {e}"));
            let written = Value::Object(json::to_json(&item));
            assert_eq!(written, case["expected_result"], "{name}: serialized form");

            let again = json::parse_json(&written).unwrap();
            assert_eq!(again, item, "{name}: second pass");
        }
    }
}

// ---------------------------------------------------------------------------
// CSV form
// ---------------------------------------------------------------------------

#[test]
fn csv_test_vectors() {
    for case in load(include_str!("../../test-vectors/csv.json")) {
        let name = case["name"].as_str().unwrap();
        let input = case["input"].as_str().unwrap();
        let result = csv::parse_csv(input);

        if let Some(expected_error) = case.get("expected_error") {
            let err = result.expect_err(name);
            assert_eq!(error_label(&err), expected_error.as_str().unwrap(), "{name}: error");
            assert!(csv::from_csv(input).is_none(), "{name}: from_csv");
        } else {
            let item = result.unwrap_or_else(|e| panic!("{name}: {e}"));
            let written = csv::to_csv(&item);
            assert_eq!(written, case["expected_result"].as_str().unwrap(), "{name}: line");

            let again = csv::parse_csv(&written).unwrap();
            assert_eq!(again, item, "{name}: second pass");
        }
    }
}
