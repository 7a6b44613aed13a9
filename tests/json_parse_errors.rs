//! Purpose: Regression coverage for parse-failure category mapping.
//! Exports: Integration tests only.
//! Role: Verify stable category labels used in entry decode hints.
//! Invariants: Category mapping remains deterministic for representative messages.
//! Invariants: Tests avoid payload leakage; assertions target category/hint text only.
//! Notes: Uses source include to exercise internal helper logic without widening API surface.

#[path = "../src/json/parse.rs"]
mod parse;

use parse::ParseFailureCategory;
use serde_json::Value;

#[test]
fn decodes_entry_arrays() {
    let values: Vec<Value> = parse::from_str(r#"["ARD", "Tagesschau", 3]"#).expect("array");
    assert_eq!(values.len(), 3);
    assert_eq!(values[1], "Tagesschau");
}

#[test]
fn category_mapping_handles_representative_messages() {
    assert_eq!(
        parse::categorize_message("InvalidUtf8 at character 3"),
        ParseFailureCategory::Utf8
    );
    assert_eq!(
        parse::categorize_message("recursion limit exceeded while parsing"),
        ParseFailureCategory::DepthLimit
    );
    assert_eq!(
        parse::categorize_message("InvalidNumber at character 9"),
        ParseFailureCategory::NumericRange
    );
    assert_eq!(
        parse::categorize_message("Eof at character 12"),
        ParseFailureCategory::Truncated
    );
    assert_eq!(
        parse::categorize_message("ExpectedArrayComma at character 8"),
        ParseFailureCategory::Syntax
    );
}

#[test]
fn hint_contains_category_and_context() {
    let err = parse::from_str::<Vec<Value>>(r#"["ARD" "Tagesschau"]"#).unwrap_err();
    let hint = parse::hint_for_error(&err, "movie entry");
    assert!(hint.starts_with("parse category: "));
    assert!(hint.contains("context: movie entry"));
}

#[test]
fn unknown_category_fallback_is_stable() {
    assert_eq!(
        parse::categorize_message("opaque parser issue"),
        ParseFailureCategory::Unknown
    );
    assert_eq!(ParseFailureCategory::Unknown.label(), "unknown");
}
