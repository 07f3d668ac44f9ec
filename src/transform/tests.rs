//! Tests for token efficiency transforms

use super::*;
use pretty_assertions::assert_eq;
use serde_json::json;

fn sample() -> Value {
    json!([
        {"id": 1, "name": "a"},
        {"id": 2, "name": "b"},
        {"id": 3, "name": "c"}
    ])
}

#[test]
fn test_count_wins_over_limit_and_fields() {
    let options = TokenEfficiencyOptions::new().count().limit(1).fields("id");
    assert_eq!(apply(sample(), &options), json!({"count": 3}));
}

#[test]
fn test_count_on_non_array_is_one() {
    let options = TokenEfficiencyOptions::new().count();
    assert_eq!(apply(json!({"id": 1}), &options), json!({"count": 1}));
    assert_eq!(apply(json!("text"), &options), json!({"count": 1}));
}

#[test]
fn test_count_on_empty_array() {
    let options = TokenEfficiencyOptions::new().count();
    assert_eq!(apply(json!([]), &options), json!({"count": 0}));
}

#[test]
fn test_limit_truncates() {
    let options = TokenEfficiencyOptions::new().limit(2);
    assert_eq!(
        apply(sample(), &options),
        json!([{"id": 1, "name": "a"}, {"id": 2, "name": "b"}])
    );
}

#[test]
fn test_limit_larger_than_len() {
    let options = TokenEfficiencyOptions::new().limit(10);
    assert_eq!(apply(sample(), &options), sample());
}

#[test]
fn test_limit_zero_is_no_limit() {
    let options = TokenEfficiencyOptions::new().limit(0);
    assert_eq!(apply(sample(), &options), sample());
    assert!(options.is_passthrough());
}

#[test]
fn test_limit_ignores_objects() {
    let options = TokenEfficiencyOptions::new().limit(1);
    let body = json!({"items": [1, 2, 3]});
    assert_eq!(apply(body.clone(), &options), body);
}

#[test]
fn test_fields_on_array() {
    let options = TokenEfficiencyOptions::new().fields("id");
    assert_eq!(
        apply(sample(), &options),
        json!([{"id": 1}, {"id": 2}, {"id": 3}])
    );
}

#[test]
fn test_fields_on_object_skips_missing_keys() {
    let options = TokenEfficiencyOptions::new().fields("id, status ,missing");
    let body = json!({"id": "p1", "status": "active", "config": {"x": 1}});
    assert_eq!(
        apply(body, &options),
        json!({"id": "p1", "status": "active"})
    );
}

#[test]
fn test_fields_on_scalar_passes_through() {
    let options = TokenEfficiencyOptions::new().fields("id");
    assert_eq!(apply(json!(42), &options), json!(42));
    assert_eq!(apply(json!(null), &options), json!(null));
}

#[test]
fn test_fields_keep_non_object_elements() {
    let options = TokenEfficiencyOptions::new().fields("id");
    assert_eq!(
        apply(json!([{"id": 1, "x": 2}, "raw"]), &options),
        json!([{"id": 1}, "raw"])
    );
}

#[test]
fn test_limit_then_fields() {
    let options = TokenEfficiencyOptions::new().limit(1).fields("name");
    assert_eq!(apply(sample(), &options), json!([{"name": "a"}]));
}

#[test]
fn test_no_options_passes_through() {
    let options = TokenEfficiencyOptions::default();
    assert!(options.is_passthrough());
    assert_eq!(apply(sample(), &options), sample());
}

#[test]
fn test_blank_fields_are_ignored() {
    let options = TokenEfficiencyOptions::new().fields(" , ");
    assert!(options.field_list().is_empty());
    assert_eq!(apply(sample(), &options), sample());
}
