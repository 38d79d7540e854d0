//! Tests for walking arrays of records, primitives and nested arrays.

use avrocheck::{validate_against_schema, Schema};
use serde_json::{json, Value};

fn errors(schema: &Schema, payload: Value) -> Vec<String> {
    validate_against_schema(schema, &payload).unwrap()
}

fn roster() -> Schema {
    Schema::parse(&json!({
        "type": "record",
        "name": "Roster",
        "fields": [
            {"name": "players", "type": {"type": "array", "items": {
                "type": "record",
                "name": "Player",
                "fields": [
                    {"name": "name", "type": "string"},
                    {"name": "number", "type": "int"}
                ]
            }}},
            {"name": "tags", "type": {"type": "array", "items": "string"}, "default": []},
            {"name": "grid", "type": {"type": "array", "items": {"type": "array", "items": "int"}}, "default": []},
            {"name": "alternates", "type": {"type": "array", "items": ["null", "Player"]}, "default": []}
        ]
    }))
    .unwrap()
}

#[test]
fn test_empty_arrays_are_valid() {
    assert!(errors(&roster(), json!({"players": []})).is_empty());
}

#[test]
fn test_each_element_is_walked_with_its_index() {
    let result = errors(&roster(), json!({
        "players": [
            {"name": "Ann", "number": 1},
            {"name": "Bo"},
            {"name": 3, "number": "three"}
        ]
    }));

    assert_eq!(
        result,
        vec![
            "Missing required field: 'players[1].number'",
            r#"Invalid type for field 'players[2].name', expected: "string", received: number"#,
            r#"Invalid type for field 'players[2].number', expected: "int", received: string"#,
        ]
    );
}

#[test]
fn test_non_array_value() {
    assert_eq!(
        errors(&roster(), json!({"players": "everyone"})),
        vec!["Invalid type for field 'players', expected: array, received: string"]
    );
    assert_eq!(
        errors(&roster(), json!({"players": 4})),
        vec!["Invalid type for field 'players', expected: array, received: number"]
    );
}

#[test]
fn test_primitive_elements_use_item_description() {
    assert_eq!(
        errors(&roster(), json!({"players": [], "tags": ["a", 2, "c"]})),
        vec![r#"Invalid type for field 'tags[1]', expected: "string", received: number"#]
    );
}

#[test]
fn test_element_that_is_not_a_record() {
    assert_eq!(
        errors(&roster(), json!({"players": ["Ann"]})),
        vec![r#"Invalid type for field 'players[0]', expected: "Player", received: string"#]
    );
}

#[test]
fn test_null_element_not_allowed() {
    assert_eq!(
        errors(&roster(), json!({"players": [null]})),
        vec!["Field 'players[0]' is null, but null is not allowed"]
    );
}

#[test]
fn test_nullable_elements_accept_null() {
    let result = errors(&roster(), json!({
        "players": [],
        "alternates": [null, {"name": "Cy", "number": 9}, {"name": "Di"}]
    }));
    assert_eq!(result, vec!["Missing required field: 'alternates[2].number'"]);
}

#[test]
fn test_nested_arrays() {
    assert!(errors(&roster(), json!({"players": [], "grid": [[1, 2], [], [3]]})).is_empty());

    assert_eq!(
        errors(&roster(), json!({"players": [], "grid": [[1], [2, "x"], 5]})),
        vec![
            r#"Invalid type for field 'grid[1][1]', expected: "int", received: string"#,
            "Invalid type for field 'grid[2]', expected: array, received: number",
        ]
    );
}

#[test]
fn test_array_of_maps_is_leaf_checked() {
    let schema = Schema::parse(&json!({
        "type": "record",
        "name": "Metrics",
        "fields": [
            {"name": "samples", "type": {"type": "array", "items": {"type": "map", "values": "double"}}}
        ]
    }))
    .unwrap();

    assert!(errors(&schema, json!({"samples": [{"cpu": 0.5}, {}]})).is_empty());
    assert_eq!(
        errors(&schema, json!({"samples": [{"cpu": "high"}]})),
        vec![r#"Invalid type for field 'samples[0]', expected: {"type":"map","values":"double"}, received: object"#]
    );
}
