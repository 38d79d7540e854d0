//! Tests for field path rendering as seen in error messages.

use avrocheck::{validate_against_schema, FieldPath, PathSegment, Schema};
use serde_json::json;

#[test]
fn test_path_segments() {
    let path = FieldPath::root().child("orders").index(3).child("lines").index(0);

    let segments: Vec<&PathSegment> = path.segments().collect();
    assert_eq!(segments.len(), 4);
    assert_eq!(segments[1], &PathSegment::Index(3));
    assert_eq!(path.last(), Some(&PathSegment::Index(0)));
    assert_eq!(path.to_string(), "orders[3].lines[0]");
}

#[test]
fn test_deep_paths_in_messages() {
    let schema = Schema::parse(&json!({
        "type": "record",
        "name": "Company",
        "fields": [
            {"name": "departments", "type": {"type": "array", "items": {
                "type": "record",
                "name": "Department",
                "fields": [
                    {"name": "head", "type": {
                        "type": "record",
                        "name": "Employee",
                        "fields": [
                            {"name": "name", "type": "string"},
                            {"name": "skills", "type": {"type": "array", "items": "string"}}
                        ]
                    }}
                ]
            }}}
        ]
    }))
    .unwrap();

    let errors = validate_against_schema(
        &schema,
        &json!({"departments": [
            {"head": {"name": "Ada", "skills": ["math"]}},
            {"head": {"name": "Bob", "skills": ["ops", false]}}
        ]}),
    )
    .unwrap();

    assert_eq!(
        errors,
        vec![r#"Invalid type for field 'departments[1].head.skills[1]', expected: "string", received: boolean"#]
    );
}

#[test]
fn test_root_path_rendering() {
    let schema = Schema::parse(&json!({
        "type": "record",
        "name": "Thing",
        "fields": []
    }))
    .unwrap();

    assert_eq!(
        validate_against_schema(&schema, &json!([1, 2])).unwrap(),
        vec![r#"Invalid type for field '(root)', expected: "Thing", received: object"#]
    );
    assert!(validate_against_schema(&schema, &json!({})).unwrap().is_empty());
}
