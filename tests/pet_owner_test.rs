//! End-to-end scenarios against the PetOwner schema.

use avrocheck::{validate_against_schema, Schema};
use serde_json::{json, Value};

fn pet_owner() -> Schema {
    Schema::parse(&json!({
        "type": "record",
        "name": "PetOwner",
        "fields": [
            {"name": "name", "type": "string"},
            {"name": "age", "type": ["null", "int"], "default": null},
            {"name": "country", "type": "string", "default": "Unknown"},
            {
                "name": "pets",
                "type": {
                    "type": "array",
                    "items": {
                        "type": "record",
                        "name": "Pet",
                        "fields": [
                            {"name": "kind", "type": {"type": "enum", "name": "PetKind", "symbols": ["CAT", "DOG"]}},
                            {"name": "name", "type": "string"}
                        ]
                    }
                }
            }
        ]
    }))
    .unwrap()
}

fn errors_for(payload: Value) -> Vec<String> {
    validate_against_schema(&pet_owner(), &payload).unwrap()
}

#[test]
fn test_valid_payload() {
    let errors = errors_for(json!({
        "name": "John Doe",
        "pets": [{"kind": "DOG", "name": "Buddy"}]
    }));
    assert!(errors.is_empty());
}

#[test]
fn test_missing_required_field() {
    let errors = errors_for(json!({
        "pets": [{"kind": "DOG", "name": "Buddy"}]
    }));
    assert!(errors.contains(&"Missing required field: 'name'".to_string()));
}

#[test]
fn test_invalid_nested_field_type() {
    let errors = errors_for(json!({
        "name": "John Doe",
        "pets": [{"kind": "DOG", "name": 123}]
    }));
    assert!(errors.contains(
        &"Invalid type for field 'pets[0].name', expected: \"string\", received: number".to_string()
    ));
}

#[test]
fn test_defaults_excuse_absence() {
    let errors = errors_for(json!({
        "name": "John Doe",
        "pets": []
    }));
    assert!(errors.is_empty());
}

#[test]
fn test_missing_nested_fields() {
    let errors = errors_for(json!({
        "name": "John Doe",
        "pets": [{}]
    }));
    assert!(errors.contains(&"Missing required field: 'pets[0].kind'".to_string()));
    assert!(errors.contains(&"Missing required field: 'pets[0].name'".to_string()));
}

#[test]
fn test_null_in_non_nullable_nested_field() {
    let errors = errors_for(json!({
        "name": "John Doe",
        "pets": [{"kind": "CAT", "name": null}]
    }));
    assert!(errors.contains(&"Field 'pets[0].name' is null, but null is not allowed".to_string()));
}

#[test]
fn test_boolean_in_string_field() {
    let errors = errors_for(json!({
        "name": "John Doe",
        "pets": [{"kind": "DOG", "name": true}]
    }));
    assert!(errors.contains(
        &"Invalid type for field 'pets[0].name', expected: \"string\", received: boolean".to_string()
    ));
}

#[test]
fn test_wrong_type_for_optional_field() {
    let errors = errors_for(json!({
        "name": "John Doe",
        "age": "not-an-int",
        "pets": []
    }));
    assert!(errors.contains(
        &"Invalid type for field 'age', expected: [\"null\",\"int\"], received: string".to_string()
    ));
}

#[test]
fn test_unknown_enum_symbol() {
    let errors = errors_for(json!({
        "name": "John Doe",
        "pets": [{"kind": "FISH", "name": "Nemo"}]
    }));
    assert_eq!(
        errors,
        vec!["Invalid type for field 'pets[0].kind', expected: \"PetKind\", received: string"]
    );
}

#[test]
fn test_all_errors_in_declaration_order() {
    let errors = errors_for(json!({
        "age": 1.5,
        "country": null,
        "pets": [{"kind": "DOG"}, {"name": 7}]
    }));

    assert_eq!(
        errors,
        vec![
            "Missing required field: 'name'",
            "Invalid type for field 'age', expected: [\"null\",\"int\"], received: number",
            "Field 'country' is null, but null is not allowed",
            "Missing required field: 'pets[0].name'",
            "Missing required field: 'pets[1].kind'",
            "Invalid type for field 'pets[1].name', expected: \"string\", received: number",
        ]
    );
}

#[test]
fn test_pets_must_be_an_array() {
    let errors = errors_for(json!({
        "name": "John Doe",
        "pets": {"kind": "DOG", "name": "Buddy"}
    }));
    assert_eq!(
        errors,
        vec!["Invalid type for field 'pets', expected: array, received: object"]
    );
}

#[test]
fn test_extra_fields_are_ignored() {
    let errors = errors_for(json!({
        "name": "John Doe",
        "nickname": "JD",
        "pets": [{"kind": "CAT", "name": "Tom", "lives": 9}]
    }));
    assert!(errors.is_empty());
}

#[test]
fn test_validation_is_deterministic() {
    let schema = pet_owner();
    let payload = json!({
        "country": 3,
        "pets": [{}, {"kind": "DOG", "name": null}]
    });

    let first = validate_against_schema(&schema, &payload).unwrap();
    let second = validate_against_schema(&schema, &payload).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), 5);
}

#[test]
fn test_non_object_payload() {
    let errors = errors_for(json!("John Doe"));
    assert_eq!(
        errors,
        vec!["Invalid type for field '(root)', expected: \"PetOwner\", received: string"]
    );
}
