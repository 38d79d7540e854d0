//! Tests for sharing named types across schemas through a registry.

use avrocheck::{Field, ParseOptions, RecordSchema, SchemaError, SchemaNode, SchemaRegistry};
use serde_json::json;

fn with_pet() -> SchemaRegistry {
    let registry = SchemaRegistry::new();
    registry
        .parse(&json!({
            "type": "record",
            "name": "Pet",
            "namespace": "zoo",
            "fields": [
                {"name": "name", "type": "string"},
                {"name": "kind", "type": {"type": "enum", "name": "Kind", "symbols": ["CAT", "DOG"]}}
            ]
        }))
        .unwrap();
    registry
}

#[test]
fn test_parse_registers_named_types() {
    let registry = with_pet();
    assert_eq!(registry.names(), vec!["zoo.Kind", "zoo.Pet"]);
    assert!(matches!(registry.get("zoo.Kind"), Some(SchemaNode::Enum(_))));
}

#[test]
fn test_later_schema_references_earlier_types() {
    let registry = with_pet();
    let owner = registry
        .parse_with(
            &json!({
                "type": "record",
                "name": "Owner",
                "fields": [{"name": "pets", "type": {"type": "array", "items": "Pet"}}]
            }),
            &ParseOptions::new().namespace("zoo"),
        )
        .unwrap();

    assert_eq!(owner.root().name(), "zoo.Owner");
    let result = owner
        .validate(&json!({"pets": [{"name": "Rex", "kind": "DOG"}, {"name": "Tom", "kind": "COW"}]}))
        .unwrap();
    let errors = result.into_result().unwrap_err();
    assert_eq!(
        errors.messages(),
        vec![r#"Invalid type for field 'pets[1].kind', expected: "zoo.Kind", received: string"#]
    );
}

#[test]
fn test_validate_by_name() {
    let registry = with_pet();
    assert!(registry
        .validate("zoo.Pet", &json!({"name": "Rex", "kind": "DOG"}))
        .unwrap()
        .is_success());
    assert!(registry.validate("zoo.Pet", &json!({"kind": "DOG"})).unwrap().is_failure());
}

#[test]
fn test_validate_by_name_requires_a_record() {
    let registry = with_pet();
    assert!(matches!(
        registry.validate("zoo.Kind", &json!("CAT")),
        Err(SchemaError::SchemaNotFound(name)) if name == "zoo.Kind"
    ));
    assert!(matches!(
        registry.validate("Nope", &json!({})),
        Err(SchemaError::SchemaNotFound(_))
    ));
}

#[test]
fn test_redefinition_rejected() {
    let registry = with_pet();
    let err = registry
        .parse(&json!({
            "type": "record",
            "name": "Pet",
            "namespace": "zoo",
            "fields": []
        }))
        .unwrap_err();
    assert!(matches!(err, SchemaError::DuplicateName(name) if name == "zoo.Pet"));
    assert_eq!(registry.len(), 2);
}

#[test]
fn test_failed_parse_registers_nothing() {
    let registry = with_pet();
    let result = registry.parse(&json!({
        "type": "record",
        "name": "Vet",
        "fields": [
            {"name": "clinic", "type": {"type": "record", "name": "Clinic", "fields": []}},
            {"name": "rating", "type": "int", "default": "five"}
        ]
    }));

    assert!(matches!(result, Err(SchemaError::InvalidDefault { .. })));
    assert!(!registry.contains("Vet"));
    assert!(!registry.contains("Clinic"));
}

#[test]
fn test_clones_share_storage() {
    let registry = SchemaRegistry::new();
    let clone = registry.clone();
    registry
        .register("Flag", SchemaNode::enumeration("Flag", ["ON", "OFF"]))
        .unwrap();

    assert!(clone.contains("Flag"));
    assert!(!clone.is_empty());
}

#[test]
fn test_unresolved_refs_reported() {
    let registry = SchemaRegistry::new();
    registry
        .register(
            "Wrapper",
            SchemaNode::from(RecordSchema::new("Wrapper").field(Field::new(
                "items",
                SchemaNode::array(SchemaNode::reference("Inner")),
            ))),
        )
        .unwrap();
    assert_eq!(registry.unresolved_refs(), vec!["Inner"]);

    registry
        .register("Inner", SchemaNode::fixed("Inner", 2))
        .unwrap();
    assert!(registry.unresolved_refs().is_empty());
}

#[test]
fn test_aliases_cannot_be_registered() {
    let registry = SchemaRegistry::new();
    assert!(matches!(
        registry.register("A", SchemaNode::reference("B")),
        Err(SchemaError::NotANamedType { .. })
    ));
    assert!(matches!(
        registry.register("B", SchemaNode::reference("A")),
        Err(SchemaError::NotANamedType { .. })
    ));

    let err = registry
        .parse(&json!({
            "type": "record",
            "name": "R",
            "fields": [{"name": "f", "type": "A"}]
        }))
        .unwrap_err();
    assert!(matches!(err, SchemaError::UnresolvedReference(name) if name == "A"));
}

#[test]
fn test_registered_name_must_match_definition() {
    let registry = SchemaRegistry::new();
    let err = registry
        .register("Alias", SchemaNode::fixed("Hash", 16))
        .unwrap_err();

    assert!(matches!(err, SchemaError::NotANamedType { ref name, .. } if name == "Alias"));
    assert!(!registry.contains("Alias"));
}

#[test]
fn test_parse_conflicting_with_registered_type_registers_nothing() {
    let registry = SchemaRegistry::new();
    registry
        .register("Shared", SchemaNode::enumeration("Shared", ["A"]))
        .unwrap();

    let err = registry
        .parse(&json!({
            "type": "record",
            "name": "Uses",
            "fields": [
                {"name": "unique", "type": {"type": "fixed", "name": "Unique", "size": 2}},
                {"name": "shared", "type": {"type": "enum", "name": "Shared", "symbols": ["B"]}}
            ]
        }))
        .unwrap_err();

    assert!(matches!(err, SchemaError::DuplicateName(name) if name == "Shared"));
    assert_eq!(registry.names(), vec!["Shared"]);
}
