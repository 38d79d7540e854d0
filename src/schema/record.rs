//! Record schemas and their fields.
//!
//! This module provides [`RecordSchema`], an ordered set of uniquely named
//! [`Field`]s, each with a declared type and an optional default.

use indexmap::IndexMap;
use serde_json::Value;

use super::describe;
use super::SchemaNode;

/// A member of a record.
///
/// A field owns its declared type and caches that type's description, which
/// is what type-mismatch messages report as `expected`.
///
/// # Example
///
/// ```rust
/// use avrocheck::{Field, SchemaNode};
/// use serde_json::json;
///
/// let age = Field::new("age", SchemaNode::optional(SchemaNode::int()))
///     .with_default(json!(null));
///
/// assert_eq!(age.description(), r#"["null","int"]"#);
/// assert!(age.default().is_some());
/// ```
#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    schema: SchemaNode,
    default: Option<Value>,
    doc: Option<String>,
    description: String,
}

impl Field {
    /// Creates a field with no default.
    pub fn new(name: impl Into<String>, schema: SchemaNode) -> Self {
        let description = describe(&schema);
        Self {
            name: name.into(),
            schema,
            default: None,
            doc: None,
            description,
        }
    }

    /// Declares a default value. A JSON `null` is a declared default too.
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Attaches documentation.
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared type.
    pub fn schema(&self) -> &SchemaNode {
        &self.schema
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    /// The cached description of the declared type.
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// A named record type with fields in declaration order.
///
/// Field names are unique: adding a field whose name is already declared
/// replaces the earlier declaration in place.
///
/// # Example
///
/// ```rust
/// use avrocheck::{Field, RecordSchema, SchemaNode};
///
/// let pet = RecordSchema::new("Pet")
///     .field(Field::new("kind", SchemaNode::enumeration("PetKind", ["CAT", "DOG"])))
///     .field(Field::new("name", SchemaNode::string()));
///
/// let names: Vec<_> = pet.fields().map(|f| f.name()).collect();
/// assert_eq!(names, vec!["kind", "name"]);
/// ```
#[derive(Debug, Clone)]
pub struct RecordSchema {
    name: String,
    doc: Option<String>,
    fields: IndexMap<String, Field>,
}

impl RecordSchema {
    /// Creates a record with the given full name and no fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            fields: IndexMap::new(),
        }
    }

    /// Adds a field.
    ///
    /// A field whose name is already declared replaces the earlier one. The
    /// parser is stricter and rejects such a schema with
    /// [`SchemaError::DuplicateField`](crate::SchemaError::DuplicateField).
    pub fn field(mut self, field: Field) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }

    /// Attaches documentation.
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// The full name (`namespace.name`, or `name` without a namespace).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.values()
    }

    /// Looks up a field by name.
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fields_keep_declaration_order() {
        let record = RecordSchema::new("PetOwner")
            .field(Field::new("name", SchemaNode::string()))
            .field(Field::new("age", SchemaNode::optional(SchemaNode::int())))
            .field(Field::new("country", SchemaNode::string()));

        let names: Vec<_> = record.fields().map(Field::name).collect();
        assert_eq!(names, vec!["name", "age", "country"]);
        assert_eq!(record.len(), 3);
    }

    #[test]
    fn test_redeclared_field_replaces_in_place() {
        let record = RecordSchema::new("R")
            .field(Field::new("a", SchemaNode::string()))
            .field(Field::new("b", SchemaNode::int()))
            .field(Field::new("a", SchemaNode::long()));

        let names: Vec<_> = record.fields().map(Field::name).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(record.get("a").unwrap().description(), "\"long\"");
    }

    #[test]
    fn test_field_default_and_doc() {
        let field = Field::new("country", SchemaNode::string())
            .with_default(json!("Unknown"))
            .with_doc("ISO country name");

        assert_eq!(field.default(), Some(&json!("Unknown")));
        assert_eq!(field.doc(), Some("ISO country name"));
        assert_eq!(field.description(), "\"string\"");
    }
}
