//! Schema model.
//!
//! A schema is a tree of [`SchemaNode`]s decided once at load time, either
//! parsed from Avro JSON with [`Schema::parse`] or assembled with the
//! builders on [`RecordSchema`] and [`Field`]. Named types (records, enums,
//! fixed) live in a [`SchemaRegistry`] so that [`SchemaNode::Reference`]s can
//! be resolved during a walk.
//!
//! # Example
//!
//! ```rust
//! use avrocheck::Schema;
//! use serde_json::json;
//!
//! let schema = Schema::parse(&json!({
//!     "type": "record",
//!     "name": "User",
//!     "fields": [
//!         {"name": "name", "type": "string"},
//!         {"name": "email", "type": ["null", "string"], "default": null}
//!     ]
//! }))
//! .unwrap();
//!
//! let result = schema.validate(&json!({"name": "Alice"})).unwrap();
//! assert!(result.is_success());
//! ```

mod complex;
mod description;
mod parser;
mod record;

use std::fmt::{self, Display};
use std::sync::Arc;

use serde_json::Value;

use crate::checker::{AvroTypeChecker, TypeChecker};
use crate::error::SchemaError;
use crate::registry::SchemaRegistry;
use crate::walker;
use crate::ValidationResult;

pub use complex::{ArraySchema, EnumSchema, FixedSchema, MapSchema};
pub use description::describe;
pub use parser::{ParseOptions, DEFAULT_NAME_PATTERN};
pub use record::{Field, RecordSchema};

pub(crate) use parser::{check_record_defaults, Parser};

/// The Avro primitive types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Null,
    Boolean,
    Int,
    Long,
    Float,
    Double,
    Bytes,
    String,
}

impl PrimitiveType {
    /// The Avro name of this primitive.
    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveType::Null => "null",
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
            PrimitiveType::Bytes => "bytes",
            PrimitiveType::String => "string",
        }
    }

    /// Looks up a primitive by its Avro name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "null" => Some(PrimitiveType::Null),
            "boolean" => Some(PrimitiveType::Boolean),
            "int" => Some(PrimitiveType::Int),
            "long" => Some(PrimitiveType::Long),
            "float" => Some(PrimitiveType::Float),
            "double" => Some(PrimitiveType::Double),
            "bytes" => Some(PrimitiveType::Bytes),
            "string" => Some(PrimitiveType::String),
            _ => None,
        }
    }
}

impl Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A schema type.
///
/// Compound variants hold their definitions behind `Arc`, so cloning a node
/// is cheap and a schema can be shared across threads.
#[derive(Debug, Clone)]
pub enum SchemaNode {
    Primitive(PrimitiveType),
    Record(Arc<RecordSchema>),
    Enum(Arc<EnumSchema>),
    Fixed(Arc<FixedSchema>),
    Array(Arc<ArraySchema>),
    Map(Arc<MapSchema>),
    /// Ordered alternatives. Nullable iff one member is `null`.
    Union(Vec<SchemaNode>),
    /// A use of a named type by full name.
    Reference(String),
}

impl SchemaNode {
    pub fn null() -> Self {
        SchemaNode::Primitive(PrimitiveType::Null)
    }

    pub fn boolean() -> Self {
        SchemaNode::Primitive(PrimitiveType::Boolean)
    }

    pub fn int() -> Self {
        SchemaNode::Primitive(PrimitiveType::Int)
    }

    pub fn long() -> Self {
        SchemaNode::Primitive(PrimitiveType::Long)
    }

    pub fn float() -> Self {
        SchemaNode::Primitive(PrimitiveType::Float)
    }

    pub fn double() -> Self {
        SchemaNode::Primitive(PrimitiveType::Double)
    }

    pub fn bytes() -> Self {
        SchemaNode::Primitive(PrimitiveType::Bytes)
    }

    pub fn string() -> Self {
        SchemaNode::Primitive(PrimitiveType::String)
    }

    /// An array of `items`.
    pub fn array(items: SchemaNode) -> Self {
        SchemaNode::Array(Arc::new(ArraySchema::new(items)))
    }

    /// A map with `values`.
    pub fn map(values: SchemaNode) -> Self {
        SchemaNode::Map(Arc::new(MapSchema::new(values)))
    }

    /// A named enum.
    pub fn enumeration<I, S>(name: impl Into<String>, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SchemaNode::Enum(Arc::new(EnumSchema::new(name, symbols)))
    }

    /// A named fixed type.
    pub fn fixed(name: impl Into<String>, size: usize) -> Self {
        SchemaNode::Fixed(Arc::new(FixedSchema::new(name, size)))
    }

    /// A union of `members`, in order.
    pub fn union(members: Vec<SchemaNode>) -> Self {
        SchemaNode::Union(members)
    }

    /// The conventional nullable form `["null", inner]`.
    pub fn optional(inner: SchemaNode) -> Self {
        SchemaNode::Union(vec![SchemaNode::null(), inner])
    }

    /// A reference to a named type.
    pub fn reference(name: impl Into<String>) -> Self {
        SchemaNode::Reference(name.into())
    }

    /// Returns true for a union with a `null` member, at any position.
    pub fn is_nullable(&self) -> bool {
        match self {
            SchemaNode::Union(members) => members
                .iter()
                .any(|m| matches!(m, SchemaNode::Primitive(PrimitiveType::Null))),
            _ => false,
        }
    }

    /// For a union with exactly one non-null member, returns that member.
    pub fn single_non_null_member(&self) -> Option<&SchemaNode> {
        match self {
            SchemaNode::Union(members) => {
                let mut non_null = members
                    .iter()
                    .filter(|m| !matches!(m, SchemaNode::Primitive(PrimitiveType::Null)));
                match (non_null.next(), non_null.next()) {
                    (Some(member), None) => Some(member),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// The full name of a named type definition or reference.
    pub fn fullname(&self) -> Option<&str> {
        match self {
            SchemaNode::Record(r) => Some(r.name()),
            SchemaNode::Enum(e) => Some(e.name()),
            SchemaNode::Fixed(f) => Some(f.name()),
            SchemaNode::Reference(name) => Some(name),
            _ => None,
        }
    }

    /// A short kind name used in diagnostics: `record`, `union`, `int`, ...
    pub fn kind_name(&self) -> &str {
        match self {
            SchemaNode::Primitive(p) => p.name(),
            SchemaNode::Record(_) => "record",
            SchemaNode::Enum(_) => "enum",
            SchemaNode::Fixed(_) => "fixed",
            SchemaNode::Array(_) => "array",
            SchemaNode::Map(_) => "map",
            SchemaNode::Union(_) => "union",
            SchemaNode::Reference(_) => "reference",
        }
    }

    /// Collects the names of all references reachable from this node.
    pub fn collect_refs(&self, refs: &mut Vec<String>) {
        match self {
            SchemaNode::Reference(name) => refs.push(name.clone()),
            SchemaNode::Record(record) => {
                for field in record.fields() {
                    field.schema().collect_refs(refs);
                }
            }
            SchemaNode::Array(array) => array.items().collect_refs(refs),
            SchemaNode::Map(map) => map.values().collect_refs(refs),
            SchemaNode::Union(members) => {
                for member in members {
                    member.collect_refs(refs);
                }
            }
            SchemaNode::Primitive(_) | SchemaNode::Enum(_) | SchemaNode::Fixed(_) => {}
        }
    }

    /// Returns true if both nodes are the same named definition.
    pub(crate) fn same_definition(&self, other: &SchemaNode) -> bool {
        match (self, other) {
            (SchemaNode::Record(a), SchemaNode::Record(b)) => Arc::ptr_eq(a, b),
            (SchemaNode::Enum(a), SchemaNode::Enum(b)) => Arc::ptr_eq(a, b),
            (SchemaNode::Fixed(a), SchemaNode::Fixed(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<PrimitiveType> for SchemaNode {
    fn from(primitive: PrimitiveType) -> Self {
        SchemaNode::Primitive(primitive)
    }
}

impl From<RecordSchema> for SchemaNode {
    fn from(record: RecordSchema) -> Self {
        SchemaNode::Record(Arc::new(record))
    }
}

impl From<EnumSchema> for SchemaNode {
    fn from(enumeration: EnumSchema) -> Self {
        SchemaNode::Enum(Arc::new(enumeration))
    }
}

impl Display for SchemaNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&describe(self))
    }
}

/// A loaded top-level record schema, ready to validate payloads.
///
/// `Schema` is cheap to clone and `Send + Sync`; validation holds no state
/// between calls, so one schema can serve any number of threads.
#[derive(Debug, Clone)]
pub struct Schema {
    root: Arc<RecordSchema>,
    registry: SchemaRegistry,
}

impl Schema {
    /// Parses an Avro JSON schema whose top level is a record.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] describing the first defect found.
    pub fn parse(json: &Value) -> Result<Self, SchemaError> {
        Self::parse_with(json, &ParseOptions::default())
    }

    /// Parses Avro JSON schema text.
    ///
    /// ```rust
    /// use avrocheck::Schema;
    ///
    /// let schema = Schema::parse_str(
    ///     r#"{"type": "record", "name": "Point", "fields": [
    ///         {"name": "x", "type": "double"},
    ///         {"name": "y", "type": "double"}
    ///     ]}"#,
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(schema.root().name(), "Point");
    /// ```
    pub fn parse_str(text: &str) -> Result<Self, SchemaError> {
        let json: Value = serde_json::from_str(text)?;
        Self::parse(&json)
    }

    /// Parses with explicit options.
    pub fn parse_with(json: &Value, options: &ParseOptions) -> Result<Self, SchemaError> {
        SchemaRegistry::new().parse_with(json, options)
    }

    /// Builds a schema from a record assembled in code.
    ///
    /// Every named type reachable from `record` is registered, every
    /// reference must resolve to one of them, and every field default must
    /// conform to its field type.
    ///
    /// ```rust
    /// use avrocheck::{Field, RecordSchema, Schema, SchemaNode};
    /// use serde_json::json;
    ///
    /// let node = RecordSchema::new("Node")
    ///     .field(Field::new("value", SchemaNode::int()))
    ///     .field(Field::new("next", SchemaNode::optional(SchemaNode::reference("Node"))));
    ///
    /// assert!(Schema::from_record(node).is_ok());
    ///
    /// let dangling = RecordSchema::new("Dangling")
    ///     .field(Field::new("other", SchemaNode::reference("Missing")));
    ///
    /// assert!(Schema::from_record(dangling).is_err());
    ///
    /// let bad_default = RecordSchema::new("Settings")
    ///     .field(Field::new("retries", SchemaNode::int()).with_default(json!("three")));
    ///
    /// assert!(Schema::from_record(bad_default).is_err());
    /// ```
    pub fn from_record(record: RecordSchema) -> Result<Self, SchemaError> {
        Self::from_record_with(record, &ParseOptions::default())
    }

    /// Builds a schema from a record with explicit options.
    ///
    /// Only [`ParseOptions::validate_defaults`] applies: names given in code
    /// are taken as full names and are not checked against the name pattern.
    pub fn from_record_with(
        record: RecordSchema,
        options: &ParseOptions,
    ) -> Result<Self, SchemaError> {
        let root = Arc::new(record);
        let registry = SchemaRegistry::new();
        registry.register_tree(&SchemaNode::Record(Arc::clone(&root)))?;

        if let Some(name) = registry.unresolved_refs().into_iter().next() {
            return Err(SchemaError::UnresolvedReference(name));
        }

        if options.checks_defaults() {
            for name in registry.names() {
                if let Some(SchemaNode::Record(record)) = registry.get(&name) {
                    check_record_defaults(&record, &registry)?;
                }
            }
        }

        Ok(Self { root, registry })
    }

    pub(crate) fn from_parts(root: Arc<RecordSchema>, registry: SchemaRegistry) -> Self {
        Self { root, registry }
    }

    /// The top-level record.
    pub fn root(&self) -> &RecordSchema {
        &self.root
    }

    /// The registry holding this schema's named types.
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Validates a payload with the default Avro type checker.
    ///
    /// Payload violations come back inside the `Validation`; only schema
    /// defects found during the walk are returned as `Err`.
    pub fn validate(&self, payload: &Value) -> Result<ValidationResult<()>, SchemaError> {
        self.validate_with(payload, &AvroTypeChecker)
    }

    /// Validates a payload with a caller-supplied leaf type checker.
    pub fn validate_with(
        &self,
        payload: &Value,
        checker: &dyn TypeChecker,
    ) -> Result<ValidationResult<()>, SchemaError> {
        walker::validate_payload(&self.root, payload, &self.registry, checker)
    }
}
