//! Named type storage and reference resolution.
//!
//! This module provides the [`SchemaRegistry`] type that stores named types
//! (records, enums, fixed) by full name so that references can be resolved
//! while parsing and walking.

use indexmap::IndexMap;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::checker::{AvroTypeChecker, TypeResolver};
use crate::error::SchemaError;
use crate::schema::{ParseOptions, Parser, Schema, SchemaNode};
use crate::ValidationResult;

/// Type alias for the named type storage map.
type TypeMap = Arc<RwLock<HashMap<String, SchemaNode>>>;

/// A thread-safe store of named types.
///
/// A registry can be shared by several parses, so a schema may reference
/// named types defined by an earlier one. Clones share the same storage.
///
/// # Thread Safety
///
/// The registry uses `Arc<RwLock<...>>`:
/// - Multiple threads can validate concurrently (read-only access)
/// - Registration is serialized (write access)
///
/// # Example
///
/// ```rust
/// use avrocheck::SchemaRegistry;
/// use serde_json::json;
///
/// let registry = SchemaRegistry::new();
///
/// registry.parse(&json!({
///     "type": "record",
///     "name": "Pet",
///     "fields": [{"name": "name", "type": "string"}]
/// })).unwrap();
///
/// let owner = registry.parse(&json!({
///     "type": "record",
///     "name": "Owner",
///     "fields": [{"name": "pets", "type": {"type": "array", "items": "Pet"}}]
/// })).unwrap();
///
/// let result = owner.validate(&json!({"pets": [{"name": "Rex"}]})).unwrap();
/// assert!(result.is_success());
/// ```
#[derive(Clone, Default)]
pub struct SchemaRegistry {
    types: TypeMap,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a named type under `name`.
    ///
    /// Registering the very same definition again is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::NotANamedType`] unless `node` is a record, enum
    /// or fixed type whose full name is `name`, and
    /// [`SchemaError::DuplicateName`] if a different type already uses the
    /// name.
    pub fn register(&self, name: impl Into<String>, node: SchemaNode) -> Result<(), SchemaError> {
        let name = name.into();
        check_named(&name, &node)?;

        let mut types = self.types.write();
        if let Some(existing) = types.get(&name) {
            if existing.same_definition(&node) {
                return Ok(());
            }
            return Err(SchemaError::DuplicateName(name));
        }

        debug!(name = %name, kind = node.kind_name(), "registered named type");
        types.insert(name, node);
        Ok(())
    }

    /// Registers every definition in `defined`, or none of them.
    ///
    /// Conflicts are checked and the insertions made under a single write
    /// lock, so a concurrent parse cannot interleave with this one.
    pub(crate) fn register_all(
        &self,
        defined: &IndexMap<String, SchemaNode>,
    ) -> Result<(), SchemaError> {
        for (name, node) in defined {
            check_named(name, node)?;
        }

        let mut types = self.types.write();
        for (name, node) in defined {
            if let Some(existing) = types.get(name) {
                if !existing.same_definition(node) {
                    return Err(SchemaError::DuplicateName(name.clone()));
                }
            }
        }

        for (name, node) in defined {
            debug!(name = %name, kind = node.kind_name(), "registered named type");
            types.insert(name.clone(), node.clone());
        }
        Ok(())
    }

    /// Registers every named type definition reachable from `node`.
    pub(crate) fn register_tree(&self, node: &SchemaNode) -> Result<(), SchemaError> {
        let mut defined = IndexMap::new();
        collect_named(node, &mut defined)?;
        self.register_all(&defined)
    }

    /// Retrieves a named type by full name.
    pub fn get(&self, name: &str) -> Option<SchemaNode> {
        self.types.read().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.read().contains_key(name)
    }

    /// Full names of all registered types, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.types.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.types.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.read().is_empty()
    }

    /// Returns the references that no registered type satisfies.
    ///
    /// ```rust
    /// use avrocheck::{Field, RecordSchema, SchemaNode, SchemaRegistry};
    ///
    /// let registry = SchemaRegistry::new();
    /// registry.register("User", SchemaNode::from(
    ///     RecordSchema::new("User").field(Field::new("id", SchemaNode::reference("UserId")))
    /// )).unwrap();
    ///
    /// assert_eq!(registry.unresolved_refs(), vec!["UserId"]);
    /// ```
    pub fn unresolved_refs(&self) -> Vec<String> {
        let types = self.types.read();
        let mut refs = Vec::new();
        for node in types.values() {
            node.collect_refs(&mut refs);
        }

        let mut unresolved: Vec<String> = refs
            .into_iter()
            .filter(|name| !types.contains_key(name))
            .collect();
        unresolved.sort();
        unresolved.dedup();
        unresolved
    }

    /// Parses a top-level record schema into this registry.
    pub fn parse(&self, json: &Value) -> Result<Schema, SchemaError> {
        self.parse_with(json, &ParseOptions::default())
    }

    /// Parses with explicit options.
    ///
    /// Named types are only registered once the whole schema has parsed; a
    /// failed parse leaves the registry unchanged.
    pub fn parse_with(&self, json: &Value, options: &ParseOptions) -> Result<Schema, SchemaError> {
        let parser = Parser::new(self, options)?;
        let root = parser.parse_root(json)?;
        Ok(Schema::from_parts(root, self.clone()))
    }

    /// Validates a payload against a registered record by name.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::SchemaNotFound`] if no record has that name.
    pub fn validate(
        &self,
        name: &str,
        payload: &Value,
    ) -> Result<ValidationResult<()>, SchemaError> {
        match self.get(name) {
            Some(SchemaNode::Record(record)) => {
                Schema::from_parts(record, self.clone()).validate_with(payload, &AvroTypeChecker)
            }
            _ => Err(SchemaError::SchemaNotFound(name.to_string())),
        }
    }
}

fn check_named(name: &str, node: &SchemaNode) -> Result<(), SchemaError> {
    let named = matches!(
        node,
        SchemaNode::Record(_) | SchemaNode::Enum(_) | SchemaNode::Fixed(_)
    );
    if named && node.fullname() == Some(name) {
        return Ok(());
    }

    let kind = match node.fullname() {
        Some(fullname) => format!("{} '{}'", node.kind_name(), fullname),
        None => node.kind_name().to_string(),
    };
    Err(SchemaError::NotANamedType {
        name: name.to_string(),
        kind,
    })
}

/// Collects the named definitions inside `node`, rejecting two different
/// definitions that share a name.
fn collect_named(
    node: &SchemaNode,
    defined: &mut IndexMap<String, SchemaNode>,
) -> Result<(), SchemaError> {
    if let Some(name) = node.fullname() {
        if !matches!(node, SchemaNode::Reference(_)) {
            if let Some(existing) = defined.get(name) {
                if existing.same_definition(node) {
                    return Ok(());
                }
                return Err(SchemaError::DuplicateName(name.to_string()));
            }
            defined.insert(name.to_string(), node.clone());
        }
    }

    match node {
        SchemaNode::Record(record) => {
            for field in record.fields() {
                collect_named(field.schema(), defined)?;
            }
        }
        SchemaNode::Array(array) => collect_named(array.items(), defined)?,
        SchemaNode::Map(map) => collect_named(map.values(), defined)?,
        SchemaNode::Union(members) => {
            for member in members {
                collect_named(member, defined)?;
            }
        }
        SchemaNode::Primitive(_)
        | SchemaNode::Enum(_)
        | SchemaNode::Fixed(_)
        | SchemaNode::Reference(_) => {}
    }
    Ok(())
}

impl TypeResolver for SchemaRegistry {
    fn resolve(&self, fullname: &str) -> Option<SchemaNode> {
        self.get(fullname)
    }
}

impl fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaRegistry")
            .field("names", &self.names())
            .finish()
    }
}
