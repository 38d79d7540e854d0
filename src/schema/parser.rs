//! Avro JSON schema parsing.
//!
//! Turns a schema description into [`SchemaNode`]s once, at load time. All
//! structural defects surface here as [`SchemaError`]s so a walk never has to
//! second-guess the schema it is given.

use std::collections::HashSet;
use std::sync::Arc;

use indexmap::IndexMap;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

use crate::checker::{AvroTypeChecker, TypeChecker, TypeResolver};
use crate::error::SchemaError;
use crate::registry::SchemaRegistry;

use super::describe;
use super::{EnumSchema, Field, FixedSchema, PrimitiveType, RecordSchema, SchemaNode};

/// The Avro name grammar.
pub const DEFAULT_NAME_PATTERN: &str = r"^[A-Za-z_][A-Za-z0-9_]*$";

/// Options controlling how a schema is parsed.
///
/// # Example
///
/// ```rust
/// use avrocheck::{ParseOptions, Schema};
/// use serde_json::json;
///
/// let options = ParseOptions::new().namespace("com.acme");
/// let schema = Schema::parse_with(&json!({
///     "type": "record",
///     "name": "Pet",
///     "fields": [{"name": "name", "type": "string"}]
/// }), &options).unwrap();
///
/// assert_eq!(schema.root().name(), "com.acme.Pet");
/// ```
#[derive(Debug, Clone)]
pub struct ParseOptions {
    namespace: Option<String>,
    validate_defaults: bool,
    name_pattern: String,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Namespace for top-level names that do not declare their own.
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Whether field defaults must conform to their field type (default: on).
    ///
    /// A union default is checked against the union's first member.
    pub fn validate_defaults(mut self, validate: bool) -> Self {
        self.validate_defaults = validate;
        self
    }

    pub(crate) fn checks_defaults(&self) -> bool {
        self.validate_defaults
    }

    /// Regular expression every type name, namespace component, field name
    /// and enum symbol must match.
    pub fn name_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.name_pattern = pattern.into();
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            namespace: None,
            validate_defaults: true,
            name_pattern: DEFAULT_NAME_PATTERN.to_string(),
        }
    }
}

/// A default waiting to be checked once every named type is known.
struct PendingDefault {
    record: String,
    field: String,
    schema: SchemaNode,
    value: Value,
}

/// Named types visible while a parse is still in flight.
struct InFlight<'p> {
    defined: &'p IndexMap<String, SchemaNode>,
    registry: &'p SchemaRegistry,
}

impl TypeResolver for InFlight<'_> {
    fn resolve(&self, fullname: &str) -> Option<SchemaNode> {
        self.defined
            .get(fullname)
            .cloned()
            .or_else(|| self.registry.get(fullname))
    }
}

/// Single-use parser for one top-level schema.
pub(crate) struct Parser<'r> {
    registry: &'r SchemaRegistry,
    name_pattern: Regex,
    namespace: Option<String>,
    validate_defaults: bool,
    started: HashSet<String>,
    defined: IndexMap<String, SchemaNode>,
    defaults: Vec<PendingDefault>,
}

impl<'r> Parser<'r> {
    pub(crate) fn new(
        registry: &'r SchemaRegistry,
        options: &ParseOptions,
    ) -> Result<Self, SchemaError> {
        Ok(Self {
            registry,
            name_pattern: Regex::new(&options.name_pattern)?,
            namespace: options.namespace.clone(),
            validate_defaults: options.validate_defaults,
            started: HashSet::new(),
            defined: IndexMap::new(),
            defaults: Vec::new(),
        })
    }

    /// Parses a top-level record and commits its named types to the registry.
    pub(crate) fn parse_root(mut self, json: &Value) -> Result<Arc<RecordSchema>, SchemaError> {
        let namespace = self.namespace.clone();
        let node = self.parse_node(json, namespace.as_deref())?;

        let root = match node {
            SchemaNode::Record(record) => record,
            SchemaNode::Reference(ref name) => match self.lookup(name) {
                Some(SchemaNode::Record(record)) => record,
                _ => return Err(SchemaError::NotARecord(name.clone())),
            },
            other => return Err(SchemaError::NotARecord(other.kind_name().to_string())),
        };

        self.check_defaults()?;
        self.registry.register_all(&self.defined)?;

        debug!(
            root = %root.name(),
            named_types = self.defined.len(),
            "schema parsed"
        );
        Ok(root)
    }

    fn parse_node(&mut self, json: &Value, namespace: Option<&str>) -> Result<SchemaNode, SchemaError> {
        match json {
            Value::String(name) => self.parse_name(name, namespace),
            Value::Array(members) => self.parse_union(members, namespace),
            Value::Object(object) => self.parse_object(object, namespace),
            other => Err(SchemaError::InvalidNode {
                context: namespace.unwrap_or("schema").to_string(),
                found: other.to_string(),
            }),
        }
    }

    /// A bare type name: a primitive or a reference to a named type.
    fn parse_name(&self, name: &str, namespace: Option<&str>) -> Result<SchemaNode, SchemaError> {
        if let Some(primitive) = PrimitiveType::from_name(name) {
            return Ok(SchemaNode::Primitive(primitive));
        }

        let qualified = match namespace {
            Some(ns) if !name.contains('.') => Some(format!("{}.{}", ns, name)),
            _ => None,
        };

        for candidate in qualified.iter().map(String::as_str).chain([name]) {
            if self.started.contains(candidate) || self.registry.contains(candidate) {
                return Ok(SchemaNode::Reference(candidate.to_string()));
            }
        }

        match name {
            "record" | "error" | "enum" | "fixed" | "array" | "map" => Err(SchemaError::MissingAttribute {
                context: format!("bare '{}' type", name),
                attribute: "type",
            }),
            _ => Err(SchemaError::UnresolvedReference(name.to_string())),
        }
    }

    fn parse_object(
        &mut self,
        object: &Map<String, Value>,
        namespace: Option<&str>,
    ) -> Result<SchemaNode, SchemaError> {
        let type_attr = object.get("type").ok_or(SchemaError::MissingAttribute {
            context: "schema object".to_string(),
            attribute: "type",
        })?;

        let type_name = match type_attr {
            Value::String(type_name) => type_name.as_str(),
            nested @ (Value::Object(_) | Value::Array(_)) => return self.parse_node(nested, namespace),
            other => {
                return Err(SchemaError::InvalidNode {
                    context: "type attribute".to_string(),
                    found: other.to_string(),
                })
            }
        };

        match type_name {
            "record" | "error" => self.parse_record(object, namespace),
            "enum" => self.parse_enum(object, namespace),
            "fixed" => self.parse_fixed(object, namespace),
            "array" => {
                let items = object.get("items").ok_or(SchemaError::MissingAttribute {
                    context: "array".to_string(),
                    attribute: "items",
                })?;
                Ok(SchemaNode::array(self.parse_node(items, namespace)?))
            }
            "map" => {
                let values = object.get("values").ok_or(SchemaError::MissingAttribute {
                    context: "map".to_string(),
                    attribute: "values",
                })?;
                Ok(SchemaNode::map(self.parse_node(values, namespace)?))
            }
            // Primitives may carry a logicalType; the underlying type decides validity.
            other => match PrimitiveType::from_name(other) {
                Some(primitive) => Ok(SchemaNode::Primitive(primitive)),
                None if object.contains_key("name") => Err(SchemaError::UnknownType(other.to_string())),
                None => self.parse_name(other, namespace),
            },
        }
    }

    fn parse_record(
        &mut self,
        object: &Map<String, Value>,
        enclosing: Option<&str>,
    ) -> Result<SchemaNode, SchemaError> {
        let (fullname, namespace) = self.fullname(object, enclosing, "record")?;
        self.begin_definition(&fullname)?;

        let fields = object
            .get("fields")
            .and_then(Value::as_array)
            .ok_or_else(|| SchemaError::MissingAttribute {
                context: format!("record '{}'", fullname),
                attribute: "fields",
            })?;

        let mut record = RecordSchema::new(fullname.clone());
        if let Some(doc) = object.get("doc").and_then(Value::as_str) {
            record = record.with_doc(doc);
        }

        for field_json in fields {
            let field = self.parse_field(field_json, &fullname, namespace.as_deref())?;
            if record.contains(field.name()) {
                return Err(SchemaError::DuplicateField {
                    record: fullname,
                    field: field.name().to_string(),
                });
            }
            record = record.field(field);
        }

        let node = SchemaNode::from(record);
        self.defined.insert(fullname, node.clone());
        Ok(node)
    }

    fn parse_field(
        &mut self,
        json: &Value,
        record: &str,
        namespace: Option<&str>,
    ) -> Result<Field, SchemaError> {
        let object = json.as_object().ok_or_else(|| SchemaError::InvalidNode {
            context: format!("fields of '{}'", record),
            found: json.to_string(),
        })?;

        let name = object
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| SchemaError::MissingAttribute {
                context: format!("field of '{}'", record),
                attribute: "name",
            })?;
        self.check_name(name)?;

        let type_json = object.get("type").ok_or_else(|| SchemaError::MissingAttribute {
            context: format!("field '{}' of '{}'", name, record),
            attribute: "type",
        })?;
        let schema = self.parse_node(type_json, namespace)?;

        let mut field = Field::new(name, schema.clone());
        if let Some(default) = object.get("default") {
            field = field.with_default(default.clone());
            if self.validate_defaults {
                self.defaults.push(PendingDefault {
                    record: record.to_string(),
                    field: name.to_string(),
                    schema,
                    value: default.clone(),
                });
            }
        }
        if let Some(doc) = object.get("doc").and_then(Value::as_str) {
            field = field.with_doc(doc);
        }

        Ok(field)
    }

    fn parse_enum(
        &mut self,
        object: &Map<String, Value>,
        enclosing: Option<&str>,
    ) -> Result<SchemaNode, SchemaError> {
        let (fullname, _) = self.fullname(object, enclosing, "enum")?;
        self.begin_definition(&fullname)?;

        let missing_symbols = || SchemaError::MissingAttribute {
            context: format!("enum '{}'", fullname),
            attribute: "symbols",
        };
        let symbols_json = object
            .get("symbols")
            .and_then(Value::as_array)
            .ok_or_else(missing_symbols)?;

        let mut symbols: Vec<&str> = Vec::with_capacity(symbols_json.len());
        for symbol in symbols_json {
            let symbol = symbol.as_str().ok_or_else(missing_symbols)?;
            self.check_name(symbol)?;
            if symbols.contains(&symbol) {
                return Err(SchemaError::DuplicateSymbol {
                    name: fullname.clone(),
                    symbol: symbol.to_string(),
                });
            }
            symbols.push(symbol);
        }

        let mut enumeration = EnumSchema::new(fullname.clone(), symbols);
        if let Some(doc) = object.get("doc").and_then(Value::as_str) {
            enumeration = enumeration.with_doc(doc);
        }

        let node = SchemaNode::from(enumeration);
        self.defined.insert(fullname, node.clone());
        Ok(node)
    }

    fn parse_fixed(
        &mut self,
        object: &Map<String, Value>,
        enclosing: Option<&str>,
    ) -> Result<SchemaNode, SchemaError> {
        let (fullname, _) = self.fullname(object, enclosing, "fixed")?;
        self.begin_definition(&fullname)?;

        let size = object
            .get("size")
            .and_then(Value::as_u64)
            .and_then(|size| usize::try_from(size).ok())
            .ok_or_else(|| SchemaError::MissingAttribute {
                context: format!("fixed '{}'", fullname),
                attribute: "size",
            })?;

        let node = SchemaNode::Fixed(Arc::new(FixedSchema::new(fullname.clone(), size)));
        self.defined.insert(fullname, node.clone());
        Ok(node)
    }

    fn parse_union(
        &mut self,
        members: &[Value],
        namespace: Option<&str>,
    ) -> Result<SchemaNode, SchemaError> {
        let mut seen = HashSet::new();
        let mut nodes = Vec::with_capacity(members.len());

        for member in members {
            let node = self.parse_node(member, namespace)?;
            let key = match &node {
                SchemaNode::Union(_) => {
                    return Err(SchemaError::InvalidUnion(
                        "unions may not immediately contain other unions".to_string(),
                    ))
                }
                SchemaNode::Primitive(p) => p.name().to_string(),
                SchemaNode::Array(_) => "array".to_string(),
                SchemaNode::Map(_) => "map".to_string(),
                named => named.fullname().unwrap_or_default().to_string(),
            };
            if !seen.insert(key.clone()) {
                return Err(SchemaError::InvalidUnion(format!("duplicate member {}", key)));
            }
            nodes.push(node);
        }

        Ok(SchemaNode::Union(nodes))
    }

    /// Computes the full name of a named type and the namespace its members
    /// inherit.
    fn fullname(
        &self,
        object: &Map<String, Value>,
        enclosing: Option<&str>,
        kind: &str,
    ) -> Result<(String, Option<String>), SchemaError> {
        let name = object
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| SchemaError::MissingAttribute {
                context: kind.to_string(),
                attribute: "name",
            })?;

        let (fullname, namespace) = match name.rsplit_once('.') {
            Some((namespace, _)) => (name.to_string(), Some(namespace.to_string())),
            None => {
                let namespace = match object.get("namespace") {
                    Some(Value::String(ns)) if ns.is_empty() => None,
                    Some(Value::String(ns)) => Some(ns.clone()),
                    _ => enclosing.map(str::to_string),
                };
                let fullname = match &namespace {
                    Some(ns) => format!("{}.{}", ns, name),
                    None => name.to_string(),
                };
                (fullname, namespace)
            }
        };

        for part in fullname.split('.') {
            self.check_name(part)?;
        }
        Ok((fullname, namespace))
    }

    fn begin_definition(&mut self, fullname: &str) -> Result<(), SchemaError> {
        if self.started.contains(fullname) || self.registry.contains(fullname) {
            return Err(SchemaError::DuplicateName(fullname.to_string()));
        }
        self.started.insert(fullname.to_string());
        Ok(())
    }

    fn check_name(&self, name: &str) -> Result<(), SchemaError> {
        if self.name_pattern.is_match(name) {
            Ok(())
        } else {
            Err(SchemaError::InvalidName(name.to_string()))
        }
    }

    fn lookup(&self, name: &str) -> Option<SchemaNode> {
        InFlight {
            defined: &self.defined,
            registry: self.registry,
        }
        .resolve(name)
    }

    fn check_defaults(&self) -> Result<(), SchemaError> {
        let types = InFlight {
            defined: &self.defined,
            registry: self.registry,
        };

        for pending in &self.defaults {
            check_default(
                &pending.record,
                &pending.field,
                &pending.schema,
                &pending.value,
                &types,
            )?;
        }
        Ok(())
    }
}

/// Checks every declared default of `record`'s fields.
pub(crate) fn check_record_defaults(
    record: &RecordSchema,
    types: &dyn TypeResolver,
) -> Result<(), SchemaError> {
    for field in record.fields() {
        if let Some(value) = field.default() {
            check_default(record.name(), field.name(), field.schema(), value, types)?;
        }
    }
    Ok(())
}

/// A default must conform to the field type, or to its first member when the
/// type is a union.
fn check_default(
    record: &str,
    field: &str,
    schema: &SchemaNode,
    value: &Value,
    types: &dyn TypeResolver,
) -> Result<(), SchemaError> {
    let target = match schema {
        SchemaNode::Union(members) => match members.first() {
            Some(first) => first,
            None => return Ok(()),
        },
        other => other,
    };

    if AvroTypeChecker.is_valid(target, value, types) {
        Ok(())
    } else {
        Err(SchemaError::InvalidDefault {
            record: record.to_string(),
            field: field.to_string(),
            expected: describe(target),
        })
    }
}
