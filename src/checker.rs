//! Leaf type checking.
//!
//! The walker decides *where* to look; a [`TypeChecker`] decides whether one
//! value conforms to one type. [`AvroTypeChecker`] implements the Avro JSON
//! rules and is what [`Schema::validate`](crate::Schema::validate) uses.

use serde_json::{Map, Value};
use tracing::warn;

use crate::classify::classify;
use crate::error::SchemaError;
use crate::schema::{PrimitiveType, RecordSchema, SchemaNode};

/// Resolves named-type references by full name.
pub trait TypeResolver: Send + Sync {
    fn resolve(&self, fullname: &str) -> Option<SchemaNode>;
}

/// Answers whether a value conforms to a single schema type.
///
/// Implementations must be pure: the same node and value always give the
/// same answer.
///
/// # Example
///
/// ```rust
/// use avrocheck::{Schema, SchemaNode, TypeChecker, TypeResolver};
/// use serde_json::{json, Value};
///
/// /// Accepts numeric strings wherever a number is declared.
/// struct Lenient;
///
/// impl TypeChecker for Lenient {
///     fn is_valid(&self, node: &SchemaNode, value: &Value, types: &dyn TypeResolver) -> bool {
///         let parsed = value.as_str().and_then(|s| s.parse::<i64>().ok());
///         match (node, parsed) {
///             (SchemaNode::Primitive(_), Some(n)) => avrocheck::AvroTypeChecker.is_valid(node, &json!(n), types),
///             _ => avrocheck::AvroTypeChecker.is_valid(node, value, types),
///         }
///     }
/// }
///
/// let schema = Schema::parse(&json!({
///     "type": "record", "name": "R", "fields": [{"name": "n", "type": "int"}]
/// }))
/// .unwrap();
///
/// assert!(schema.validate_with(&json!({"n": "42"}), &Lenient).unwrap().is_success());
/// assert!(schema.validate(&json!({"n": "42"})).unwrap().is_failure());
/// ```
pub trait TypeChecker: Send + Sync {
    fn is_valid(&self, node: &SchemaNode, value: &Value, types: &dyn TypeResolver) -> bool;
}

/// Avro JSON conformance rules.
///
/// - `int` is a whole number within 32 bits, `long` a whole number within
///   the range exactly representable by a double (±(2^53 - 1))
/// - `float` and `double` accept any number
/// - `bytes` accepts a string; `fixed` a string of exactly `size` characters
/// - `enum` accepts one of its symbols
/// - `array`, `map` and `record` check their contents recursively; a record
///   member may be absent when it is nullable or defaulted
/// - a union accepts a value valid for any member
#[derive(Debug, Default, Clone, Copy)]
pub struct AvroTypeChecker;

const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

impl TypeChecker for AvroTypeChecker {
    fn is_valid(&self, node: &SchemaNode, value: &Value, types: &dyn TypeResolver) -> bool {
        match node {
            SchemaNode::Primitive(primitive) => primitive_is_valid(*primitive, value),
            SchemaNode::Enum(enumeration) => value
                .as_str()
                .is_some_and(|symbol| enumeration.contains(symbol)),
            SchemaNode::Fixed(fixed) => value
                .as_str()
                .is_some_and(|s| s.chars().count() == fixed.size()),
            SchemaNode::Array(array) => value.as_array().is_some_and(|items| {
                items
                    .iter()
                    .all(|item| self.is_valid(array.items(), item, types))
            }),
            SchemaNode::Map(map) => value.as_object().is_some_and(|entries| {
                entries
                    .values()
                    .all(|entry| self.is_valid(map.values(), entry, types))
            }),
            SchemaNode::Record(record) => value
                .as_object()
                .is_some_and(|object| self.record_is_valid(record, object, types)),
            SchemaNode::Union(members) => members
                .iter()
                .any(|member| self.is_valid(member, value, types)),
            SchemaNode::Reference(name) => match resolve_reference(name, types) {
                Ok(resolved) => self.is_valid(&resolved, value, types),
                Err(err) => {
                    warn!(reference = %name, error = %err, "reference not checkable");
                    false
                }
            },
        }
    }
}

impl AvroTypeChecker {
    fn record_is_valid(
        &self,
        record: &RecordSchema,
        object: &Map<String, Value>,
        types: &dyn TypeResolver,
    ) -> bool {
        record.fields().all(|field| match object.get(field.name()) {
            Some(value) => self.is_valid(field.schema(), value, types),
            None => {
                let class = classify(field);
                class.nullable || class.has_default
            }
        })
    }
}

/// Follows a reference through any aliases to the definition it names.
///
/// # Errors
///
/// Returns [`SchemaError::UnresolvedReference`] when a name in the chain is
/// not known, and [`SchemaError::ReferenceCycle`] when the chain comes back
/// to a name it already passed through.
pub(crate) fn resolve_reference(
    name: &str,
    types: &dyn TypeResolver,
) -> Result<SchemaNode, SchemaError> {
    let mut chain: Vec<String> = Vec::new();
    let mut next = name.to_string();

    loop {
        if chain.contains(&next) {
            chain.push(next);
            return Err(SchemaError::ReferenceCycle(chain.join(" -> ")));
        }

        let resolved = types
            .resolve(&next)
            .ok_or_else(|| SchemaError::UnresolvedReference(next.clone()))?;
        chain.push(next);

        match resolved {
            SchemaNode::Reference(target) => next = target,
            definition => return Ok(definition),
        }
    }
}

fn primitive_is_valid(primitive: PrimitiveType, value: &Value) -> bool {
    match primitive {
        PrimitiveType::Null => value.is_null(),
        PrimitiveType::Boolean => value.is_boolean(),
        PrimitiveType::Int => whole_number(value)
            .is_some_and(|n| n >= f64::from(i32::MIN) && n <= f64::from(i32::MAX)),
        PrimitiveType::Long => whole_number(value)
            .is_some_and(|n| n.abs() <= MAX_SAFE_INTEGER),
        PrimitiveType::Float | PrimitiveType::Double => value.is_number(),
        PrimitiveType::Bytes | PrimitiveType::String => value.is_string(),
    }
}

/// Returns a number as a float if it has no fractional part.
///
/// `1.0` counts as whole: JSON does not distinguish it from `1`.
fn whole_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(number) => number.as_f64()?,
        _ => return None,
    };
    (n.fract() == 0.0).then_some(n)
}

/// The observed kind of a value, named the way JavaScript's `typeof` names
/// it: `string`, `number`, `boolean`, or `object` for objects, arrays and
/// null.
pub fn observed_kind(value: &Value) -> &'static str {
    match value {
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Null | Value::Array(_) | Value::Object(_) => "object",
    }
}
