//! The recursive walk over a record schema and a payload.
//!
//! For each declared field the walker looks the value up by name, classifies
//! the field, and dispatches on whether the value is absent, null, or
//! present. Present values descend into records and arrays; everything else
//! goes to the leaf [`TypeChecker`]. Each call returns its own errors and the
//! caller concatenates them, so traversal order is declaration order,
//! depth first.

use std::sync::Arc;

use serde_json::{Map, Value};
use stillwater::Validation;
use tracing::{debug, trace, warn};

use crate::checker::{observed_kind, resolve_reference, TypeChecker, TypeResolver};
use crate::classify::classify;
use crate::error::{SchemaError, ValidationError, ValidationErrors};
use crate::path::FieldPath;
use crate::schema::{ArraySchema, Field, RecordSchema, SchemaNode};
use crate::ValidationResult;

/// Per-walk state threaded through the recursion.
///
/// `expanding` holds the named records entered on the current path, outermost
/// first. Re-entering one of them means the schema refers back to itself and
/// the walk stops with [`SchemaError::RecursiveSchema`].
#[derive(Clone)]
struct WalkContext<'a> {
    types: &'a dyn TypeResolver,
    checker: &'a dyn TypeChecker,
    expanding: Vec<String>,
}

impl<'a> WalkContext<'a> {
    fn new(types: &'a dyn TypeResolver, checker: &'a dyn TypeChecker) -> Self {
        Self {
            types,
            checker,
            expanding: Vec::new(),
        }
    }

    /// Returns a context with `record` pushed onto the expansion path.
    fn enter(&self, record: &RecordSchema, path: &FieldPath) -> Result<Self, SchemaError> {
        if self.expanding.iter().any(|name| name == record.name()) {
            warn!(record = %record.name(), path = %path, "recursive schema expansion");
            return Err(SchemaError::RecursiveSchema {
                name: record.name().to_string(),
                path: path.to_string(),
            });
        }

        let mut expanding = self.expanding.clone();
        expanding.push(record.name().to_string());
        Ok(Self {
            types: self.types,
            checker: self.checker,
            expanding,
        })
    }
}

/// What a present value's declared type asks the walker to do.
enum Descent {
    Record(Arc<RecordSchema>),
    Array(Arc<ArraySchema>),
    Leaf,
}

/// Validates a whole payload against a top-level record.
pub(crate) fn validate_payload(
    root: &RecordSchema,
    payload: &Value,
    types: &dyn TypeResolver,
    checker: &dyn TypeChecker,
) -> Result<ValidationResult<()>, SchemaError> {
    let path = FieldPath::root();
    let errors = match payload.as_object() {
        Some(object) => {
            let context = WalkContext::new(types, checker).enter(root, &path)?;
            validate_record(root, object, &path, &context)?
        }
        None => vec![ValidationError::type_mismatch(
            path,
            SchemaNode::reference(root.name()).to_string(),
            observed_kind(payload),
        )],
    };

    debug!(record = %root.name(), errors = errors.len(), "payload validated");

    Ok(match ValidationErrors::from_vec(errors) {
        None => Validation::Success(()),
        Some(errors) => Validation::Failure(errors),
    })
}

fn validate_record(
    record: &RecordSchema,
    object: &Map<String, Value>,
    path: &FieldPath,
    context: &WalkContext<'_>,
) -> Result<Vec<ValidationError>, SchemaError> {
    let mut errors = Vec::new();
    for field in record.fields() {
        errors.extend(validate_field(
            field,
            object.get(field.name()),
            &path.child(field.name()),
            context,
        )?);
    }
    Ok(errors)
}

fn validate_field(
    field: &Field,
    value: Option<&Value>,
    path: &FieldPath,
    context: &WalkContext<'_>,
) -> Result<Vec<ValidationError>, SchemaError> {
    let class = classify(field);
    trace!(path = %path, nullable = class.nullable, has_default = class.has_default, "field");

    match value {
        None if class.may_be_absent() => Ok(Vec::new()),
        None => Ok(vec![ValidationError::missing(path.clone())]),
        Some(Value::Null) if class.nullable => Ok(Vec::new()),
        Some(Value::Null) => Ok(vec![ValidationError::null_not_allowed(path.clone())]),
        Some(value) => validate_present(field.schema(), field.description(), value, path, context),
    }
}

/// Validates a non-null value against a declared type.
fn validate_present(
    node: &SchemaNode,
    description: &str,
    value: &Value,
    path: &FieldPath,
    context: &WalkContext<'_>,
) -> Result<Vec<ValidationError>, SchemaError> {
    match descent(node, context)? {
        Descent::Record(record) => match value.as_object() {
            Some(object) => {
                let inner = context.enter(&record, path)?;
                validate_record(&record, object, path, &inner)
            }
            None => Ok(vec![ValidationError::type_mismatch(
                path.clone(),
                description,
                observed_kind(value),
            )]),
        },
        Descent::Array(array) => match value.as_array() {
            Some(items) => validate_elements(&array, items, path, context),
            None => Ok(vec![ValidationError::array_type_mismatch(
                path.clone(),
                observed_kind(value),
            )]),
        },
        Descent::Leaf => {
            if context.checker.is_valid(node, value, context.types) {
                Ok(Vec::new())
            } else {
                Ok(vec![ValidationError::type_mismatch(
                    path.clone(),
                    description,
                    observed_kind(value),
                )])
            }
        }
    }
}

/// Validates each element as an anonymous field of the element type.
fn validate_elements(
    array: &ArraySchema,
    items: &[Value],
    path: &FieldPath,
    context: &WalkContext<'_>,
) -> Result<Vec<ValidationError>, SchemaError> {
    let element_type = array.items();
    let mut errors = Vec::new();

    for (i, item) in items.iter().enumerate() {
        let item_path = path.index(i);
        if item.is_null() {
            if !element_type.is_nullable() {
                errors.push(ValidationError::null_not_allowed(item_path));
            }
            continue;
        }
        errors.extend(validate_present(
            element_type,
            array.item_description(),
            item,
            &item_path,
            context,
        )?);
    }

    Ok(errors)
}

/// Decides how to treat a present value of type `node`.
///
/// References are resolved through any aliases, and a union with a single non-null member is
/// treated as that member.
fn descent(node: &SchemaNode, context: &WalkContext<'_>) -> Result<Descent, SchemaError> {
    match node {
        SchemaNode::Record(record) => Ok(Descent::Record(Arc::clone(record))),
        SchemaNode::Array(array) => Ok(Descent::Array(Arc::clone(array))),
        SchemaNode::Reference(name) => descent(&resolve_reference(name, context.types)?, context),
        SchemaNode::Union(_) => match node.single_non_null_member() {
            Some(member) => descent(member, context),
            None => Ok(Descent::Leaf),
        },
        SchemaNode::Primitive(_)
        | SchemaNode::Enum(_)
        | SchemaNode::Fixed(_)
        | SchemaNode::Map(_) => Ok(Descent::Leaf),
    }
}
