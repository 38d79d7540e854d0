//! # avrocheck
//!
//! Conformance checking of JSON values against Avro record schemas that
//! reports ALL violations, each located by a field path, rather than a single
//! pass/fail answer.
//!
//! ## Overview
//!
//! A payload is walked field by field against the record's declaration. At
//! every nesting level a field is either absent, explicitly null, or present:
//!
//! - absence is fine when the field is nullable or declares a default
//! - null is fine only when the field is nullable
//! - a present value descends into records and arrays, and is otherwise
//!   handed to a leaf [`TypeChecker`]
//!
//! Errors accumulate through stillwater's `Validation` type, in field
//! declaration order, depth first.
//!
//! ## Core Types
//!
//! - [`Schema`]: a parsed top-level record schema
//! - [`SchemaNode`]: one schema type
//! - [`FieldPath`]: the location of a value, e.g. `pets[0].name`
//! - [`ValidationError`] / [`ValidationErrors`]: payload violations
//! - [`SchemaError`]: a defective schema
//!
//! ## Example
//!
//! ```rust
//! use avrocheck::{validate_against_schema, Schema};
//! use serde_json::json;
//!
//! let schema = Schema::parse(&json!({
//!     "type": "record",
//!     "name": "PetOwner",
//!     "fields": [
//!         {"name": "name", "type": "string"},
//!         {"name": "age", "type": ["null", "int"], "default": null},
//!         {"name": "pets", "type": {"type": "array", "items": {
//!             "type": "record",
//!             "name": "Pet",
//!             "fields": [{"name": "name", "type": "string"}]
//!         }}}
//!     ]
//! }))
//! .unwrap();
//!
//! let errors = validate_against_schema(&schema, &json!({
//!     "age": "ten",
//!     "pets": [{"name": 123}]
//! }))
//! .unwrap();
//!
//! assert_eq!(errors, vec![
//!     "Missing required field: 'name'",
//!     r#"Invalid type for field 'age', expected: ["null","int"], received: string"#,
//!     r#"Invalid type for field 'pets[0].name', expected: "string", received: number"#,
//! ]);
//! ```

pub mod batch;
pub mod checker;
pub mod classify;
pub mod error;
pub mod path;
pub mod registry;
pub mod schema;
mod walker;

use serde_json::Value;
use stillwater::Validation;

pub use batch::validate_batch;
pub use checker::{observed_kind, AvroTypeChecker, TypeChecker, TypeResolver};
pub use classify::{classify, FieldClass};
pub use error::{ErrorKind, SchemaError, ValidationError, ValidationErrors};
pub use path::{FieldPath, PathSegment};
pub use registry::SchemaRegistry;
pub use schema::{
    describe, ArraySchema, EnumSchema, Field, FixedSchema, MapSchema, ParseOptions,
    PrimitiveType, RecordSchema, Schema, SchemaNode, DEFAULT_NAME_PATTERN,
};

/// Type alias for validation results using ValidationErrors
pub type ValidationResult<T> = Validation<T, ValidationErrors>;

/// Validates a payload and renders every violation as a message.
///
/// Returns an empty `Vec` iff the payload conforms. Payload problems are
/// always reported this way; `Err` is reserved for schema defects discovered
/// during the walk.
pub fn validate_against_schema(schema: &Schema, payload: &Value) -> Result<Vec<String>, SchemaError> {
    Ok(match schema.validate(payload)? {
        Validation::Success(()) => Vec::new(),
        Validation::Failure(errors) => errors.messages(),
    })
}
