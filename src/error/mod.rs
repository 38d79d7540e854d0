//! Error types.
//!
//! [`ValidationError`]s describe a payload that does not conform and are
//! returned as data. [`SchemaError`]s describe a defective schema and abort
//! the operation that found them.

mod schema_error;
mod validation_error;

pub use schema_error::SchemaError;
pub use validation_error::{ErrorKind, ValidationError, ValidationErrors};
