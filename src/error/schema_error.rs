//! Schema defects.
//!
//! A [`SchemaError`] means the schema itself cannot be used: it failed to
//! parse, it names a type that does not exist, or its self-references make a
//! finite walk impossible. These abort the operation instead of being
//! accumulated alongside payload errors.

/// Errors raised for a defective schema.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The schema text is not valid JSON.
    #[error("schema is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// A schema node is not a string, object or array.
    #[error("invalid schema node at {context}: {found}")]
    InvalidNode { context: String, found: String },

    /// A required attribute of a complex type is missing or has the wrong shape.
    #[error("{context}: missing or invalid attribute '{attribute}'")]
    MissingAttribute {
        context: String,
        attribute: &'static str,
    },

    /// The `type` attribute names no known primitive or complex type.
    #[error("unknown type '{0}'")]
    UnknownType(String),

    /// A type, field or symbol name violates the name grammar.
    #[error("invalid name '{0}'")]
    InvalidName(String),

    /// A record declares two fields with the same name.
    #[error("record '{record}' declares field '{field}' more than once")]
    DuplicateField { record: String, field: String },

    /// Two named types share a full name.
    #[error("named type '{0}' already registered")]
    DuplicateName(String),

    /// An enum declares the same symbol twice.
    #[error("enum '{name}' declares symbol '{symbol}' more than once")]
    DuplicateSymbol { name: String, symbol: String },

    /// A union has a union member or repeats a member type.
    #[error("invalid union: {0}")]
    InvalidUnion(String),

    /// A top-level schema is not a record.
    #[error("top-level schema must be a record, found {0}")]
    NotARecord(String),

    /// A reference names a type that is not registered.
    #[error("unresolved reference to named type '{0}'")]
    UnresolvedReference(String),

    /// A field default does not conform to the field type.
    #[error("invalid default for field '{field}' of '{record}': expected {expected}")]
    InvalidDefault {
        record: String,
        field: String,
        expected: String,
    },

    /// The configured name pattern is not a valid regular expression.
    #[error("invalid name pattern: {0}")]
    InvalidNamePattern(#[from] regex::Error),

    /// Only records, enums and fixed types may be registered, each under its
    /// own full name.
    #[error("cannot register {kind} as named type '{name}'")]
    NotANamedType { name: String, kind: String },

    /// References that only resolve to each other.
    #[error("reference cycle: {0}")]
    ReferenceCycle(String),

    /// A named record was re-entered while it was still being expanded.
    #[error("recursive schema not supported: '{name}' re-entered at '{path}'")]
    RecursiveSchema { name: String, path: String },

    /// A lookup by name found no registered record.
    #[error("schema '{0}' not found")]
    SchemaNotFound(String),
}
