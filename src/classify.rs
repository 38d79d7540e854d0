//! Field classification.
//!
//! Whether a missing or null field is acceptable depends on two independent
//! facts about its declaration, captured by [`FieldClass`]: a default only
//! ever excuses absence, and nullability only ever excuses an explicit null.

use crate::schema::Field;

/// The nullability and default status of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldClass {
    /// The declared type is a union with a `null` member.
    pub nullable: bool,
    /// The field declares a default value.
    pub has_default: bool,
}

impl FieldClass {
    /// Returns true if the field may be left out of a payload.
    pub fn may_be_absent(&self) -> bool {
        self.nullable || self.has_default
    }
}

/// Classifies a field from its declaration.
///
/// ```rust
/// use avrocheck::{classify, Field, SchemaNode};
/// use serde_json::json;
///
/// let country = Field::new("country", SchemaNode::string()).with_default(json!("Unknown"));
/// let class = classify(&country);
///
/// assert!(!class.nullable);
/// assert!(class.has_default);
/// ```
pub fn classify(field: &Field) -> FieldClass {
    FieldClass {
        nullable: field.schema().is_nullable(),
        has_default: field.default().is_some(),
    }
}
