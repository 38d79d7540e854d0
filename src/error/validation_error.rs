//! Payload conformance errors.
//!
//! This module provides [`ValidationError`] for a single violation and
//! [`ValidationErrors`] for the accumulated, non-empty result of a walk.

use std::fmt::{self, Display};

use stillwater::prelude::*;

use crate::path::FieldPath;

/// The category of a payload violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A field that is neither nullable nor defaulted is absent.
    MissingRequiredField,
    /// A non-nullable field holds an explicit null.
    NullNotAllowed,
    /// A value does not conform to its declared type.
    TypeMismatch,
    /// An array-typed field holds something other than an array.
    ArrayTypeMismatch,
}

impl ErrorKind {
    /// Machine-readable code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::MissingRequiredField => "missing_required_field",
            ErrorKind::NullNotAllowed => "null_not_allowed",
            ErrorKind::TypeMismatch => "invalid_type",
            ErrorKind::ArrayTypeMismatch => "invalid_array_type",
        }
    }
}

/// A single payload violation.
///
/// The `Display` output is the human-readable message, one of:
///
/// - `Missing required field: '<path>'`
/// - `Field '<path>' is null, but null is not allowed`
/// - `Invalid type for field '<path>', expected: <type>, received: <kind>`
/// - `Invalid type for field '<path>', expected: array, received: <kind>`
///
/// # Example
///
/// ```rust
/// use avrocheck::{FieldPath, ValidationError};
///
/// let error = ValidationError::type_mismatch(
///     FieldPath::root().child("pets").index(0).child("name"),
///     "\"string\"",
///     "number",
/// );
///
/// assert_eq!(
///     error.to_string(),
///     "Invalid type for field 'pets[0].name', expected: \"string\", received: number"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Where in the payload the violation occurred.
    pub path: FieldPath,
    /// What kind of violation it is.
    pub kind: ErrorKind,
    /// Description of the declared type, for type mismatches.
    pub expected: Option<String>,
    /// The observed kind of the offending value, for type mismatches.
    pub received: Option<String>,
}

impl ValidationError {
    /// A required field is absent.
    pub fn missing(path: FieldPath) -> Self {
        Self {
            path,
            kind: ErrorKind::MissingRequiredField,
            expected: None,
            received: None,
        }
    }

    /// A non-nullable field holds null.
    pub fn null_not_allowed(path: FieldPath) -> Self {
        Self {
            path,
            kind: ErrorKind::NullNotAllowed,
            expected: None,
            received: None,
        }
    }

    /// A value does not conform to the described type.
    pub fn type_mismatch(
        path: FieldPath,
        expected: impl Into<String>,
        received: impl Into<String>,
    ) -> Self {
        Self {
            path,
            kind: ErrorKind::TypeMismatch,
            expected: Some(expected.into()),
            received: Some(received.into()),
        }
    }

    /// An array field holds a non-array value.
    pub fn array_type_mismatch(path: FieldPath, received: impl Into<String>) -> Self {
        Self {
            path,
            kind: ErrorKind::ArrayTypeMismatch,
            expected: Some("array".to_string()),
            received: Some(received.into()),
        }
    }

    /// Machine-readable code of this error's kind.
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Renders the human-readable message.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_root() {
            "(root)".to_string()
        } else {
            self.path.to_string()
        };
        let expected = self.expected.as_deref().unwrap_or("unknown");
        let received = self.received.as_deref().unwrap_or("unknown");

        match self.kind {
            ErrorKind::MissingRequiredField => write!(f, "Missing required field: '{}'", path),
            ErrorKind::NullNotAllowed => {
                write!(f, "Field '{}' is null, but null is not allowed", path)
            }
            ErrorKind::TypeMismatch | ErrorKind::ArrayTypeMismatch => write!(
                f,
                "Invalid type for field '{}', expected: {}, received: {}",
                path, expected, received
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<ValidationError>();
    assert_sync::<ValidationError>();
};

/// A non-empty collection of payload violations in traversal order.
///
/// `ValidationErrors` wraps a `NonEmptyVec<ValidationError>` so a failed
/// `Validation` always carries at least one error. It implements `Semigroup`,
/// so results from sibling fields combine without a shared accumulator:
///
/// ```rust
/// use avrocheck::{FieldPath, ValidationError, ValidationErrors};
/// use stillwater::prelude::*;
///
/// let name = ValidationErrors::single(ValidationError::missing(FieldPath::root().child("name")));
/// let pets = ValidationErrors::single(ValidationError::missing(FieldPath::root().child("pets")));
///
/// let combined = name.combine(pets);
/// assert_eq!(combined.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationErrors(NonEmptyVec<ValidationError>);

impl ValidationErrors {
    /// Creates a collection containing a single error.
    pub fn single(error: ValidationError) -> Self {
        Self(NonEmptyVec::singleton(error))
    }

    /// Creates a collection from a `Vec`, or `None` when it is empty.
    pub fn from_vec(errors: Vec<ValidationError>) -> Option<Self> {
        NonEmptyVec::from_vec(errors).map(Self)
    }

    /// Returns the number of errors in this collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; the collection is guaranteed non-empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns an iterator over the contained errors.
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    /// Returns the first error in traversal order.
    pub fn first(&self) -> &ValidationError {
        self.0.head()
    }

    /// Returns all errors at the specified path.
    pub fn at_path(&self, path: &FieldPath) -> Vec<&ValidationError> {
        self.0.iter().filter(|e| &e.path == path).collect()
    }

    /// Returns all errors of the specified kind.
    pub fn of_kind(&self, kind: ErrorKind) -> Vec<&ValidationError> {
        self.0.iter().filter(|e| e.kind == kind).collect()
    }

    /// Renders every error as its human-readable message.
    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }

    /// Converts this collection into a `Vec<ValidationError>`.
    pub fn into_vec(self) -> Vec<ValidationError> {
        self.0.into_vec()
    }
}

impl Semigroup for ValidationErrors {
    fn combine(self, other: Self) -> Self {
        ValidationErrors(self.0.combine(other.0))
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation failed with {} error(s):", self.len())?;
        for (i, error) in self.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<ValidationErrors>();
    assert_sync::<ValidationErrors>();
};
