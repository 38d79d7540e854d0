//! Field paths for locating values in nested payloads.
//!
//! This module provides [`FieldPath`] and [`PathSegment`]. A path is built
//! incrementally while the walker descends into records and arrays, and is
//! rendered as `pets[0].name`: record members are dot-joined, array members
//! are bracket-indexed.

use std::fmt::{self, Display};

/// A segment of a field path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A record member (e.g., `pets`, `name`)
    Field(String),
    /// An array element (e.g., `[0]`)
    Index(usize),
}

/// The location of a value within a payload.
///
/// Paths are immutable; [`child`](FieldPath::child) and
/// [`index`](FieldPath::index) return extended copies so sibling fields can
/// share a parent.
///
/// # Example
///
/// ```rust
/// use avrocheck::FieldPath;
///
/// let path = FieldPath::root().child("pets").index(0).child("name");
/// assert_eq!(path.to_string(), "pets[0].name");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// Creates an empty path representing the top-level record.
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns a new path naming a member of the record at this path.
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Field(name.into()));
        Self { segments }
    }

    /// Returns a new path naming an element of the array at this path.
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        Self { segments }
    }

    /// Returns true if this is the root path (no segments).
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the number of segments in this path.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if this path has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns an iterator over the path segments.
    pub fn segments(&self) -> impl Iterator<Item = &PathSegment> {
        self.segments.iter()
    }

    /// Returns the last segment, or None if this is root.
    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Field(name) => {
                    if i > 0 {
                        write!(f, ".")?;
                    }
                    write!(f, "{}", name)?;
                }
                PathSegment::Index(idx) => write!(f, "[{}]", idx)?,
            }
        }
        Ok(())
    }
}
