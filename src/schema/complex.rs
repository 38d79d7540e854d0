//! Enum, fixed, array and map types.

use super::describe;
use super::SchemaNode;

/// A named enumeration of string symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumSchema {
    name: String,
    symbols: Vec<String>,
    doc: Option<String>,
}

impl EnumSchema {
    pub fn new<I, S>(name: impl Into<String>, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            symbols: symbols.into_iter().map(Into::into).collect(),
            doc: None,
        }
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    /// Returns true if `symbol` is one of the declared symbols.
    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.iter().any(|s| s == symbol)
    }
}

/// A named fixed-size byte sequence.
///
/// In a JSON payload a fixed value is a string of exactly `size` characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedSchema {
    name: String,
    size: usize,
}

impl FixedSchema {
    pub fn new(name: impl Into<String>, size: usize) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> usize {
        self.size
    }
}

/// An ordered sequence of one element type.
///
/// The element type's description is cached for element-level messages.
#[derive(Debug, Clone)]
pub struct ArraySchema {
    items: SchemaNode,
    item_description: String,
}

impl ArraySchema {
    pub fn new(items: SchemaNode) -> Self {
        let item_description = describe(&items);
        Self {
            items,
            item_description,
        }
    }

    /// The element type.
    pub fn items(&self) -> &SchemaNode {
        &self.items
    }

    /// The cached description of the element type.
    pub fn item_description(&self) -> &str {
        &self.item_description
    }
}

/// A string-keyed mapping of one value type.
#[derive(Debug, Clone)]
pub struct MapSchema {
    values: SchemaNode,
}

impl MapSchema {
    pub fn new(values: SchemaNode) -> Self {
        Self { values }
    }

    /// The value type.
    pub fn values(&self) -> &SchemaNode {
        &self.values
    }
}
