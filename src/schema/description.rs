//! Human-readable type descriptions.
//!
//! A description is the Avro JSON text of a type with named types written by
//! full name: `"string"`, `["null","int"]`, `"PetKind"`,
//! `{"type":"array","items":"Pet"}`. Fields and arrays compute it once, at
//! construction, and type-mismatch messages reuse the cached text.

use serde_json::Value;

use super::SchemaNode;

/// Renders the description of `node`.
///
/// Named types are always written as their quoted full name, even at their
/// first occurrence, rather than as their full schema JSON.
///
/// ```rust
/// use avrocheck::{describe, SchemaNode};
///
/// assert_eq!(describe(&SchemaNode::string()), r#""string""#);
/// assert_eq!(describe(&SchemaNode::optional(SchemaNode::int())), r#"["null","int"]"#);
/// assert_eq!(
///     describe(&SchemaNode::array(SchemaNode::reference("Pet"))),
///     r#"{"type":"array","items":"Pet"}"#
/// );
/// ```
pub fn describe(node: &SchemaNode) -> String {
    let mut out = String::new();
    write_description(node, &mut out);
    out
}

fn write_description(node: &SchemaNode, out: &mut String) {
    match node {
        SchemaNode::Primitive(p) => push_quoted(p.name(), out),
        SchemaNode::Record(r) => push_quoted(r.name(), out),
        SchemaNode::Enum(e) => push_quoted(e.name(), out),
        SchemaNode::Fixed(f) => push_quoted(f.name(), out),
        SchemaNode::Reference(name) => push_quoted(name, out),
        SchemaNode::Array(array) => {
            out.push_str(r#"{"type":"array","items":"#);
            write_description(array.items(), out);
            out.push('}');
        }
        SchemaNode::Map(map) => {
            out.push_str(r#"{"type":"map","values":"#);
            write_description(map.values(), out);
            out.push('}');
        }
        SchemaNode::Union(members) => {
            out.push('[');
            for (i, member) in members.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_description(member, out);
            }
            out.push(']');
        }
    }
}

fn push_quoted(text: &str, out: &mut String) {
    out.push_str(&Value::String(text.to_string()).to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Field, RecordSchema};

    #[test]
    fn test_primitive() {
        assert_eq!(describe(&SchemaNode::long()), "\"long\"");
    }

    #[test]
    fn test_named_types_by_name() {
        let pet = SchemaNode::from(
            RecordSchema::new("com.acme.Pet").field(Field::new("name", SchemaNode::string())),
        );
        assert_eq!(describe(&pet), "\"com.acme.Pet\"");
        assert_eq!(
            describe(&SchemaNode::enumeration("PetKind", ["CAT", "DOG"])),
            "\"PetKind\""
        );
        assert_eq!(describe(&SchemaNode::fixed("Md5", 16)), "\"Md5\"");
    }

    #[test]
    fn test_nested_compound() {
        let node = SchemaNode::optional(SchemaNode::map(SchemaNode::array(SchemaNode::int())));
        assert_eq!(
            describe(&node),
            r#"["null",{"type":"map","values":{"type":"array","items":"int"}}]"#
        );
    }

    #[test]
    fn test_display_matches_describe() {
        let node = SchemaNode::union(vec![SchemaNode::string(), SchemaNode::null()]);
        assert_eq!(node.to_string(), r#"["string","null"]"#);
    }
}
