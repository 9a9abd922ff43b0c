//! Node formatting for logs and debugging.

#![allow(clippy::format_push_string)] // Debug formatting prioritizes clarity over allocation

use crate::{NodeData, NodeId, TypeFlags, TypeTree};
use std::fmt::Write as _;

impl TypeTree {
    /// Format a node as source-notation text.
    pub fn format_node(&self, id: NodeId) -> String {
        let mut buf = String::new();
        self.format_node_into(id, &mut buf);
        buf
    }

    /// Format a node into an existing string buffer.
    pub fn format_node_into(&self, id: NodeId, buf: &mut String) {
        let Some(node) = self.node(id) else {
            buf.push_str("<dangling>");
            return;
        };
        match &node.data {
            NodeData::Basic => buf.push_str(basic_name(node.flags())),
            NodeData::Sequence { element, max } => {
                buf.push_str("sequence<");
                self.format_node_into(*element, buf);
                if !node.is_unbound() {
                    let _ = write!(buf, ", {max}");
                }
                buf.push('>');
            }
            NodeData::Array { element, size } => {
                if element.is_some() {
                    self.format_node_into(*element, buf);
                } else {
                    buf.push_str("<incomplete>");
                }
                let _ = write!(buf, "[{size}]");
            }
            NodeData::String { max } => {
                buf.push_str(if node.flags().contains(TypeFlags::WIDE) {
                    "wstring"
                } else {
                    "string"
                });
                if !node.is_unbound() {
                    let _ = write!(buf, "<{max}>");
                }
            }
            NodeData::FixedPt {
                digits,
                fraction_digits,
            } => {
                let _ = write!(buf, "fixed<{digits},{fraction_digits}>");
            }
            NodeData::Map { key, value, max } => {
                buf.push_str("map<");
                self.format_node_into(*key, buf);
                buf.push_str(", ");
                self.format_node_into(*value, buf);
                if !node.is_unbound() {
                    let _ = write!(buf, ", {max}");
                }
                buf.push('>');
            }
            NodeData::Module { .. } => {
                let _ = write!(buf, "module {}", self.node_name(id).unwrap_or("<anonymous>"));
            }
            NodeData::Struct { .. } => {
                let _ = write!(buf, "struct {}", self.node_name(id).unwrap_or("<anonymous>"));
            }
            NodeData::Union { .. } => {
                let _ = write!(buf, "union {}", self.node_name(id).unwrap_or("<anonymous>"));
            }
            NodeData::Forward { .. } => {
                let keyword = if node.is_kind(TypeFlags::FORWARD_STRUCT) {
                    "struct"
                } else {
                    "union"
                };
                let _ = write!(
                    buf,
                    "{keyword} {}",
                    self.node_name(id).unwrap_or("<anonymous>")
                );
            }
            NodeData::Declaration { decl_type } => {
                if decl_type.is_some() {
                    self.format_node_into(*decl_type, buf);
                } else {
                    buf.push_str("<incomplete>");
                }
                let _ = write!(buf, " {}", self.node_name(id).unwrap_or("<anonymous>"));
            }
            NodeData::UnionCase {
                decl_type,
                labels,
                is_default,
            } => {
                for label in labels {
                    let _ = write!(buf, "case {label}: ");
                }
                if *is_default {
                    buf.push_str("default: ");
                }
                if decl_type.is_some() {
                    self.format_node_into(*decl_type, buf);
                } else {
                    buf.push_str("<incomplete>");
                }
                if let Some(name) = self.node_name(id) {
                    let _ = write!(buf, " {name}");
                }
            }
        }
    }
}

/// Source-notation name of a basic scalar kind.
fn basic_name(flags: TypeFlags) -> &'static str {
    let unsigned = flags.contains(TypeFlags::UNSIGNED);
    let kind = flags.kind_ignoring_sign().difference(TypeFlags::WIDE);
    if kind == TypeFlags::INT8 {
        if unsigned { "uint8" } else { "int8" }
    } else if kind == TypeFlags::INT16 {
        if unsigned { "unsigned short" } else { "short" }
    } else if kind == TypeFlags::INT32 {
        if unsigned { "unsigned long" } else { "long" }
    } else if kind == TypeFlags::INT64 {
        if unsigned {
            "unsigned long long"
        } else {
            "long long"
        }
    } else if kind == TypeFlags::FLOAT {
        "float"
    } else if kind == TypeFlags::DOUBLE {
        "double"
    } else if kind == TypeFlags::LONG_DOUBLE {
        "long double"
    } else if kind == TypeFlags::CHAR {
        if flags.contains(TypeFlags::WIDE) {
            "wchar"
        } else {
            "char"
        }
    } else if kind == TypeFlags::OCTET {
        "octet"
    } else if kind == TypeFlags::BOOLEAN {
        "boolean"
    } else if kind == TypeFlags::ENUM {
        "enum"
    } else if kind == TypeFlags::FIXED_PT_CONST {
        "fixed"
    } else if kind == TypeFlags::ANY {
        "any"
    } else {
        "<basic>"
    }
}

#[cfg(test)]
mod tests {
    #![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

    use crate::{TypeFlags, TypeTree};

    #[test]
    fn formats_basic_types() {
        let mut tree = TypeTree::new();
        let long = tree.create_base_type(TypeFlags::INT32).unwrap();
        assert_eq!(tree.format_node(long), "long");
        let ushort = tree
            .create_base_type(TypeFlags::INT16 | TypeFlags::UNSIGNED)
            .unwrap();
        assert_eq!(tree.format_node(ushort), "unsigned short");
        let wchar = tree
            .create_base_type(TypeFlags::CHAR | TypeFlags::WIDE)
            .unwrap();
        assert_eq!(tree.format_node(wchar), "wchar");
    }

    #[test]
    fn formats_templates() {
        let mut tree = TypeTree::new();
        let elem = tree.create_base_type(TypeFlags::INT32).unwrap();
        let seq = tree.create_sequence(elem, 10).unwrap();
        assert_eq!(tree.format_node(seq), "sequence<long, 10>");

        let elem = tree.create_base_type(TypeFlags::OCTET).unwrap();
        let unbounded = tree.create_sequence(elem, 0).unwrap();
        assert_eq!(tree.format_node(unbounded), "sequence<octet>");

        let wstr = tree
            .create_string(TypeFlags::STRING | TypeFlags::WIDE, 0)
            .unwrap();
        assert_eq!(tree.format_node(wstr), "wstring");

        let fixed = tree.create_fixed_pt(9, 2).unwrap();
        assert_eq!(tree.format_node(fixed), "fixed<9,2>");
    }

    #[test]
    fn formats_aggregates() {
        let mut tree = TypeTree::new();
        let st = tree.create_struct("Point").unwrap();
        assert_eq!(tree.format_node(st), "struct Point");

        let fwd = tree.create_union_forward_dcl("Shape").unwrap();
        assert_eq!(tree.format_node(fwd), "union Shape");

        let ty = tree.create_base_type(TypeFlags::DOUBLE).unwrap();
        let decl = tree.create_declaration("x", Some(ty)).unwrap();
        assert_eq!(tree.format_node(decl), "double x");
    }
}
