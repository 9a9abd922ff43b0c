//! Type-tree node model.
//!
//! A [`Node`] is the unit the tree is made of: the kind/attribute flags,
//! the optional name, the owning parent link, and the kind-specific
//! payload. The payload is a closed sum ([`NodeData`]) with one case per
//! kind, so generators can match exhaustively; the flag-based queries stay
//! available as thin wrappers for collaborators that reason in kind sets.
//!
//! Ownership discipline: `parent` is the single owning back-link. A node
//! with `parent == NodeId::NONE` is an unattached root. All other links
//! stored in the payload are either owned child handles (element types,
//! member lists, case lists, declaration types) or explicitly non-owning
//! back-references (a forward declaration's definition, a struct's base,
//! a struct's key entries, a reopened module's previous opening).

use crate::{ChildList, Literal, Name, NodeId, TypeFlags};

/// A single node in the type tree.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub(crate) flags: TypeFlags,
    pub(crate) name: Option<Name>,
    pub(crate) parent: NodeId,
    pub(crate) data: NodeData,
}

/// Kind-specific node payload.
///
/// Bounds follow the source notation: 0 never appears as a stored bound,
/// it is turned into the `UNBOUND` flag at construction.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeData {
    /// Basic scalar type; fully described by the node's flags.
    Basic,
    /// Sequence with an owned element type and an optional bound.
    Sequence {
        /// Owned element type.
        element: NodeId,
        /// Maximum length, 0 when unbound.
        max: u64,
    },
    /// Fixed-size array with an owned element type.
    Array {
        /// Owned element type; `NONE` until the two-phase setter runs.
        element: NodeId,
        /// Number of elements, always positive.
        size: u64,
    },
    /// String with an optional bound; wideness lives in the flags.
    String {
        /// Maximum length, 0 when unbound.
        max: u64,
    },
    /// Fixed-point decimal.
    FixedPt {
        /// Total number of digits.
        digits: u64,
        /// Digits after the decimal point.
        fraction_digits: u64,
    },
    /// Map with owned key and value types and an optional bound.
    Map {
        /// Owned key type.
        key: NodeId,
        /// Owned value type.
        value: NodeId,
        /// Maximum size, 0 when unbound.
        max: u64,
    },
    /// Module with its member list.
    Module {
        /// Owned members in insertion order.
        members: ChildList,
        /// Non-owning link to the previous opening of this module name in
        /// the same scope, `NONE` for the first opening.
        previous: NodeId,
    },
    /// Forward declaration of a struct or union; the flavor is in the
    /// kind flag.
    Forward {
        /// Non-owning link to the full definition, `NONE` while
        /// unresolved.
        definition: NodeId,
    },
    /// Struct definition.
    Struct {
        /// Non-owning link to the base struct, `NONE` without
        /// inheritance.
        base: NodeId,
        /// Owned members in insertion order.
        members: ChildList,
        /// Non-owning references into `members` marking the key members,
        /// in registration order.
        keys: Vec<NodeId>,
    },
    /// Named declaration carrying a type.
    Declaration {
        /// Owned declared type; `NONE` until the two-phase setter runs.
        decl_type: NodeId,
    },
    /// Union definition.
    Union {
        /// Kind of the discriminator.
        switch_kind: TypeFlags,
        /// Owned cases in insertion order.
        cases: ChildList,
    },
    /// Single union case.
    UnionCase {
        /// Owned case type; `NONE` until the two-phase setter runs.
        decl_type: NodeId,
        /// Label values selecting this case.
        labels: Vec<Literal>,
        /// Whether this case also covers the default label.
        is_default: bool,
    },
}

impl Node {
    /// The full flag set of this node.
    #[inline]
    pub fn flags(&self) -> TypeFlags {
        self.flags
    }

    /// The kind bits, attributes masked out.
    #[inline]
    pub fn kind(&self) -> TypeFlags {
        self.flags.kind()
    }

    /// The kind bits with the sign modifier also masked out.
    #[inline]
    pub fn kind_ignoring_sign(&self) -> TypeFlags {
        self.flags.kind_ignoring_sign()
    }

    /// Bitwise membership test against a kind set.
    #[inline]
    pub fn is_kind(&self, set: TypeFlags) -> bool {
        self.flags.is_kind(set)
    }

    /// Check if this node defines a name in a module scope.
    #[inline]
    pub fn is_definition(&self) -> bool {
        self.flags.is_definition()
    }

    /// Check if this node carries the unbound marker.
    #[inline]
    pub fn is_unbound(&self) -> bool {
        self.flags.is_unbound()
    }

    /// The node's name handle, if it has one.
    #[inline]
    pub fn name(&self) -> Option<Name> {
        self.name
    }

    /// The owning parent, `NONE` for an unattached root.
    #[inline]
    pub fn parent(&self) -> NodeId {
        self.parent
    }

    /// Check if this node is owned by a container.
    #[inline]
    pub fn is_attached(&self) -> bool {
        self.parent.is_some()
    }

    /// The kind-specific payload, for exhaustive matching.
    #[inline]
    pub fn data(&self) -> &NodeData {
        &self.data
    }

    /// Child list of a module, struct or union; `None` for other kinds.
    pub fn children(&self) -> Option<&ChildList> {
        match &self.data {
            NodeData::Module { members, .. } | NodeData::Struct { members, .. } => Some(members),
            NodeData::Union { cases, .. } => Some(cases),
            _ => None,
        }
    }

    /// Owned element type of a sequence or array, `None` for other kinds
    /// or while an array is still incomplete.
    pub fn element_type(&self) -> Option<NodeId> {
        match self.data {
            NodeData::Sequence { element, .. } | NodeData::Array { element, .. } => {
                element.is_some().then_some(element)
            }
            _ => None,
        }
    }

    /// Declared type of a declaration or union case, `None` for other
    /// kinds or while unset.
    pub fn decl_type(&self) -> Option<NodeId> {
        match self.data {
            NodeData::Declaration { decl_type } | NodeData::UnionCase { decl_type, .. } => {
                decl_type.is_some().then_some(decl_type)
            }
            _ => None,
        }
    }

    /// Resolved definition of a forward declaration, `None` for other
    /// kinds or while unresolved.
    pub fn definition(&self) -> Option<NodeId> {
        match self.data {
            NodeData::Forward { definition } => definition.is_some().then_some(definition),
            _ => None,
        }
    }

    /// Base struct of a struct definition, `None` for other kinds or
    /// without inheritance.
    pub fn base(&self) -> Option<NodeId> {
        match self.data {
            NodeData::Struct { base, .. } => base.is_some().then_some(base),
            _ => None,
        }
    }

    /// Key members of a struct definition, in registration order.
    pub fn keys(&self) -> &[NodeId] {
        match &self.data {
            NodeData::Struct { keys, .. } => keys,
            _ => &[],
        }
    }

    /// Previous opening of a reopened module, `None` for other kinds or
    /// for the first opening.
    pub fn previous(&self) -> Option<NodeId> {
        match self.data {
            NodeData::Module { previous, .. } => previous.is_some().then_some(previous),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(flags: TypeFlags, data: NodeData) -> Node {
        Node {
            flags,
            name: None,
            parent: NodeId::NONE,
            data,
        }
    }

    #[test]
    fn flag_queries_delegate() {
        let seq = node(
            TypeFlags::SEQUENCE | TypeFlags::UNBOUND,
            NodeData::Sequence {
                element: NodeId::from_raw(1),
                max: 0,
            },
        );
        assert_eq!(seq.kind(), TypeFlags::SEQUENCE);
        assert!(seq.is_unbound());
        assert!(!seq.is_definition());
        assert!(seq.is_kind(TypeFlags::SEQUENCE | TypeFlags::MAP));
    }

    #[test]
    fn accessors_are_kind_scoped() {
        let fwd = node(
            TypeFlags::FORWARD_STRUCT,
            NodeData::Forward {
                definition: NodeId::NONE,
            },
        );
        assert_eq!(fwd.definition(), None);
        assert_eq!(fwd.element_type(), None);
        assert!(fwd.keys().is_empty());
        assert!(fwd.is_definition());
    }

    #[test]
    fn incomplete_array_has_no_element() {
        let arr = node(
            TypeFlags::ARRAY,
            NodeData::Array {
                element: NodeId::NONE,
                size: 4,
            },
        );
        assert_eq!(arr.element_type(), None);
        assert!(!arr.is_attached());
    }
}
