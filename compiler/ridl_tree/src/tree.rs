//! The owning node arena.
//!
//! All nodes of one compilation unit live in a [`TypeTree`]. The arena
//! hands out stable [`NodeId`] handles; ownership between nodes is the
//! `parent` back-link plus the owned handles inside each node's payload.
//! The tree is built by a single writer (the parser) and is read-only
//! afterwards.

use crate::{Name, Node, NodeData, NodeId, TreeError, TypeFlags};
use crate::name::NameInterner;

mod construct;


/// Arena holding every node of a type tree, plus the interned
/// identifiers they use.
#[derive(Default)]
pub struct TypeTree {
    slots: Vec<Option<Node>>,
    names: NameInterner,
    live: usize,
}

impl TypeTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Check if the tree has no live nodes.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Check if a handle refers to a live node of this tree.
    pub fn contains(&self, id: NodeId) -> bool {
        self.slot(id).is_some()
    }

    /// Look up a node. Returns `None` for the `NONE` sentinel, foreign
    /// handles, and destroyed nodes.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.slot(id)
    }

    /// Resolve a name handle to its string.
    pub fn name_str(&self, name: Name) -> &str {
        self.names.resolve(name)
    }

    /// A node's name as a string, if the node is live and named.
    pub fn node_name(&self, id: NodeId) -> Option<&str> {
        self.slot(id)?.name.map(|n| self.names.resolve(n))
    }

    // === Thin kind-query wrappers (generator-facing) ===

    /// Kind bits of a node, attributes masked out.
    pub fn kind_of(&self, id: NodeId) -> Option<TypeFlags> {
        self.slot(id).map(Node::kind)
    }

    /// Kind bits with the sign modifier also masked out.
    pub fn kind_of_ignoring_sign(&self, id: NodeId) -> Option<TypeFlags> {
        self.slot(id).map(Node::kind_ignoring_sign)
    }

    /// Bitwise membership test of a node's kind against a kind set.
    pub fn is_kind(&self, id: NodeId, set: TypeFlags) -> bool {
        self.slot(id).is_some_and(|n| n.is_kind(set))
    }

    /// Check if a node is a definition kind.
    pub fn is_definition(&self, id: NodeId) -> bool {
        self.slot(id).is_some_and(Node::is_definition)
    }

    /// Check if a node carries the unbound marker.
    pub fn is_unbound(&self, id: NodeId) -> bool {
        self.slot(id).is_some_and(Node::is_unbound)
    }

    // === Destruction ===

    /// Destroy an unattached node and everything it owns.
    ///
    /// Fails with [`TreeError::StillAttached`] when the node has an
    /// owner; only the root of a subtree can be destroyed. Non-owning
    /// links (a forward declaration's definition, a struct's base, key
    /// entries, a reopened module's previous opening) are not followed,
    /// so their targets survive.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn destroy(&mut self, id: NodeId) -> Result<(), TreeError> {
        let node = self.node_ref(id)?;
        if node.is_attached() {
            return Err(TreeError::StillAttached);
        }
        self.release(id);
        Ok(())
    }

    fn release(&mut self, id: NodeId) {
        let Some(slot) = self.slots.get_mut(id.raw() as usize) else {
            return;
        };
        let Some(node) = slot.take() else {
            return;
        };
        self.live -= 1;
        match node.data {
            NodeData::Basic | NodeData::String { .. } | NodeData::FixedPt { .. } => {}
            NodeData::Sequence { element, .. } | NodeData::Array { element, .. } => {
                self.release_owned(element);
            }
            NodeData::Map { key, value, .. } => {
                self.release_owned(key);
                self.release_owned(value);
            }
            NodeData::Module { members, .. } => {
                for member in &members {
                    self.release(member);
                }
            }
            NodeData::Struct { members, .. } => {
                for member in &members {
                    self.release(member);
                }
            }
            NodeData::Union { cases, .. } => {
                for case in &cases {
                    self.release(case);
                }
            }
            NodeData::Forward { .. } => {}
            NodeData::Declaration { decl_type } | NodeData::UnionCase { decl_type, .. } => {
                self.release_owned(decl_type);
            }
        }
    }

    fn release_owned(&mut self, id: NodeId) {
        if id.is_some() {
            self.release(id);
        }
    }

    // === Internal plumbing ===

    fn slot(&self, id: NodeId) -> Option<&Node> {
        if id.is_none() {
            return None;
        }
        self.slots.get(id.raw() as usize)?.as_ref()
    }

    pub(crate) fn node_ref(&self, id: NodeId) -> Result<&Node, TreeError> {
        self.slot(id)
            .ok_or(TreeError::InvalidArgument("dangling node handle"))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, TreeError> {
        if id.is_none() {
            return Err(TreeError::InvalidArgument("dangling node handle"));
        }
        self.slots
            .get_mut(id.raw() as usize)
            .and_then(Option::as_mut)
            .ok_or(TreeError::InvalidArgument("dangling node handle"))
    }

    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId::from_raw(self.slots.len() as u32);
        self.slots.push(Some(node));
        self.live += 1;
        id
    }

    pub(crate) fn intern(&mut self, s: &str) -> Name {
        self.names.intern(s)
    }
}
