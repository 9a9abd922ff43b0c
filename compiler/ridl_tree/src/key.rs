//! Key determination.
//!
//! Whether a struct member counts as part of its type's key cannot be
//! answered from the member alone: the same struct node is reachable as a
//! field of different outer structs and through inheritance, and a member
//! is a key only if every enclosing struct on the way in registered the
//! enclosing field as a key. The traversing collaborator therefore
//! records the frames it walked through in a [`CallPath`] and asks about
//! the innermost declaration in that context.

use crate::{NodeData, NodeId, TreeError, TypeFlags, TypeTree};
use rustc_hash::FxHashSet;

/// Ordered sequence of visited nodes, outermost frame first, ending at
/// the member declaration under question.
///
/// Built by the traversing collaborator with [`push`](CallPath::push) on
/// the way in and [`pop`](CallPath::pop) on the way out.
#[derive(Clone, Debug, Default)]
pub struct CallPath {
    frames: Vec<NodeId>,
}

impl CallPath {
    /// Create an empty path.
    pub const fn new() -> Self {
        Self { frames: Vec::new() }
    }

    /// Enter a frame.
    pub fn push(&mut self, id: NodeId) {
        self.frames.push(id);
    }

    /// Leave the innermost frame.
    pub fn pop(&mut self) -> Option<NodeId> {
        self.frames.pop()
    }

    /// The frames, outermost first.
    pub fn frames(&self) -> &[NodeId] {
        &self.frames
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Check if no frame was entered yet.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl From<Vec<NodeId>> for CallPath {
    fn from(frames: Vec<NodeId>) -> Self {
        Self { frames }
    }
}

/// Outcome of looking a member up in a struct's key list, following the
/// base chain.
enum KeyLookup {
    Key,
    NotKey,
    NotMember,
}

impl TypeTree {
    /// Decide whether the member declaration at the end of `path` is a
    /// key in the context the path describes.
    ///
    /// The walk runs innermost to outermost. At every struct frame the
    /// member carried inward must appear in that struct's key list —
    /// looked up through the base chain, so an inherited key does not
    /// need re-registration — and the struct then becomes the carried
    /// member for its own enclosing frame. Any miss makes the result
    /// `false`; surviving every struct frame makes it `true`.
    ///
    /// Fails with [`TreeError::MalformedPath`] when the path is empty,
    /// does not end at a declaration, or contains a frame that is not
    /// owned or referenced by the frame above it.
    #[tracing::instrument(level = "trace", skip_all, fields(frames = path.len()))]
    pub fn declaration_is_key(&self, path: &CallPath) -> Result<bool, TreeError> {
        let frames = path.frames();
        let (&innermost, outer) = frames
            .split_last()
            .ok_or(TreeError::MalformedPath("empty path"))?;

        if self.node_ref(innermost)?.kind() != TypeFlags::DECLARATION {
            return Err(TreeError::MalformedPath(
                "path does not end at a member declaration",
            ));
        }

        let mut carried = innermost;
        for &frame in outer.iter().rev() {
            let node = self.node_ref(frame)?;
            match &node.data {
                NodeData::Struct { base, .. } => {
                    if carried == *base {
                        // Inheritance frame: the walk stepped from the
                        // derived struct into its base.
                        carried = frame;
                        continue;
                    }
                    match self.key_in_chain(frame, carried) {
                        KeyLookup::Key => carried = frame,
                        KeyLookup::NotKey => return Ok(false),
                        KeyLookup::NotMember => {
                            return Err(TreeError::MalformedPath(
                                "frame is not a member of its enclosing struct",
                            ));
                        }
                    }
                }
                NodeData::Declaration { decl_type }
                | NodeData::UnionCase { decl_type, .. } => {
                    if *decl_type != carried {
                        return Err(TreeError::MalformedPath(
                            "declaration frame does not carry the inner node",
                        ));
                    }
                    carried = frame;
                }
                NodeData::Module { members, .. } => {
                    if !members.contains(carried) {
                        return Err(TreeError::MalformedPath(
                            "frame is not a member of its enclosing module",
                        ));
                    }
                    carried = frame;
                }
                NodeData::Union { cases, .. } => {
                    if !cases.contains(carried) {
                        return Err(TreeError::MalformedPath(
                            "frame is not a case of its enclosing union",
                        ));
                    }
                    carried = frame;
                }
                NodeData::Forward { definition } => {
                    if *definition != carried {
                        return Err(TreeError::MalformedPath(
                            "forward frame does not resolve to the inner node",
                        ));
                    }
                    carried = frame;
                }
                NodeData::Sequence { element, .. } | NodeData::Array { element, .. } => {
                    if *element != carried {
                        return Err(TreeError::MalformedPath(
                            "frame does not contain the inner node",
                        ));
                    }
                    carried = frame;
                }
                NodeData::Map { key, value, .. } => {
                    if *key != carried && *value != carried {
                        return Err(TreeError::MalformedPath(
                            "frame does not contain the inner node",
                        ));
                    }
                    carried = frame;
                }
                NodeData::Basic | NodeData::String { .. } | NodeData::FixedPt { .. } => {
                    return Err(TreeError::MalformedPath("frame cannot enclose members"));
                }
            }
        }
        Ok(true)
    }

    /// Look `member` up in the key lists along the base chain of
    /// `struct_def`.
    ///
    /// A struct only registers its own members as keys, so the chain
    /// struct owning `member` is the one whose key list decides. A base
    /// chain that loops back on itself (possible through mutually
    /// resolved forward declarations) terminates as a non-key rather
    /// than recursing.
    fn key_in_chain(&self, struct_def: NodeId, member: NodeId) -> KeyLookup {
        let mut visited = FxHashSet::default();
        let mut current = struct_def;
        while current.is_some() && visited.insert(current) {
            let Some(NodeData::Struct {
                base,
                members,
                keys,
            }) = self.node(current).map(|n| &n.data)
            else {
                return KeyLookup::NotMember;
            };
            if members.contains(member) {
                return if keys.contains(&member) {
                    KeyLookup::Key
                } else {
                    KeyLookup::NotKey
                };
            }
            current = *base;
        }
        if current.is_some() {
            // Cycle in the base chain: conservatively not a key.
            return KeyLookup::NotKey;
        }
        KeyLookup::NotMember
    }
}

#[cfg(test)]
mod tests;
