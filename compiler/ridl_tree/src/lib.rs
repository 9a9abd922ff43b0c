//! Type-tree model for the ridl IDL front end.
//!
//! The parser builds every declarable construct of a compilation unit —
//! modules, structs, unions, forward declarations, template types,
//! declarations and literal values — as nodes of one owned tree, then
//! generators traverse it read-only. This crate is that tree:
//!
//! - [`TypeTree`]: the arena owning every node, plus the construction and
//!   mutation API the parser drives.
//! - [`Node`]/[`NodeData`]: the closed set of node kinds, with
//!   [`TypeFlags`] queries for collaborators that reason in kind sets.
//! - Forward declarations resolve against later definitions as a side
//!   effect of module insertion.
//! - [`TypeTree::declaration_is_key`] decides key membership for a
//!   member reached through a [`CallPath`].
//!
//! Ownership is single-owner and enforced per call: a node is attached to
//! at most one container, failed operations never leave partial links,
//! and only unattached roots can be destroyed.

mod child_list;
mod error;
mod flags;
mod format;
mod key;
mod literal;
mod name;
mod node;
mod node_id;
mod tree;

pub use child_list::ChildList;
pub use error::TreeError;
pub use flags::TypeFlags;
pub use key::CallPath;
pub use literal::Literal;
pub use name::{Name, NameInterner};
pub use node::{Node, NodeData};
pub use node_id::NodeId;
pub use tree::TypeTree;

// Size assertions to prevent accidental regressions. Handles are passed
// by value everywhere.
const _: () = assert!(std::mem::size_of::<NodeId>() == 4);
const _: () = assert!(std::mem::size_of::<Name>() == 4);
const _: () = assert!(std::mem::size_of::<TypeFlags>() == 8);
