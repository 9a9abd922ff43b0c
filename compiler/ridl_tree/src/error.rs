//! Tree construction and traversal errors.

use thiserror::Error;

/// Error returned by the fallible type-tree operations.
///
/// Every operation is atomic: on any of these errors the tree is exactly
/// as it was before the call.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum TreeError {
    /// A required argument is missing or invalid for the target kind: a
    /// dangling handle, an empty name, flags that do not name the
    /// expected kind, or a zero bound where a positive one is required.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The node passed for attachment is already owned by another
    /// container or slot. The existing attachment is untouched.
    #[error("node is already owned by another container")]
    AlreadyOwned,

    /// The member is already registered in the struct's key list.
    #[error("member is already registered as a key")]
    DuplicateKey,

    /// Destruction was requested for a node that still has an owner.
    #[error("node is still attached to a parent")]
    StillAttached,

    /// A key-determination call path is empty or structurally
    /// inconsistent with the tree.
    #[error("malformed call path: {0}")]
    MalformedPath(&'static str),
}
