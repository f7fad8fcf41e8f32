//! Errors raised when the builder protocol is broken.

use crate::node::NodeId;
use thiserror::Error;

/// A misuse of [`OrderedTreeBuilder`](crate::OrderedTreeBuilder).
///
/// These are bugs in the pass driving the builder. They are reported rather
/// than ignored because continuing would attach nodes to the wrong parent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("cannot climb above the root node {root}: more ascents than descents")]
    ClimbPastRoot { root: NodeId },

    #[error("tree finished with {cursor} still open under root {root}: more descents than ascents")]
    Unbalanced { cursor: NodeId, root: NodeId },

    #[error("the outermost node {root} is already closed")]
    RootClosed { root: NodeId },

    #[error("the tree has no root node")]
    EmptyTree,

    #[error("leaf node '{name}' cannot be the root of a tree")]
    LeafRoot { name: String },

    #[error("tree already has root {root}; cannot add a second root '{name}'")]
    DuplicateRoot { root: NodeId, name: String },
}
