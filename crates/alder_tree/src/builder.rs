//! Cursor-based incremental tree construction.

use crate::error::TreeError;
use crate::node::{NodeId, NodeKind, TreeNode};
use crate::tree::Tree;

/// Builds a [`Tree`] one node at a time.
///
/// The cursor is the node new children attach to. Adding a branch descends
/// into it; adding a leaf leaves the cursor where it is; [`climb_one_level`]
/// ascends. Each builder produces exactly one tree.
///
/// [`climb_one_level`]: OrderedTreeBuilder::climb_one_level
#[derive(Debug, Clone)]
pub struct OrderedTreeBuilder<P> {
    tree: Tree<P>,
    cursor: Option<NodeId>,
}

impl<P> OrderedTreeBuilder<P> {
    pub fn new() -> Self {
        Self {
            tree: Tree::new(),
            cursor: None,
        }
    }

    /// Add a node under the cursor and return the cursor afterwards.
    ///
    /// The first node becomes the root (recorded with kind `Root`) whatever
    /// branch-like kind it was requested with; a leaf is rejected as root.
    pub fn add_node(&mut self, name: impl Into<String>, kind: NodeKind, payload: P) -> Result<NodeId, TreeError> {
        let name = name.into();
        let id = NodeId(self.tree.nodes.len() as u32);

        let Some(parent) = self.cursor else {
            if kind == NodeKind::Leaf {
                return Err(TreeError::LeafRoot { name });
            }
            tracing::trace!(id = id.0, name = %name, "added root node");
            self.tree.nodes.push(TreeNode::new(id, name, NodeKind::Root, None, payload));
            self.tree.root = Some(id);
            self.cursor = Some(id);
            return Ok(id);
        };

        if kind == NodeKind::Root {
            return Err(TreeError::DuplicateRoot {
                root: self.tree.root.unwrap_or(parent),
                name,
            });
        }

        tracing::trace!(id = id.0, parent = parent.0, name = %name, ?kind, "added node");
        self.tree.nodes.push(TreeNode::new(id, name, kind, Some(parent), payload));
        self.tree.nodes[parent.index()].children.push(id);

        let cursor = if kind == NodeKind::Branch { id } else { parent };
        self.cursor = Some(cursor);
        Ok(cursor)
    }

    /// Move the cursor to its parent and return the new cursor.
    pub fn climb_one_level(&mut self) -> Result<NodeId, TreeError> {
        let cursor = self.cursor.ok_or(TreeError::EmptyTree)?;
        match self.tree.parent(cursor) {
            Some(parent) => {
                tracing::trace!(from = cursor.0, to = parent.0, "climbed one level");
                self.cursor = Some(parent);
                Ok(parent)
            }
            None => Err(TreeError::ClimbPastRoot { root: cursor }),
        }
    }

    pub fn cursor(&self) -> Option<NodeId> {
        self.cursor
    }

    /// Whether every descent has been matched by a climb.
    pub fn is_balanced(&self) -> bool {
        self.cursor == self.tree.root
    }

    /// The tree built so far.
    pub fn tree(&self) -> &Tree<P> {
        &self.tree
    }

    /// Mutable access for payload updates. Structure can only change
    /// through `add_node`.
    pub fn tree_mut(&mut self) -> &mut Tree<P> {
        &mut self.tree
    }

    /// The payload of the node under the cursor.
    pub fn cursor_payload_mut(&mut self) -> Option<&mut P> {
        let cursor = self.cursor?;
        self.tree.payload_mut(cursor)
    }

    /// Finish construction and hand over the tree.
    ///
    /// Every descent must have been matched by a climb; finishing with the
    /// cursor below the root is [`TreeError::Unbalanced`].
    pub fn finish(self) -> Result<Tree<P>, TreeError> {
        let (Some(root), Some(cursor)) = (self.tree.root, self.cursor) else {
            return Err(TreeError::EmptyTree);
        };
        if cursor != root {
            return Err(TreeError::Unbalanced { cursor, root });
        }
        Ok(self.tree)
    }
}

impl<P> Default for OrderedTreeBuilder<P> {
    fn default() -> Self {
        Self::new()
    }
}
