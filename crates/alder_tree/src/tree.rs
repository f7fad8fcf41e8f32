//! The completed (or in-progress) tree and its read operations.

use crate::node::{NodeId, TreeNode};

/// Where a node sits relative to its parent, as seen by linearization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Root,
    FirstChild,
    LaterSibling,
}

/// One entry of a pre-order linearization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visit {
    pub id: NodeId,
    /// Distance from the root (the root is at depth 0).
    pub depth: usize,
    pub role: Role,
}

/// An arena of nodes with a single root.
#[derive(Debug, Clone)]
pub struct Tree<P> {
    pub(crate) nodes: Vec<TreeNode<P>>,
    pub(crate) root: Option<NodeId>,
}

impl<P> Tree<P> {
    pub(crate) fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
        }
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn get(&self, id: NodeId) -> Option<&TreeNode<P>> {
        self.nodes.get(id.index())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut TreeNode<P>> {
        self.nodes.get_mut(id.index())
    }

    pub fn payload(&self, id: NodeId) -> Option<&P> {
        self.get(id).map(TreeNode::payload)
    }

    pub fn payload_mut(&mut self, id: NodeId) -> Option<&mut P> {
        self.get_mut(id).map(TreeNode::payload_mut)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(TreeNode::parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(TreeNode::children).unwrap_or(&[])
    }

    /// Walks from `id` up to the root, yielding `id` first.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_, P> {
        Ancestors {
            tree: self,
            next: self.get(id).map(TreeNode::id),
        }
    }

    /// Number of edges between `id` and the root.
    pub fn depth(&self, id: NodeId) -> Option<usize> {
        self.get(id)?;
        Some(self.ancestors(id).count() - 1)
    }

    /// All nodes in creation (id) order.
    pub fn nodes(&self) -> impl Iterator<Item = &TreeNode<P>> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Pre-order linearization with each node tagged by its role.
    ///
    /// Uses an explicit stack; children are pushed right-to-left so the
    /// leftmost child pops first. Pure: repeated calls yield the same order.
    pub fn linearize(&self) -> Vec<Visit> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let Some(root) = self.root else {
            return order;
        };

        let mut stack = vec![Visit {
            id: root,
            depth: 0,
            role: Role::Root,
        }];
        while let Some(visit) = stack.pop() {
            for (pos, &child) in self.children(visit.id).iter().enumerate().rev() {
                stack.push(Visit {
                    id: child,
                    depth: visit.depth + 1,
                    role: if pos == 0 {
                        Role::FirstChild
                    } else {
                        Role::LaterSibling
                    },
                });
            }
            order.push(visit);
        }
        order
    }
}

/// Iterator over a node and its ancestors, innermost first.
pub struct Ancestors<'t, P> {
    tree: &'t Tree<P>,
    next: Option<NodeId>,
}

impl<P> Iterator for Ancestors<'_, P> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}
