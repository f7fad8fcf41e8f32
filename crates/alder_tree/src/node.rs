//! Tree node definitions.

use std::fmt;

/// Identity of a node within one tree. Ids are assigned in creation order
/// starting at zero and double as the node's arena index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Structural kind of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// The single parentless node.
    Root,
    /// An interior node; the builder descends into it.
    Branch,
    /// A terminal; the builder never descends into it.
    Leaf,
}

/// A node in an ordered tree, carrying a payload of type `P`.
#[derive(Debug, Clone)]
pub struct TreeNode<P> {
    pub(crate) id: NodeId,
    pub(crate) name: String,
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) payload: P,
}

impl<P> TreeNode<P> {
    pub(crate) fn new(id: NodeId, name: String, kind: NodeKind, parent: Option<NodeId>, payload: P) -> Self {
        Self {
            id,
            name,
            kind,
            parent,
            children: Vec::new(),
            payload,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Display label: a non-terminal name or a literal lexeme.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in left-to-right order. Append-only during construction.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }

    pub fn payload_mut(&mut self) -> &mut P {
        &mut self.payload
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}
