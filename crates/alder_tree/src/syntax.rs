//! Payload carried by concrete and abstract syntax tree nodes.

use crate::builder::OrderedTreeBuilder;
use crate::error::TreeError;
use crate::node::{NodeId, NodeKind};
use crate::tree::Tree;
use alder_core::text::TextSpan;

bitflags::bitflags! {
    /// Diagnostic markers attached to syntax nodes by later passes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NodeFlags: u8 {
        const NONE        = 0;
        const HAS_ERROR   = 1 << 0;
        const HAS_WARNING = 1 << 1;
    }
}

/// Reference to the source token a leaf was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRef {
    pub lexeme: String,
    pub span: TextSpan,
    /// 1-based source line.
    pub line: u32,
}

impl TokenRef {
    pub fn new(lexeme: impl Into<String>, span: TextSpan, line: u32) -> Self {
        Self {
            lexeme: lexeme.into(),
            span,
            line,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyntaxPayload {
    pub token: Option<TokenRef>,
    pub flags: NodeFlags,
}

impl SyntaxPayload {
    pub fn token(token: TokenRef) -> Self {
        Self {
            token: Some(token),
            flags: NodeFlags::NONE,
        }
    }
}

pub type SyntaxTree = Tree<SyntaxPayload>;

impl OrderedTreeBuilder<SyntaxPayload> {
    /// Add a non-terminal and descend into it.
    pub fn add_branch(&mut self, name: impl Into<String>) -> Result<NodeId, TreeError> {
        self.add_node(name, NodeKind::Branch, SyntaxPayload::default())
    }

    /// Add a terminal labelled with its lexeme.
    pub fn add_token(&mut self, token: TokenRef) -> Result<NodeId, TreeError> {
        let name = token.lexeme.clone();
        self.add_node(name, NodeKind::Leaf, SyntaxPayload::token(token))
    }
}

impl Tree<SyntaxPayload> {
    /// Mark a node, e.g. when a later pass reports a diagnostic against it.
    pub fn flag(&mut self, id: NodeId, flags: NodeFlags) -> bool {
        match self.payload_mut(id) {
            Some(payload) => {
                payload.flags |= flags;
                true
            }
            None => false,
        }
    }

    /// The tokens under the tree's leaves, in source order.
    pub fn tokens(&self) -> Vec<&TokenRef> {
        self.linearize()
            .iter()
            .filter_map(|visit| self.payload(visit.id)?.token.as_ref())
            .collect()
    }
}
