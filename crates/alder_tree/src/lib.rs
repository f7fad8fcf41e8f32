//! alder_tree: Ordered, cursor-constructed trees.
//!
//! One engine builds every tree the compiler produces: the concrete syntax
//! tree, the abstract syntax tree, and the scope tree. Nodes live in an
//! arena indexed by [`NodeId`]; children are owned by index and parents are
//! plain back-references.

mod builder;
mod error;
mod node;
pub mod syntax;
mod tree;

pub use builder::OrderedTreeBuilder;
pub use error::TreeError;
pub use node::{NodeId, NodeKind, TreeNode};
pub use syntax::{NodeFlags, SyntaxPayload, SyntaxTree, TokenRef};
pub use tree::{Ancestors, Role, Tree, Visit};
