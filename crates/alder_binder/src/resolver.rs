//! Scope-chain name resolution.

use crate::table::{DataType, ScopeEntry, ScopeTree};
use alder_tree::NodeId;

/// A successful lookup: the scope whose table declares the name, and the entry.
#[derive(Debug, Clone, Copy)]
pub struct Resolution<'t> {
    pub scope: NodeId,
    pub entry: &'t ScopeEntry,
}

/// Snapshot returned by resolutions that mutate the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    pub scope: NodeId,
    pub declared_type: DataType,
    pub initialized: bool,
}

/// Resolves identifiers against a (possibly partially built) scope tree.
///
/// Lookup starts in the given scope and climbs parent links until a table
/// declares the name; the nearest declaration wins.
#[derive(Debug, Clone, Copy)]
pub struct ScopeResolver<'t> {
    tree: &'t ScopeTree,
}

impl<'t> ScopeResolver<'t> {
    pub fn new(tree: &'t ScopeTree) -> Self {
        Self { tree }
    }

    pub fn resolve(&self, scope: NodeId, name: &str) -> Option<Resolution<'t>> {
        let tree = self.tree;
        tree.ancestors(scope).find_map(|id| {
            let entry = tree.payload(id)?.get(name)?;
            Some(Resolution { scope: id, entry })
        })
    }

    /// Resolve starting one level above `scope`, i.e. what a new declaration
    /// in `scope` would shadow.
    pub fn resolve_outer(&self, scope: NodeId, name: &str) -> Option<Resolution<'t>> {
        let parent = self.tree.parent(scope)?;
        self.resolve(parent, name)
    }

    pub fn is_declared(&self, scope: NodeId, name: &str) -> bool {
        self.resolve(scope, name).is_some()
    }

    /// Resolve a use occurrence of `name`, flagging the entry as used in the
    /// table that declares it.
    pub fn resolve_use(tree: &mut ScopeTree, scope: NodeId, name: &str) -> Option<Resolved> {
        Self::update(tree, scope, name, |entry| entry.used = true)
    }

    /// Resolve an assignment target, flagging the entry as initialized.
    pub fn resolve_assignment(tree: &mut ScopeTree, scope: NodeId, name: &str) -> Option<Resolved> {
        Self::update(tree, scope, name, |entry| entry.initialized = true)
    }

    fn update(
        tree: &mut ScopeTree,
        scope: NodeId,
        name: &str,
        apply: impl FnOnce(&mut ScopeEntry),
    ) -> Option<Resolved> {
        let owner = ScopeResolver::new(tree).resolve(scope, name)?.scope;
        let entry = tree.payload_mut(owner)?.get_mut(name)?;
        // Snapshot before applying so callers see the prior initialization state.
        let resolved = Resolved {
            scope: owner,
            declared_type: entry.declared_type,
            initialized: entry.initialized,
        };
        apply(entry);
        Some(resolved)
    }
}
