//! The scope analyzer.
//!
//! Builds the scope tree while a semantic pass walks the program:
//! - Scope management (open/close, mirrored onto the tree builder cursor)
//! - Declarations with redeclaration and shadowing diagnostics
//! - Use and assignment resolution via the scope chain
//! - The final unused / uninitialized variable pass

use crate::resolver::ScopeResolver;
use crate::table::{DataType, ScopeEntry, ScopeTable, ScopeTree};
use alder_core::text::TextSpan;
use alder_diagnostics::{messages, Diagnostic, DiagnosticCollection};
use alder_tree::{NodeId, NodeKind, OrderedTreeBuilder, TreeError};

/// Which optional diagnostics the analyzer reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyzerOptions {
    pub warn_unused: bool,
    pub warn_uninitialized: bool,
    pub warn_shadowing: bool,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            warn_unused: true,
            warn_uninitialized: true,
            warn_shadowing: false,
        }
    }
}

/// Drives construction of one program's scope tree.
pub struct ScopeAnalyzer {
    builder: OrderedTreeBuilder<ScopeTable>,
    options: AnalyzerOptions,
    diagnostics: DiagnosticCollection,
    /// The outermost scope has been closed; the program is complete.
    root_closed: bool,
}

impl ScopeAnalyzer {
    pub fn new(options: AnalyzerOptions) -> Self {
        Self {
            builder: OrderedTreeBuilder::new(),
            options,
            diagnostics: DiagnosticCollection::new(),
            root_closed: false,
        }
    }

    /// The scope new declarations go into.
    pub fn current_scope(&self) -> Option<NodeId> {
        if self.root_closed {
            return None;
        }
        self.builder.cursor()
    }

    /// The scope new declarations go into, or why there is none.
    fn open_scope_id(&self) -> Result<NodeId, TreeError> {
        let cursor = self.builder.cursor().ok_or(TreeError::EmptyTree)?;
        if self.root_closed {
            return Err(TreeError::RootClosed { root: cursor });
        }
        Ok(cursor)
    }

    /// The scope tree built so far.
    pub fn tree(&self) -> &ScopeTree {
        self.builder.tree()
    }

    pub fn diagnostics(&self) -> &DiagnosticCollection {
        &self.diagnostics
    }

    /// Open a scope nested in the current one (or the program scope).
    pub fn open_scope(&mut self) -> Result<NodeId, TreeError> {
        // Reopening after the program scope closed would be a second root.
        let kind = if self.root_closed || self.builder.cursor().is_none() {
            NodeKind::Root
        } else {
            NodeKind::Branch
        };
        let name = format!("scope {}", self.builder.tree().len());
        let scope = self.builder.add_node(name, kind, ScopeTable::new())?;
        tracing::debug!(scope = scope.0, "opened scope");
        Ok(scope)
    }

    /// Close the current scope.
    pub fn close_scope(&mut self) -> Result<(), TreeError> {
        let cursor = self.builder.cursor().ok_or(TreeError::EmptyTree)?;
        if self.builder.tree().parent(cursor).is_some() {
            self.builder.climb_one_level()?;
        } else if self.root_closed {
            return Err(TreeError::ClimbPastRoot { root: cursor });
        } else {
            self.root_closed = true;
        }
        tracing::debug!(scope = cursor.0, "closed scope");
        Ok(())
    }

    /// Declare `name` in the current scope. Returns `false` on redeclaration.
    pub fn declare(&mut self, name: &str, declared_type: DataType, span: Option<TextSpan>) -> Result<bool, TreeError> {
        let scope = self.open_scope_id()?;
        let shadowed = ScopeResolver::new(self.builder.tree())
            .resolve_outer(scope, name)
            .map(|found| found.entry.declared_at);

        let mut entry = ScopeEntry::new(declared_type);
        entry.declared_at = span;
        let table = self
            .builder
            .cursor_payload_mut()
            .ok_or(TreeError::EmptyTree)?;
        if !table.put(name, entry) {
            let first = table.get(name).and_then(|e| e.declared_at);
            let mut diagnostic =
                Diagnostic::at(span, &messages::IDENTIFIER_0_IS_ALREADY_DECLARED_IN_THIS_SCOPE, &[name]);
            if first.is_some() {
                diagnostic = diagnostic.with_related(Diagnostic::at(first, &messages::_0_WAS_FIRST_DECLARED_HERE, &[name]));
            }
            self.diagnostics.add(diagnostic);
            tracing::debug!(scope = scope.0, name, "redeclaration rejected");
            return Ok(false);
        }

        match shadowed {
            Some(outer) if self.options.warn_shadowing => {
                let mut diagnostic =
                    Diagnostic::at(span, &messages::DECLARATION_OF_0_SHADOWS_AN_OUTER_DECLARATION, &[name]);
                if outer.is_some() {
                    diagnostic = diagnostic.with_related(Diagnostic::at(outer, &messages::_0_WAS_FIRST_DECLARED_HERE, &[name]));
                }
                self.diagnostics.add(diagnostic);
            }
            _ => {}
        }
        tracing::debug!(scope = scope.0, name, ty = %declared_type, "declared");
        Ok(true)
    }

    /// Resolve a read of `name`. Returns its type, or `None` if undeclared.
    pub fn use_name(&mut self, name: &str, span: Option<TextSpan>) -> Result<Option<DataType>, TreeError> {
        let scope = self.open_scope_id()?;
        match ScopeResolver::resolve_use(self.builder.tree_mut(), scope, name) {
            Some(resolved) => {
                if !resolved.initialized && self.options.warn_uninitialized {
                    self.diagnostics
                        .add(Diagnostic::at(span, &messages::_0_IS_USED_BEFORE_BEING_ASSIGNED, &[name]));
                }
                tracing::trace!(scope = scope.0, name, found_in = resolved.scope.0, "resolved use");
                Ok(Some(resolved.declared_type))
            }
            None => {
                self.diagnostics.add(Diagnostic::at(span, &messages::CANNOT_FIND_NAME_0, &[name]));
                Ok(None)
            }
        }
    }

    /// Resolve an assignment to `name`. Returns its type, or `None` if undeclared.
    pub fn assign(&mut self, name: &str, span: Option<TextSpan>) -> Result<Option<DataType>, TreeError> {
        let scope = self.open_scope_id()?;
        match ScopeResolver::resolve_assignment(self.builder.tree_mut(), scope, name) {
            Some(resolved) => Ok(Some(resolved.declared_type)),
            None => {
                self.diagnostics.add(Diagnostic::at(span, &messages::CANNOT_FIND_NAME_0, &[name]));
                Ok(None)
            }
        }
    }

    /// Complete the tree and run the usage pass over every scope.
    ///
    /// Every opened scope, the program scope included, must have been closed.
    pub fn finish(mut self) -> Result<(ScopeTree, DiagnosticCollection), TreeError> {
        if !self.root_closed {
            let cursor = self.builder.cursor().ok_or(TreeError::EmptyTree)?;
            let root = self.builder.tree().root().unwrap_or(cursor);
            return Err(TreeError::Unbalanced { cursor, root });
        }
        let tree = self.builder.finish()?;
        for visit in tree.linearize() {
            let Some(table) = tree.payload(visit.id) else {
                continue;
            };
            for (name, entry) in table.iter() {
                if !entry.initialized && self.options.warn_uninitialized {
                    self.diagnostics.add(Diagnostic::at(
                        entry.declared_at,
                        &messages::_0_IS_DECLARED_BUT_NEVER_INITIALIZED,
                        &[name],
                    ));
                }
                if !entry.used && self.options.warn_unused {
                    self.diagnostics.add(Diagnostic::at(
                        entry.declared_at,
                        &messages::_0_IS_DECLARED_BUT_NEVER_USED,
                        &[name],
                    ));
                }
            }
        }
        self.diagnostics.sort();
        tracing::debug!(
            scopes = tree.len(),
            errors = self.diagnostics.error_count(),
            warnings = self.diagnostics.warning_count(),
            "scope analysis finished"
        );
        Ok((tree, self.diagnostics))
    }
}

impl Default for ScopeAnalyzer {
    fn default() -> Self {
        Self::new(AnalyzerOptions::default())
    }
}
