//! alder_binder: Scope tables and name resolution.
//!
//! Each node of the scope tree owns a [`ScopeTable`]. The
//! [`ScopeResolver`] walks from a scope to the root to resolve a name, and
//! the [`ScopeAnalyzer`] drives scope-tree construction while recording
//! declaration and use diagnostics.

mod analyzer;
mod resolver;
mod table;

pub use analyzer::{AnalyzerOptions, ScopeAnalyzer};
pub use resolver::{Resolution, Resolved, ScopeResolver};
pub use table::{DataType, ParseDataTypeError, ScopeEntry, ScopeTable, ScopeTree};
