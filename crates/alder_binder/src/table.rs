//! Per-scope symbol tables.

use alder_core::collections::OrderedMap;
use alder_core::text::TextSpan;
use alder_tree::Tree;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A tree of scopes, each node owning the table valid at that nesting level.
pub type ScopeTree = Tree<ScopeTable>;

/// Declared type of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Int,
    String,
    Boolean,
}

impl DataType {
    pub fn keyword(self) -> &'static str {
        match self {
            DataType::Int => "int",
            DataType::String => "string",
            DataType::Boolean => "boolean",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown type keyword '{0}'")]
pub struct ParseDataTypeError(pub String);

impl FromStr for DataType {
    type Err = ParseDataTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "int" => Ok(DataType::Int),
            "string" => Ok(DataType::String),
            "boolean" => Ok(DataType::Boolean),
            other => Err(ParseDataTypeError(other.to_string())),
        }
    }
}

/// What a scope knows about one declared identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeEntry {
    pub declared_type: DataType,
    /// Set when the identifier is read somewhere it is visible.
    pub used: bool,
    /// Set when the identifier is assigned.
    pub initialized: bool,
    /// Where the declaration appears.
    pub declared_at: Option<TextSpan>,
}

impl ScopeEntry {
    pub fn new(declared_type: DataType) -> Self {
        Self {
            declared_type,
            used: false,
            initialized: false,
            declared_at: None,
        }
    }

    pub fn declared_at(mut self, span: TextSpan) -> Self {
        self.declared_at = Some(span);
        self
    }
}

/// Flat symbol table for one scope. Keys are unique; the first declaration wins.
#[derive(Debug, Clone, Default)]
pub struct ScopeTable {
    entries: OrderedMap<String, ScopeEntry>,
}

impl ScopeTable {
    pub fn new() -> Self {
        Self {
            entries: OrderedMap::new(),
        }
    }

    /// Declare `name`. Returns `false`, leaving the table unchanged, if it
    /// is already declared here.
    pub fn put(&mut self, name: impl Into<String>, entry: ScopeEntry) -> bool {
        self.entries.try_insert(name.into(), entry).is_ok()
    }

    /// Look up `name` in this table only.
    pub fn get(&self, name: &str) -> Option<&ScopeEntry> {
        self.entries.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut ScopeEntry> {
        self.entries.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ScopeEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_rejects_redeclaration() {
        let mut table = ScopeTable::new();
        assert!(table.put("a", ScopeEntry::new(DataType::Int)));
        assert!(!table.put("a", ScopeEntry::new(DataType::String)));
        assert_eq!(table.get("a").map(|e| e.declared_type), Some(DataType::Int));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_get_is_local_only() {
        let table = ScopeTable::new();
        assert!(table.get("a").is_none());
        assert!(table.is_empty());
    }

    #[test]
    fn test_iter_in_declaration_order() {
        let mut table = ScopeTable::new();
        table.put("z", ScopeEntry::new(DataType::Boolean));
        table.put("a", ScopeEntry::new(DataType::Int));
        table.put("m", ScopeEntry::new(DataType::String));
        let names: Vec<&str> = table.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_data_type_keywords() {
        assert_eq!("boolean".parse::<DataType>(), Ok(DataType::Boolean));
        assert_eq!(DataType::String.to_string(), "string");
        assert!("float".parse::<DataType>().is_err());
    }
}
