//! alder_core: Core utilities for the alder compiler backend.
//!
//! Provides source positions, an insertion-ordered map, and string
//! interning used by the tree, binder, and code generation crates.

pub mod collections;
pub mod intern;
pub mod text;

// Re-export commonly used types
pub use collections::OrderedMap;
pub use intern::{InternedString, StringInterner};
pub use text::{LineAndColumn, LineMap, TextSpan};
