//! alder_options: compiler configuration.
//!
//! Options are read from a JSON file such as:
//!
//! ```json
//! { "memoryCapacity": 256, "warnUnused": true, "warnShadowing": false }
//! ```
//!
//! Every field is optional; accessors resolve the defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Capacity of the reference target image, in byte-cells.
pub const DEFAULT_MEMORY_CAPACITY: usize = 256;
const MAX_MEMORY_CAPACITY: usize = 1 << 16;

#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("failed to read options file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid options JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("memoryCapacity must be between 1 and 65536, got {0}")]
    InvalidMemoryCapacity(usize),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompilerOptions {
    // -- Target --
    pub memory_capacity: Option<usize>,

    // -- Additional Checks --
    pub warn_unused: Option<bool>,
    pub warn_uninitialized: Option<bool>,
    pub warn_shadowing: Option<bool>,
}

impl CompilerOptions {
    pub fn memory_capacity(&self) -> usize {
        self.memory_capacity.unwrap_or(DEFAULT_MEMORY_CAPACITY)
    }

    pub fn warn_unused(&self) -> bool {
        self.warn_unused.unwrap_or(true)
    }

    pub fn warn_uninitialized(&self) -> bool {
        self.warn_uninitialized.unwrap_or(true)
    }

    pub fn warn_shadowing(&self) -> bool {
        self.warn_shadowing.unwrap_or(false)
    }

    pub fn validate(&self) -> Result<(), OptionsError> {
        let capacity = self.memory_capacity();
        if capacity == 0 || capacity > MAX_MEMORY_CAPACITY {
            return Err(OptionsError::InvalidMemoryCapacity(capacity));
        }
        Ok(())
    }
}

/// Parse and validate options from a JSON string.
pub fn parse_options(content: &str) -> Result<CompilerOptions, OptionsError> {
    let options: CompilerOptions = serde_json::from_str(content)?;
    options.validate()?;
    Ok(options)
}

/// Parse and validate options from a JSON file.
pub fn parse_options_file(path: impl AsRef<Path>) -> Result<CompilerOptions, OptionsError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| OptionsError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_options(&content)
}
