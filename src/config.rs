//! Rewriter configuration.
//!
//! The table selector is fixed for the lifetime of a [`crate::Rewriter`]:
//! it is read once here and handed over at construction.
//!
//! ```toml
//! table = "members"
//! echo = true
//! color = false
//! ```

use serde::Deserialize;
use std::path::Path;

use crate::error::{RewriteError, RewriteResult};

/// Table selector used when none is given. No transform is registered for it.
pub const UNKNOWN_TABLE: &str = "unknown";

/// Settings for one rewrite run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RewriterConfig {
    /// Table whose transform runs. Statements for other tables pass through.
    pub table: String,
    /// Echo `Original:` / `Processed:` lines to the diagnostic stream.
    pub echo: bool,
    /// Color the echo labels.
    pub color: bool,
}

impl Default for RewriterConfig {
    fn default() -> Self {
        Self {
            table: UNKNOWN_TABLE.to_string(),
            echo: true,
            color: false,
        }
    }
}

impl RewriterConfig {
    /// Default settings targeting `table`.
    pub fn for_table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    /// Parse settings from TOML. Missing keys keep their defaults.
    pub fn from_toml_str(input: &str) -> RewriteResult<Self> {
        toml::from_str(input).map_err(|e| RewriteError::Config(e.to_string()))
    }

    /// Read settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> RewriteResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
