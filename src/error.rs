//! Error types for insert-rewrite.

use thiserror::Error;

/// The main error type for rewrite operations.
///
/// Row content never produces a fatal error: [`RewriteError::Parse`] is
/// caught by the rewriter and turned into a pass-through. Only I/O and
/// configuration failures reach the caller of [`crate::Rewriter::run`].
#[derive(Debug, Error)]
pub enum RewriteError {
    /// Failed to parse a statement or its value list.
    #[error("Parse error at position {position}: {message}")]
    Parse { position: usize, message: String },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RewriteError {
    /// Create a parse error at the given byte offset.
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }
}

/// Result type alias for rewrite operations.
pub type RewriteResult<T> = Result<T, RewriteError>;
