//! # insert-rewrite
//!
//! Rewrites `INSERT OR REPLACE` statements from a SQLite dump before they
//! are replayed elsewhere, applying a cleanup rule for one table per run.
//!
//! ## Quick Example
//!
//! ```
//! let input = "INSERT OR REPLACE INTO \"members\" (\"id\", \"package_id\", \"card_id\", \"government_id\", \"created_at\", \"updated_at\", \"year_of_birth\", \"first_name\", \"last_name\") VALUES (1, 2, 'C1', NULL, '2020', '2020', 1990, 'Ann', 'Lee');\n";
//!
//! let output = insert_rewrite::rewrite("members", input).unwrap();
//! assert!(output.contains("VALUES (1, 2, 'C1', 'MISSING', '2020', '2020', 1990, 'Ann', 'Lee');"));
//! ```
//!
//! ## Tables
//!
//! | Table      | Rule                                                        |
//! |------------|-------------------------------------------------------------|
//! | `packages` | adds `price` from a `**N**` marker in the description       |
//! | `members`  | drops nameless rows, `NULL` identity fields → `'MISSING'`   |
//! | others     | pass through                                                |

pub mod config;
pub mod error;
pub mod rewriter;
pub mod statement;
pub mod tokenizer;
pub mod transform;

pub use config::RewriterConfig;
pub use rewriter::Rewriter;

pub mod prelude {
    pub use crate::config::{RewriterConfig, UNKNOWN_TABLE};
    pub use crate::error::*;
    pub use crate::rewriter::{Processed, Rewriter, RunStats, StatementAccumulator};
    pub use crate::statement::InsertStatement;
    pub use crate::tokenizer::{tokenize, Value};
    pub use crate::transform::{Outcome, Row, TableTransform, TransformRegistry};
}

/// Rewrite a whole dump held in memory for `table`, without echo lines.
///
/// # Example
///
/// ```
/// let out = insert_rewrite::rewrite("unknown", "SELECT 1);\n").unwrap();
/// assert_eq!(out, "SELECT 1);\n");
/// ```
pub fn rewrite(table: &str, input: &str) -> error::RewriteResult<String> {
    let config = RewriterConfig {
        echo: false,
        ..RewriterConfig::for_table(table)
    };
    let mut output = Vec::new();
    Rewriter::new(config).run(input.as_bytes(), &mut output, &mut std::io::sink())?;
    Ok(String::from_utf8_lossy(&output).into_owned())
}
