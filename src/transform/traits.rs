//! Core types for the transform system

use crate::statement;
use crate::tokenizer::Value;

/// A parsed row: the statement prefix and its value tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Statement text before `VALUES (`, column list included.
    pub prefix: String,
    pub values: Vec<Value>,
}

impl Row {
    /// Serialize back into a full statement ending in `);`.
    pub fn to_statement(&self) -> String {
        statement::assemble(&self.prefix, &self.values)
    }
}

/// What a transform decided for one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Emit the original statement text untouched.
    PassThrough,
    /// Emit the rewritten row.
    Rewrite(Row),
    /// Emit nothing.
    Drop,
}

/// A row transform bound to one table.
///
/// Implementations must keep the target table and the terminator intact:
/// only the prefix's column list and the values may change.
pub trait TableTransform: Send + Sync {
    /// Unquoted name of the table this transform handles.
    fn table(&self) -> &'static str;

    fn apply(&self, row: Row) -> Outcome;
}
