//! Statement splitting.
//!
//! ```text
//! INSERT OR REPLACE INTO "members" ("id", "name") VALUES (1, 'Ann');
//! ──────────────────────┬─────────┬─────────────  ───────  ───┬───  ─┬
//!                       │         │                           │      └── terminator
//!                       │         └── prefix (up to VALUES)   └── values
//!                       └── table
//! ```

use nom::{
    bytes::complete::{is_not, tag},
    character::complete::{char, multispace1},
    sequence::{delimited, tuple},
    IResult,
};

use crate::tokenizer::{self, Value};

/// Marks the end of a statement.
pub const TERMINATOR: &str = ");";

/// Opens the value list.
pub const VALUES_OPEN: &str = "VALUES (";

/// A single-row `INSERT OR REPLACE` split into its parts. Borrows the
/// statement text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertStatement<'a> {
    /// Target table, without quotes.
    pub table: &'a str,
    /// Everything before `VALUES (`, column list included.
    pub prefix: &'a str,
    /// Raw value list between `VALUES (` and the trailing `);`.
    pub values: &'a str,
}

impl<'a> InsertStatement<'a> {
    /// Split `text`, or `None` when it is not an
    /// `INSERT OR REPLACE INTO "table" ... VALUES (...);` statement.
    ///
    /// The insert may follow unterminated lines such as `BEGIN TRANSACTION;`,
    /// which then stay in the prefix. Only the first `VALUES (` after the
    /// insert counts, and the text must end with `);`.
    pub fn parse(text: &'a str) -> Option<Self> {
        let (head, table) = text.match_indices("INSERT").find_map(|(at, _)| {
            let (rest, table) = insert_head(&text[at..]).ok()?;
            Some((text.len() - rest.len(), table))
        })?;
        let open = head + text[head..].find(VALUES_OPEN)?;
        let body = &text[open + VALUES_OPEN.len()..];
        let values = body.strip_suffix(TERMINATOR)?;

        Some(Self {
            table,
            prefix: &text[..open],
            values,
        })
    }
}

/// Rebuild a statement from a prefix and its values.
pub fn assemble(prefix: &str, values: &[Value]) -> String {
    format!(
        "{}{}{}{}",
        prefix,
        VALUES_OPEN,
        tokenizer::join(values),
        TERMINATOR
    )
}

/// `INSERT OR REPLACE INTO "table"`, returning the table name.
fn insert_head(input: &str) -> IResult<&str, &str> {
    let (input, _) = tuple((
        tag("INSERT"),
        multispace1,
        tag("OR"),
        multispace1,
        tag("REPLACE"),
        multispace1,
        tag("INTO"),
        multispace1,
    ))(input)?;
    delimited(char('"'), is_not("\""), char('"'))(input)
}
