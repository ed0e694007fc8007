//! Value list tokenizer using nom.
//!
//! Splits the text between `VALUES (` and `);` into [`Value`] tokens.
//!
//! ```text
//! 1, 'Gold', 'Includes **50**, more', coalesce(2, 3), X'00ff'
//! ┬  ───┬──  ───────────┬──────────  ───────┬───────  ───┬───
//! │     │               │                   │            └── Bare (blob)
//! │     │               │                   └── Bare (call, commas kept)
//! │     │               └── Quoted (commas kept)
//! │     └── Quoted
//! └── Bare
//! ```
//!
//! Inside a literal, `''` is an escaped quote. Nested parentheses are
//! balanced. This is not a SQL grammar: anything else outside quotes is
//! taken verbatim up to the next top-level comma.

use std::borrow::Cow;
use std::fmt;

use nom::{
    branch::alt,
    bytes::complete::{is_not, tag},
    character::complete::char,
    combinator::{all_consuming, recognize},
    multi::{many0, separated_list0},
    sequence::tuple,
    IResult,
};

use crate::error::{RewriteError, RewriteResult};

/// One field of a value list.
///
/// Both variants keep the exact source text (trimmed), so writing a token
/// back out reproduces the input byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A single-quoted string literal, quotes included.
    Quoted(String),
    /// Anything else: numbers, `NULL`, blobs, expressions.
    Bare(String),
}

impl Value {
    /// The `NULL` keyword.
    pub fn null() -> Self {
        Value::Bare("NULL".to_string())
    }

    /// An unquoted scalar, written as-is.
    pub fn bare(text: impl Into<String>) -> Self {
        Value::Bare(text.into())
    }

    /// A string literal holding `content`, with embedded quotes escaped.
    pub fn quoted(content: &str) -> Self {
        Value::Quoted(format!("'{}'", content.replace('\'', "''")))
    }

    /// Source text of the token.
    pub fn as_str(&self) -> &str {
        match self {
            Value::Quoted(s) | Value::Bare(s) => s,
        }
    }

    /// Literal content with quotes stripped and `''` unescaped.
    /// Bare tokens are returned unchanged.
    pub fn content(&self) -> Cow<'_, str> {
        match self {
            Value::Quoted(s) => {
                let inner = s
                    .strip_prefix('\'')
                    .and_then(|rest| rest.strip_suffix('\''))
                    .unwrap_or(s);
                if inner.contains("''") {
                    Cow::Owned(inner.replace("''", "'"))
                } else {
                    Cow::Borrowed(inner)
                }
            }
            Value::Bare(s) => Cow::Borrowed(s),
        }
    }

    /// True for `NULL` in any case, quoted or not.
    pub fn is_null(&self) -> bool {
        self.as_str().trim_matches('\'').eq_ignore_ascii_case("NULL")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tokenize a value list.
///
/// An empty or all-whitespace list yields no tokens. Unbalanced quotes or
/// parentheses are reported as [`RewriteError::Parse`].
pub fn tokenize(input: &str) -> RewriteResult<Vec<Value>> {
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }

    match separated_list0(char(','), raw_token)(input) {
        Ok(("", raw)) => Ok(raw.into_iter().map(classify).collect()),
        Ok((remaining, _)) => {
            let position = input.len() - remaining.len();
            let message = match remaining.chars().next() {
                Some('\'') => "unterminated string literal".to_string(),
                Some('(') => "unclosed parenthesis".to_string(),
                Some(c) => format!("unexpected '{}'", c),
                None => "unexpected end of input".to_string(),
            };
            Err(RewriteError::parse(position, message))
        }
        Err(e) => Err(RewriteError::parse(0, format!("Tokenize failed: {:?}", e))),
    }
}

/// Join tokens back into a value list.
pub fn join(values: &[Value]) -> String {
    values
        .iter()
        .map(Value::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn classify(raw: &str) -> Value {
    let raw = raw.trim();
    if all_consuming(quoted_literal)(raw).is_ok() {
        Value::Quoted(raw.to_string())
    } else {
        Value::Bare(raw.to_string())
    }
}

/// Everything up to the next top-level comma. May be empty.
fn raw_token(input: &str) -> IResult<&str, &str> {
    recognize(many0(segment))(input)
}

fn segment(input: &str) -> IResult<&str, &str> {
    alt((quoted_literal, parenthesized, is_not("',()")))(input)
}

/// `'...'` with `''` as an escaped quote.
fn quoted_literal(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
        char('\''),
        many0(alt((is_not("'"), tag("''")))),
        char('\''),
    )))(input)
}

/// `( ... )`, where commas do not split.
fn parenthesized(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
        char('('),
        many0(alt((quoted_literal, parenthesized, is_not("'()")))),
        char(')'),
    )))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(values: &[Value]) -> Vec<&str> {
        values.iter().map(Value::as_str).collect()
    }

    #[test]
    fn test_simple_list() {
        let values = tokenize("1, 'Gold', 'Includes **50** credits', 2").unwrap();
        assert_eq!(
            values,
            vec![
                Value::bare("1"),
                Value::Quoted("'Gold'".to_string()),
                Value::Quoted("'Includes **50** credits'".to_string()),
                Value::bare("2"),
            ]
        );
    }

    #[test]
    fn test_commas_inside_literal() {
        let values = tokenize("1, 'a, b, c', 3").unwrap();
        assert_eq!(texts(&values), vec!["1", "'a, b, c'", "3"]);
    }

    #[test]
    fn test_escaped_quote() {
        let values = tokenize("'It''s, fine', NULL").unwrap();
        assert_eq!(texts(&values), vec!["'It''s, fine'", "NULL"]);
        assert_eq!(values[0].content(), "It's, fine");
    }

    #[test]
    fn test_parentheses_keep_commas() {
        let values = tokenize("coalesce(1, (2, 3)), replace('a,b', ',', ';')").unwrap();
        assert_eq!(
            texts(&values),
            vec!["coalesce(1, (2, 3))", "replace('a,b', ',', ';')"]
        );
        assert!(matches!(values[0], Value::Bare(_)));
    }

    #[test]
    fn test_blob_and_concat_are_bare() {
        let values = tokenize("X'00ff', 'a' || 'b'").unwrap();
        assert!(matches!(values[0], Value::Bare(_)));
        assert!(matches!(values[1], Value::Bare(_)));
        assert_eq!(values[1].as_str(), "'a' || 'b'");
    }

    #[test]
    fn test_no_spaces_and_empty_fields() {
        let values = tokenize("1,,3").unwrap();
        assert_eq!(texts(&values), vec!["1", "", "3"]);
    }

    #[test]
    fn test_empty_list() {
        assert!(tokenize("").unwrap().is_empty());
        assert!(tokenize("   ").unwrap().is_empty());
    }

    #[test]
    fn test_unterminated_literal() {
        let err = tokenize("1, 'open").unwrap_err();
        match err {
            RewriteError::Parse { position, message } => {
                assert_eq!(position, 3);
                assert_eq!(message, "unterminated string literal");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unbalanced_parentheses() {
        assert!(tokenize("f(1, 2").is_err());
        assert!(tokenize("1), 2").is_err());
    }

    #[test]
    fn test_null_detection() {
        assert!(Value::null().is_null());
        assert!(Value::bare("null").is_null());
        assert!(Value::Quoted("'NULL'".to_string()).is_null());
        assert!(!Value::Quoted("'Nullah'".to_string()).is_null());
        assert!(!Value::bare("0").is_null());
    }

    #[test]
    fn test_quoted_escapes() {
        let value = Value::quoted("O'Brien");
        assert_eq!(value.as_str(), "'O''Brien'");
        assert_eq!(value.content(), "O'Brien");
    }

    #[test]
    fn test_join() {
        let values = tokenize("1,'a',  NULL").unwrap();
        assert_eq!(join(&values), "1, 'a', NULL");
    }
}
