//! Statement accumulation and rewriting.
//!
//! Input is read line by line into a buffer until the buffer contains `);`.
//! Each complete statement is echoed to the diagnostic stream, run through
//! the configured table transform, echoed again and written to output
//! unless the transform dropped it.
//!
//! A `);` inside a string literal ends the statement early. Text after the
//! last `);` at end of input is discarded.

use std::io::{BufRead, Write};

use colored::Colorize;
use tracing::{debug, info, warn};

use crate::config::RewriterConfig;
use crate::error::RewriteResult;
use crate::statement::{InsertStatement, TERMINATOR};
use crate::tokenizer::tokenize;
use crate::transform::{Outcome, Row, TableTransform, TransformRegistry};

/// Collects input lines into complete statements.
#[derive(Debug, Default)]
pub struct StatementAccumulator {
    buffer: String,
}

impl StatementAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line (with its line ending). Returns the completed
    /// statement, trailing whitespace trimmed, once the buffer holds `);`.
    pub fn push(&mut self, line: &str) -> Option<String> {
        self.buffer.push_str(line);
        if !self.buffer.contains(TERMINATOR) {
            return None;
        }

        let statement = self.buffer.trim_end().to_string();
        self.buffer.clear();
        Some(statement)
    }

    /// Whatever is left over, if anything.
    pub fn finish(self) -> Option<String> {
        if self.buffer.is_empty() {
            None
        } else {
            Some(self.buffer)
        }
    }
}

/// Result of processing one statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Processed {
    /// The transform changed the statement.
    Rewritten(String),
    /// Emitted as read.
    PassedThrough(String),
    /// Not emitted.
    Dropped,
}

impl Processed {
    /// Text to write to output, `None` for a dropped row.
    pub fn output(&self) -> Option<&str> {
        match self {
            Processed::Rewritten(s) | Processed::PassedThrough(s) => Some(s),
            Processed::Dropped => None,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Processed::Rewritten(_) => "rewritten",
            Processed::PassedThrough(_) => "passed through",
            Processed::Dropped => "dropped",
        }
    }
}

/// Counters for one [`Rewriter::run`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub statements: usize,
    pub rewritten: usize,
    pub passed_through: usize,
    pub dropped: usize,
    /// An unterminated statement was left at end of input.
    pub discarded_trailing: bool,
}

impl RunStats {
    fn record(&mut self, processed: &Processed) {
        self.statements += 1;
        match processed {
            Processed::Rewritten(_) => self.rewritten += 1,
            Processed::PassedThrough(_) => self.passed_through += 1,
            Processed::Dropped => self.dropped += 1,
        }
    }
}

/// Rewrites statements for the table chosen in its [`RewriterConfig`].
pub struct Rewriter {
    config: RewriterConfig,
    transform: Option<Box<dyn TableTransform>>,
}

impl Rewriter {
    /// Build a rewriter using the built-in transforms.
    pub fn new(config: RewriterConfig) -> Self {
        Self::with_registry(config, TransformRegistry::new())
    }

    /// Build a rewriter resolving its transform from `registry`.
    pub fn with_registry(config: RewriterConfig, registry: TransformRegistry) -> Self {
        let transform = registry.resolve(&config.table);
        if transform.is_none() {
            debug!(
                table = %config.table,
                "no transform registered; all statements pass through"
            );
        }
        Self { config, transform }
    }

    pub fn config(&self) -> &RewriterConfig {
        &self.config
    }

    /// Process one complete statement.
    pub fn process(&self, statement: &str) -> Processed {
        let passed = || Processed::PassedThrough(statement.to_string());

        let Some(transform) = &self.transform else {
            return passed();
        };
        let Some(insert) = InsertStatement::parse(statement) else {
            debug!("not a single-row INSERT OR REPLACE; passing through");
            return passed();
        };
        if insert.table != transform.table() {
            return passed();
        }

        let values = match tokenize(insert.values) {
            Ok(values) => values,
            Err(e) => {
                warn!(
                    table = insert.table,
                    error = %e,
                    "value list not understood; passing through"
                );
                return passed();
            }
        };

        let row = Row {
            prefix: insert.prefix.to_string(),
            values,
        };
        match transform.apply(row) {
            Outcome::PassThrough => passed(),
            Outcome::Rewrite(row) => Processed::Rewritten(row.to_statement()),
            Outcome::Drop => Processed::Dropped,
        }
    }

    /// Rewrite every statement from `input` until end of stream.
    ///
    /// Output statements go to `output`, one per line. Echo lines go to
    /// `diagnostics` when enabled. Invalid UTF-8 is replaced, not rejected.
    pub fn run<R, W, D>(
        &self,
        mut input: R,
        output: &mut W,
        diagnostics: &mut D,
    ) -> RewriteResult<RunStats>
    where
        R: BufRead,
        W: Write,
        D: Write,
    {
        let mut accumulator = StatementAccumulator::new();
        let mut stats = RunStats::default();
        let mut line = Vec::new();

        loop {
            line.clear();
            if input.read_until(b'\n', &mut line)? == 0 {
                break;
            }
            if let Some(statement) = accumulator.push(&String::from_utf8_lossy(&line)) {
                let processed = self.emit(&statement, output, diagnostics)?;
                stats.record(&processed);
            }
        }

        if let Some(rest) = accumulator.finish() {
            warn!(bytes = rest.len(), "input ended inside a statement; discarding it");
            stats.discarded_trailing = true;
        }

        output.flush()?;
        diagnostics.flush()?;

        info!(
            table = %self.config.table,
            statements = stats.statements,
            rewritten = stats.rewritten,
            passed_through = stats.passed_through,
            dropped = stats.dropped,
            "rewrite finished"
        );
        Ok(stats)
    }

    fn emit<W: Write, D: Write>(
        &self,
        statement: &str,
        output: &mut W,
        diagnostics: &mut D,
    ) -> RewriteResult<Processed> {
        self.echo(diagnostics, "Original:", statement)?;

        let processed = self.process(statement);
        debug!(table = %self.config.table, outcome = processed.kind(), "statement processed");

        self.echo(diagnostics, "Processed:", processed.output().unwrap_or_default())?;
        if let Some(text) = processed.output() {
            writeln!(output, "{}", text)?;
        }
        Ok(processed)
    }

    fn echo<D: Write>(&self, diagnostics: &mut D, label: &str, text: &str) -> RewriteResult<()> {
        if !self.config.echo {
            return Ok(());
        }
        if self.config.color {
            writeln!(diagnostics, "{} {}", label.dimmed(), text)?;
        } else {
            writeln!(diagnostics, "{} {}", label, text)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_accumulator_single_line() {
        let mut acc = StatementAccumulator::new();
        assert_eq!(
            acc.push("INSERT OR REPLACE INTO \"t\" VALUES (1);\n"),
            Some("INSERT OR REPLACE INTO \"t\" VALUES (1);".to_string())
        );
        assert_eq!(acc.finish(), None);
    }

    #[test]
    fn test_accumulator_multi_line() {
        let mut acc = StatementAccumulator::new();
        assert_eq!(acc.push("INSERT OR REPLACE INTO \"t\" VALUES (1, 'a\n"), None);
        assert_eq!(
            acc.push("b');\n"),
            Some("INSERT OR REPLACE INTO \"t\" VALUES (1, 'a\nb');".to_string())
        );
    }

    #[test]
    fn test_accumulator_terminator_inside_literal() {
        let mut acc = StatementAccumulator::new();
        assert_eq!(
            acc.push("INSERT OR REPLACE INTO \"t\" VALUES (1, 'wink );\n"),
            Some("INSERT OR REPLACE INTO \"t\" VALUES (1, 'wink );".to_string())
        );
        assert_eq!(acc.push("still quoted');\n"), Some("still quoted');".to_string()));
    }

    #[test]
    fn test_accumulator_leftover() {
        let mut acc = StatementAccumulator::new();
        assert_eq!(acc.push("INSERT OR REPLACE INTO \"t\" VALUES (1\n"), None);
        assert_eq!(acc.finish(), Some("INSERT OR REPLACE INTO \"t\" VALUES (1\n".to_string()));
    }

    #[test]
    fn test_unknown_table_passes_everything() {
        let rewriter = Rewriter::new(RewriterConfig::default());
        let stmt = "INSERT OR REPLACE INTO \"members\" (\"id\") VALUES (1, 2, 3, 4, 5, 6, 7, NULL, NULL);";
        assert_eq!(rewriter.process(stmt), Processed::PassedThrough(stmt.to_string()));
    }

    #[test]
    fn test_other_table_passes_through() {
        let rewriter = Rewriter::new(RewriterConfig::for_table("members"));
        let stmt = "INSERT OR REPLACE INTO \"visits\" (\"id\") VALUES (1, 2, 3, 4, 5, 6, 7, NULL, NULL);";
        assert_eq!(rewriter.process(stmt), Processed::PassedThrough(stmt.to_string()));
    }

    #[test]
    fn test_untokenizable_values_pass_through() {
        let rewriter = Rewriter::new(RewriterConfig::for_table("packages"));
        let stmt = "INSERT OR REPLACE INTO \"packages\" (\"id\", \"name\", \"description\", \"display_order\") VALUES (1, 'Gold, 'x', 2);";
        assert_eq!(rewriter.process(stmt), Processed::PassedThrough(stmt.to_string()));
    }

    #[test]
    fn test_echo_disabled() {
        let config = RewriterConfig {
            echo: false,
            ..RewriterConfig::for_table("members")
        };
        let rewriter = Rewriter::new(config);
        let mut out = Vec::new();
        let mut diag = Vec::new();
        let stats = rewriter
            .run("CREATE TABLE t (id INTEGER);\n".as_bytes(), &mut out, &mut diag)
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "CREATE TABLE t (id INTEGER);\n");
        assert!(diag.is_empty());
        assert_eq!(stats.passed_through, 1);
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let rewriter = Rewriter::new(RewriterConfig::default());
        let mut out = Vec::new();
        let mut diag = Vec::new();
        rewriter
            .run(&b"VALUES ('caf\xe9');\n"[..], &mut out, &mut diag)
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "VALUES ('caf\u{fffd}');\n");
    }
}
