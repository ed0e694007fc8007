//! insert-rewrite — clean up a SQLite dump one table at a time
//!
//! # Usage
//!
//! ```bash
//! # Add a price column to packages
//! grep '^INSERT OR REPLACE INTO "packages"' dump.sql | insert-rewrite packages > packages.sql
//!
//! # Drop nameless members, silence the echo
//! insert-rewrite members < members.sql > clean.sql 2>/dev/null
//! ```

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use colored::*;
use insert_rewrite::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "insert-rewrite")]
#[command(version)]
#[command(about = "Rewrite INSERT OR REPLACE statements from a SQLite dump", long_about = None)]
#[command(after_help = "TABLES:
    packages    add a price column taken from **N** in the description
    members     drop rows without a name, fill NULL names and government id

Statements are read from stdin and written to stdout. Every statement is
echoed to stderr as 'Original:' and 'Processed:'. Set RUST_LOG=debug for
per-statement logging.")]
struct Cli {
    /// Table to rewrite; statements for other tables pass through
    table: Option<String>,

    /// TOML file with rewriter settings (table, echo, color)
    #[arg(long, env = "INSERT_REWRITE_CONFIG")]
    config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    let stderr_is_terminal = io::stderr().is_terminal();
    colored::control::set_override(stderr_is_terminal);
    init_tracing(stderr_is_terminal);

    if let Err(e) = run(&cli, stderr_is_terminal) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(ansi: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("insert_rewrite=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(ansi)
        .init();
}

fn run(cli: &Cli, stderr_is_terminal: bool) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => RewriterConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => RewriterConfig {
            color: stderr_is_terminal,
            ..RewriterConfig::default()
        },
    };
    if let Some(table) = &cli.table {
        config.table = table.clone();
    }
    colored::control::set_override(config.color);

    tracing::debug!(table = %config.table, echo = config.echo, "starting rewrite");

    let rewriter = Rewriter::new(config);
    let stdin = io::stdin().lock();
    let mut stdout = io::BufWriter::new(io::stdout().lock());
    let mut stderr = io::stderr().lock();

    rewriter
        .run(stdin, &mut stdout, &mut stderr)
        .context("Rewrite failed")?;
    Ok(())
}
