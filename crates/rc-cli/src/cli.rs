//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};
use rc_core::RelationType;

/// relcheck - check that materialized relations hold the expected rows and types
#[derive(Parser, Debug)]
#[command(name = "relcheck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the config file (default: ./relcheck.yml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override target (database connection)
    #[arg(short, long, global = true)]
    pub target: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check that relations hold the same rows as the first one
    Equal(EqualArgs),

    /// Check that relations were materialized as the expected kind
    Types(TypesArgs),

    /// Show how a relation name is reconstructed
    Show(ShowArgs),
}

/// Arguments for the equal command
#[derive(Args, Debug)]
pub struct EqualArgs {
    /// Relation names; the first is the basis for comparison
    #[arg(required = true)]
    pub names: Vec<String>,
}

/// Arguments for the types command
#[derive(Args, Debug)]
pub struct TypesArgs {
    /// Expected types as name=kind (table, view, materialized_view, cte, external)
    #[arg(required = true, value_parser = parse_expectation)]
    pub expectations: Vec<(String, RelationType)>,
}

/// Arguments for the show command
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Relation name, optionally dotted and quoted
    pub name: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON output
    Json,
}

/// Parse a `name=kind` expectation.
///
/// Splits on the last `=` so quoted identifiers may contain one.
pub(crate) fn parse_expectation(s: &str) -> Result<(String, RelationType), String> {
    let (name, kind) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=KIND, got '{}'", s))?;
    if name.is_empty() {
        return Err(format!("missing relation name in '{}'", s));
    }
    let relation_type = kind.parse::<RelationType>().map_err(|e| e.to_string())?;
    Ok((name.to_string(), relation_type))
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
