//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use rc_check::CheckError;
use rc_core::Config;
use rc_db::DuckDbBackend;
use std::fmt;
use std::path::Path;

use crate::cli::GlobalArgs;

/// Config file read when `--config` is not given
pub(crate) const DEFAULT_CONFIG_FILE: &str = "relcheck.yml";

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that the adapter and its connection guards drop first.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Control flow only; main exits without printing it.
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Load the config named by `--config`, or `./relcheck.yml` when present.
///
/// Without either, an in-memory DuckDB config is used.
pub(crate) fn load_config(global: &GlobalArgs) -> Result<Config> {
    match &global.config {
        Some(path) => {
            Config::load(Path::new(path)).with_context(|| format!("Failed to load config {}", path))
        }
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            Config::load(Path::new(DEFAULT_CONFIG_FILE)).context("Failed to load relcheck.yml")
        }
        None => {
            if global.verbose {
                eprintln!("[verbose] No {} found, using in-memory DuckDB", DEFAULT_CONFIG_FILE);
            }
            Ok(Config::default())
        }
    }
}

/// Open the adapter for the resolved target, applying any quoting override.
pub(crate) fn open_adapter(config: &Config, global: &GlobalArgs) -> Result<DuckDbBackend> {
    let target = Config::resolve_target(global.target.as_deref());
    let db_config = config
        .get_database_config(target.as_deref())
        .context("Failed to get database configuration")?;

    if global.verbose {
        eprintln!(
            "[verbose] Opening {} database at {} (target: {})",
            db_config.db_type,
            db_config.path,
            target.as_deref().unwrap_or("default")
        );
    }

    let mut adapter = DuckDbBackend::from_config(&db_config)
        .with_context(|| format!("Failed to open database {}", db_config.path))?;
    if let Some(policy) = config.quoting {
        log::debug!("Applying quote policy override {:?}", policy);
        adapter = adapter.with_quote_policy(policy);
    }
    Ok(adapter)
}

/// Report a check outcome.
///
/// Assertion failures print `FAIL` and exit with status 1; processing
/// errors propagate and exit with status 2.
pub(crate) fn report_check(outcome: Result<(), CheckError>, summary: &str) -> Result<()> {
    match outcome {
        Ok(()) => {
            println!("PASS {}", summary);
            Ok(())
        }
        Err(err) if err.is_assertion_failure() => {
            println!("FAIL {}", summary);
            eprintln!("{}", err);
            Err(ExitCode(1).into())
        }
        Err(err) => Err(anyhow::Error::new(err).context(format!("Could not check {}", summary))),
    }
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
