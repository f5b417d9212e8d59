//! Equal command implementation
//!
//! Compare every named relation against the first one.

use anyhow::Result;
use rc_check::check_relations_equal;

use crate::cli::{EqualArgs, GlobalArgs};
use crate::commands::common::{load_config, open_adapter, report_check};

/// Execute the equal command
pub async fn execute(args: &EqualArgs, global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;
    let adapter = open_adapter(&config, global)?;

    if global.verbose {
        if let Some((basis, rest)) = args.names.split_first() {
            eprintln!("[verbose] Basis relation: {}", basis);
            eprintln!("[verbose] Comparing: {}", rest.join(", "));
        }
    }

    let names: Vec<&str> = args.names.iter().map(String::as_str).collect();
    let outcome = check_relations_equal(&adapter, &names).await;
    report_check(outcome, &format!("relations equal: {}", names.join(", ")))
}
