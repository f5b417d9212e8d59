//! Types command implementation

use anyhow::Result;
use rc_check::check_relation_types;
use rc_core::RelationType;

use crate::cli::{GlobalArgs, TypesArgs};
use crate::commands::common::{load_config, open_adapter, report_check};

/// Execute the types command
pub async fn execute(args: &TypesArgs, global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;
    let adapter = open_adapter(&config, global)?;

    let expected: Vec<(&str, RelationType)> = args
        .expectations
        .iter()
        .map(|(name, kind)| (name.as_str(), *kind))
        .collect();

    if global.verbose {
        for (name, kind) in &expected {
            eprintln!("[verbose] Expecting {} to be a {}", name, kind);
        }
    }

    let outcome = check_relation_types(&adapter, &expected).await;
    let summary = expected
        .iter()
        .map(|(name, kind)| format!("{}={}", name, kind))
        .collect::<Vec<_>>()
        .join(", ");
    report_check(outcome, &format!("relation types: {}", summary))
}
