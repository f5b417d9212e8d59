//! Show command implementation
//!
//! Print how a dotted name is reconstructed into a relation: which parts
//! come from the name and which from the adapter defaults, and how each
//! part is quoted.

use anyhow::{Context, Result};
use rc_check::relation_from_name;
use rc_core::Relation;
use serde::Serialize;

use crate::cli::{GlobalArgs, OutputFormat, ShowArgs};
use crate::commands::common::{load_config, open_adapter};

/// Reconstructed relation for JSON output
#[derive(Debug, Serialize)]
struct ShowOutput<'a> {
    name: &'a str,
    rendered: String,
    relation: &'a Relation,
}

/// Execute the show command
pub async fn execute(args: &ShowArgs, global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;
    let adapter = open_adapter(&config, global)?;

    let relation = relation_from_name(&adapter, &args.name)
        .with_context(|| format!("Failed to reconstruct relation '{}'", args.name))?;

    match args.output {
        OutputFormat::Json => {
            let output = ShowOutput {
                name: &args.name,
                rendered: relation.render(),
                relation: &relation,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => print!("{}", format_text(&relation)),
    }
    Ok(())
}

fn format_text(relation: &Relation) -> String {
    let mut out = format!("{}\n", relation.render());
    for part in relation.parts() {
        out.push_str(&format!(
            "  {:<10} {:<20} include={:<5} quote={}\n",
            part.component.to_string(),
            part.value.unwrap_or("-"),
            part.include,
            part.quote
        ));
    }
    out
}
