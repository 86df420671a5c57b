//! # Inspect: print compiled contracts.
//!
//! Shows, per contract, the ordered parameters with their positions,
//! expected types and required flags, and the sub-contract of every
//! destructured position. `--json` emits the same report as JSON.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use enforce_schema::{ContractDocument, SchemaSummary};

/// Arguments for the `enforce inspect` subcommand.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Contract document (YAML) declaring classes and contracts.
    #[arg(long)]
    pub contracts: PathBuf,

    /// Only show the contract with this label.
    #[arg(long)]
    pub contract: Option<String>,

    /// Emit the report as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Declared classes and compiled contracts of one document.
#[derive(Debug, Serialize)]
pub struct InspectReport {
    pub classes: Vec<ClassSummary>,
    pub contracts: Vec<SchemaSummary>,
}

#[derive(Debug, Serialize)]
pub struct ClassSummary {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

/// Execute the inspect subcommand.
pub fn run_inspect(args: &InspectArgs) -> Result<u8> {
    let document = crate::load_document(&args.contracts)?;
    let report = build_report(&document, args.contract.as_deref())?;

    if args.json {
        let json = serde_json::to_string_pretty(&report).context("failed to serialize report")?;
        println!("{json}");
    } else {
        print!("{}", render(&report));
    }
    Ok(0)
}

/// Collect the report, optionally restricted to one contract.
pub fn build_report(document: &ContractDocument, contract: Option<&str>) -> Result<InspectReport> {
    let contracts = match contract {
        Some(name) => vec![document
            .contract(name)
            .with_context(|| format!("no contract named '{name}'"))?
            .summary()],
        None => document.contracts().map(|s| s.summary()).collect(),
    };
    let classes = document
        .classes()
        .names()
        .filter_map(|name| document.classes().get(name))
        .map(|class| ClassSummary {
            name: class.name().to_string(),
            parent: class.parent().map(|p| p.name().to_string()),
        })
        .collect();
    Ok(InspectReport { classes, contracts })
}

/// Plain-text rendering of a report.
pub fn render(report: &InspectReport) -> String {
    let mut out = String::new();
    if !report.classes.is_empty() {
        out.push_str("Classes:\n");
        for class in &report.classes {
            match &class.parent {
                Some(parent) => out.push_str(&format!("  {} extends {parent}\n", class.name)),
                None => out.push_str(&format!("  {}\n", class.name)),
            }
        }
        out.push('\n');
    }
    for contract in &report.contracts {
        render_contract(&mut out, contract, 0);
    }
    out.push_str(&format!("Total: {}\n", report.contracts.len()));
    out
}

fn render_contract(out: &mut String, summary: &SchemaSummary, depth: usize) {
    let indent = "  ".repeat(depth);
    out.push_str(&format!("{indent}Contract: {}\n", summary.name));
    if summary.required.is_empty() {
        out.push_str(&format!("{indent}  required: (none)\n"));
    } else {
        out.push_str(&format!("{indent}  required: {}\n", summary.required.join(", ")));
    }
    for param in &summary.params {
        let marker = if param.required { "!" } else { " " };
        out.push_str(&format!(
            "{indent}  {:>2}. {marker}{:<16} {}\n",
            param.position, param.name, param.expected
        ));
        if let Some(nested) = &param.nested {
            render_contract(out, nested, depth + 2);
        }
    }
    if depth == 0 {
        out.push('\n');
    }
}
