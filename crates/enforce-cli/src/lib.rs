//! # enforce-cli — Command-Line Front End for Argument Contracts
//!
//! Provides the `enforce` binary. Contracts are declared in a YAML document
//! (see `enforce_schema::document`); argument payloads are JSON.
//!
//! ## Subcommands
//!
//! - `enforce check` — Validate one JSON payload against one contract.
//! - `enforce inspect` — Print the compiled form of a document's contracts.
//!
//! ```bash
//! enforce check --contracts contracts.yaml --contract F \
//!     --convention hybrid --args '[100, {"date": {"$class": "Date"}}]'
//! enforce inspect --contracts contracts.yaml --json
//! ```
//!
//! ## Crate Policy
//!
//! - Argument parsing lives here; compilation and validation are delegated
//!   to `enforce-schema`.
//! - Handlers return the process exit code; operational errors propagate as
//!   `anyhow::Error` and are logged by `main`.

pub mod check;
pub mod inspect;

use std::path::Path;

use anyhow::{Context, Result};

use enforce_schema::ContractDocument;

/// Load and compile the contract document at `path`.
pub fn load_document(path: &Path) -> Result<ContractDocument> {
    ContractDocument::load(path)
        .with_context(|| format!("failed to load contract document {}", path.display()))
}
