//! # Check: validate a JSON payload against a declared contract.
//!
//! ## Usage
//!
//! ```bash
//! # Positional call with two arguments:
//! enforce check --contracts contracts.yaml --contract help \
//!     --convention positional --args '["a", {"$class": "Date"}]'
//!
//! # Named call read from a file:
//! enforce check --contracts contracts.yaml --contract help \
//!     --convention named --args-file payload.json
//! ```
//!
//! A JSON array is the argument list; any other JSON value is passed as the
//! single argument.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use enforce_core::EnforceResult;
use enforce_schema::{ContractDocument, Convention, TracingSink};

/// Arguments for the `enforce check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Contract document (YAML) declaring classes and contracts.
    #[arg(long)]
    pub contracts: PathBuf,

    /// Label of the contract to validate against.
    #[arg(long)]
    pub contract: String,

    /// Calling convention of the payload.
    #[arg(long, value_enum, default_value = "positional")]
    pub convention: ConventionArg,

    /// Argument payload as inline JSON.
    #[arg(
        long = "args",
        value_name = "JSON",
        conflicts_with = "args_file",
        required_unless_present = "args_file"
    )]
    pub payload: Option<String>,

    /// File containing the JSON argument payload.
    #[arg(long)]
    pub args_file: Option<PathBuf>,
}

/// Calling convention selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConventionArg {
    /// One or more objects of name/value pairs.
    Named,
    /// Values in declaration order.
    Positional,
    /// Positional, with nested contracts destructuring objects.
    Hybrid,
}

impl From<ConventionArg> for Convention {
    fn from(arg: ConventionArg) -> Self {
        match arg {
            ConventionArg::Named => Convention::Named,
            ConventionArg::Positional => Convention::Positional,
            ConventionArg::Hybrid => Convention::Hybrid,
        }
    }
}

/// Execute the check subcommand. Returns 0 when the payload satisfies the
/// contract and 1 when it violates it.
pub fn run_check(args: &CheckArgs) -> Result<u8> {
    let document = crate::load_document(&args.contracts)?;
    let payload = match (&args.payload, &args.args_file) {
        (Some(json), _) => json.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read argument payload {}", path.display()))?,
        (None, None) => anyhow::bail!("one of --args or --args-file is required"),
    };
    let convention = Convention::from(args.convention);

    match check_payload(&document, &args.contract, convention, &payload)? {
        Ok(()) => {
            println!("OK: {} ({convention})", args.contract);
            Ok(0)
        }
        Err(e) => {
            eprintln!("FAIL [{}]: {e}", e.kind());
            Ok(1)
        }
    }
}

/// Validate `payload` against the contract labelled `contract`.
///
/// The outer `Result` carries operational errors (unknown contract, invalid
/// JSON); the inner one is the validation outcome.
pub fn check_payload(
    document: &ContractDocument,
    contract: &str,
    convention: Convention,
    payload: &str,
) -> Result<EnforceResult<()>> {
    let schema = document.contract(contract).with_context(|| {
        let known: Vec<&str> = document.contracts().map(|s| s.name()).collect();
        format!("no contract named '{contract}' (declared: {})", known.join(", "))
    })?;
    let call_args = document
        .parse_args(payload)
        .context("invalid argument payload")?;

    tracing::debug!(
        contract,
        %convention,
        args = call_args.len(),
        "checking payload"
    );

    Ok(schema
        .validator()
        .with_sink(&TracingSink)
        .validate(convention, &call_args))
}
