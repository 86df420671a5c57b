//! # Error Types — Structured Error Hierarchy
//!
//! Defines the single error family raised by contract compilation and
//! argument validation. All variants use `thiserror` for derive-based
//! `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Every message embeds the contract label verbatim, so a failure can be
//!   located without a debugger.
//! - Only `MissingRequired` and `UnexpectedParameter` aggregate names; every
//!   other variant names exactly one offending parameter.
//! - Validation is fail-fast: the first violation found is the one returned.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Convenience alias used across the workspace.
pub type EnforceResult<T> = Result<T, EnforceError>;

/// Error raised when a contract is malformed or an argument payload
/// violates it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EnforceError {
    /// The parameter spec or label handed to the compiler is invalid.
    #[error("invalid contract configuration: {reason}")]
    Configuration {
        /// What was wrong with the spec, label, or descriptor.
        reason: String,
    },

    /// One or more required parameters were not supplied.
    #[error("{}", missing_message(.contract, .missing))]
    MissingRequired {
        /// Diagnostic label of the contract.
        contract: String,
        /// Every missing required name, in declaration order.
        missing: Vec<String>,
    },

    /// A named parameter was explicitly passed the undefined sentinel.
    #[error("\"undefined\" was passed to {contract} for {param}")]
    UndefinedValue {
        /// Diagnostic label of the contract.
        contract: String,
        /// The parameter holding the sentinel.
        param: String,
    },

    /// A supplied value does not have the declared type or class.
    #[error("type mismatch in {contract}: \"{param}\"; expected {expected} but got {actual} instead")]
    TypeMismatch {
        /// Diagnostic label of the contract.
        contract: String,
        /// The offending parameter.
        param: String,
        /// The declared expectation (tag or `instance of <Class>`).
        expected: String,
        /// Rendering of the value actually received.
        actual: String,
    },

    /// Named arguments contained keys the contract does not declare.
    #[error("unknown parameter(s) passed to {contract}: {}", .extra.join(", "))]
    UnexpectedParameter {
        /// Diagnostic label of the contract.
        contract: String,
        /// Every undeclared key, in the order supplied.
        extra: Vec<String>,
    },

    /// More positional values were supplied than parameters declared.
    #[error("too many arguments to {contract}: received {received} but expected {expected}")]
    Arity {
        /// Diagnostic label of the contract.
        contract: String,
        /// Number of positional values supplied.
        received: usize,
        /// Number of parameters declared.
        expected: usize,
    },
}

fn missing_message(contract: &str, missing: &[String]) -> String {
    if missing.is_empty() {
        return format!("{contract} is missing a required argument");
    }
    let names: Vec<String> = missing.iter().map(|m| format!("\"{m}\"")).collect();
    format!(
        "required argument(s) for {contract} missing: {}",
        names.join(", ")
    )
}

/// Discriminant of [`EnforceError`], suitable for logging and assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Configuration,
    MissingRequired,
    UndefinedValue,
    TypeMismatch,
    UnexpectedParameter,
    Arity,
}

impl ErrorKind {
    /// Stable snake_case name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::MissingRequired => "missing_required",
            Self::UndefinedValue => "undefined_value",
            Self::TypeMismatch => "type_mismatch",
            Self::UnexpectedParameter => "unexpected_parameter",
            Self::Arity => "arity",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl EnforceError {
    /// Shorthand for a [`EnforceError::Configuration`] error.
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    /// The kind of violation this error reports.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration { .. } => ErrorKind::Configuration,
            Self::MissingRequired { .. } => ErrorKind::MissingRequired,
            Self::UndefinedValue { .. } => ErrorKind::UndefinedValue,
            Self::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            Self::UnexpectedParameter { .. } => ErrorKind::UnexpectedParameter,
            Self::Arity { .. } => ErrorKind::Arity,
        }
    }

    /// The contract label carried by the error, if any.
    ///
    /// Configuration errors are raised before a contract exists and carry none.
    pub fn contract(&self) -> Option<&str> {
        match self {
            Self::Configuration { .. } => None,
            Self::MissingRequired { contract, .. }
            | Self::UndefinedValue { contract, .. }
            | Self::TypeMismatch { contract, .. }
            | Self::UnexpectedParameter { contract, .. }
            | Self::Arity { contract, .. } => Some(contract),
        }
    }
}
