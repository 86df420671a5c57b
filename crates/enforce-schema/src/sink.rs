//! # Failure Sinks
//!
//! A [`ValidationSink`] observes validation failures for diagnostics. It is
//! injected per validator and never consulted for the outcome: a validator
//! with no sink behaves identically, minus the record.
//!
//! - [`TracingSink`] emits one structured `warn!` event per failure.
//! - [`MemorySink`] keeps an append-only in-memory log of failures.

use std::sync::{Mutex, PoisonError};

use serde::Serialize;

use enforce_core::{EnforceError, ErrorKind};

use crate::validate::Convention;

/// One observed validation failure.
#[derive(Debug, Clone, Copy)]
pub struct ValidationEvent<'a> {
    /// Label of the schema the validator was bound to.
    pub contract: &'a str,
    pub convention: Convention,
    pub error: &'a EnforceError,
}

/// Receiver for validation failures.
pub trait ValidationSink: Send + Sync {
    fn record(&self, event: &ValidationEvent<'_>);
}

/// Forwards failures to `tracing` at `WARN`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ValidationSink for TracingSink {
    fn record(&self, event: &ValidationEvent<'_>) {
        tracing::warn!(
            contract = %event.contract,
            convention = %event.convention,
            kind = %event.error.kind(),
            "{}",
            event.error
        );
    }
}

/// An owned copy of a [`ValidationEvent`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordedFailure {
    pub contract: String,
    pub convention: Convention,
    pub kind: ErrorKind,
    pub message: String,
}

/// Append-only, thread-safe failure log.
#[derive(Debug, Default)]
pub struct MemorySink {
    failures: Mutex<Vec<RecordedFailure>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every failure recorded so far, oldest first.
    pub fn failures(&self) -> Vec<RecordedFailure> {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ValidationSink for MemorySink {
    fn record(&self, event: &ValidationEvent<'_>) {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedFailure {
                contract: event.contract.to_string(),
                convention: event.convention,
                kind: event.error.kind(),
                message: event.error.to_string(),
            });
    }
}
