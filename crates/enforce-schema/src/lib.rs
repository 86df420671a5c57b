//! # enforce-schema — Contract Compilation & Argument Validation
//!
//! Compiles declarative parameter specs into immutable [`Schema`]s and checks
//! call-time argument payloads against them.
//!
//! ## Compilation (`compile`, `spec`)
//!
//! A [`ParamSpec`] is an ordered list of `(name, descriptor)` pairs. The
//! compiler strips the `!` required marker, lowercases type tags, keeps class
//! references as-is, and compiles nested specs into sub-schemas for
//! destructured positions. The compiler validates its own inputs through the
//! same validator it produces contracts for.
//!
//! ## Validation (`validate`)
//!
//! [`ArgumentValidator`] accepts three calling conventions:
//!
//! - **named** — one or more bags of name → value pairs;
//! - **positional** — values in declaration order;
//! - **hybrid** — positional, with some positions being destructured bags.
//!
//! Each call returns `Ok(())` or the first [`EnforceError`] found.
//!
//! ## Documents (`document`) and sinks (`sink`)
//!
//! [`ContractDocument`] loads contracts from YAML and JSON payloads into
//! values. [`ValidationSink`] lets callers observe failures; [`TracingSink`]
//! forwards them to `tracing`.
//!
//! ## Crate Policy
//!
//! - Depends only on `enforce-core` internally.
//! - Compiled schemas are immutable and `Send + Sync`.
//! - Validation never mutates shared state; sinks are the only side channel.
//!
//! ## Example
//!
//! ```
//! use enforce_core::{Arg, Bag, ErrorKind};
//! use enforce_schema::{ParamSpec, Schema};
//!
//! let schema = Schema::compile(
//!     &ParamSpec::new().param("a", "!string").param("b", "number"),
//!     "F",
//! )
//! .unwrap();
//!
//! assert!(schema.validate_positional(&[Arg::from("x")]).is_ok());
//!
//! let err = schema
//!     .validate_positional(&[Arg::from("x"), Arg::from(1), Arg::from(2)])
//!     .unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::Arity);
//!
//! let err = schema
//!     .validate_named(&[Arg::from(Bag::new().with("a", "x").with("b", "y"))])
//!     .unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::TypeMismatch);
//! ```

pub mod compile;
pub mod document;
pub mod shortcut;
pub mod sink;
pub mod spec;
pub mod validate;

pub use compile::{
    compile, compile_dynamic, ExpectedType, Param, ParamSummary, Schema, SchemaSummary,
    REQUIRED_MARKER,
};
pub use document::{json_to_arg, ContractDocument, DocumentError};
pub use enforce_core::EnforceError;
pub use sink::{MemorySink, RecordedFailure, TracingSink, ValidationEvent, ValidationSink};
pub use spec::{Descriptor, ParamSpec};
pub use validate::{ArgumentValidator, Convention};
