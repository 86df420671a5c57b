//! # enforce-core — Foundational Types for Argument Contracts
//!
//! Leaf crate of the workspace. Defines the call-time value model the
//! validator inspects, nominal class references, and the single error
//! family every contract violation is reported through.
//!
//! ## Key Design Principles
//!
//! 1. **Three-state slots.** [`Arg`] distinguishes `Absent` (present but
//!    unset), `Null`, and an actual [`Value`]. Null always passes type checks;
//!    an unset slot is only rejected where undefined-checking is enabled.
//!
//! 2. **Closed value enum.** Runtime type inspection is a single exhaustive
//!    `match` over [`Value`]; no reflection.
//!
//! 3. **Nominal classes.** [`ClassRef`] identity is pointer identity, and
//!    instance-of walks the parent chain.
//!
//! 4. **One error enum.** [`EnforceError`] has a variant per violation kind;
//!    [`ErrorKind`] is its serialisable discriminant.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `enforce-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod class;
pub mod error;
pub mod value;

pub use class::{ClassRef, ClassRegistry, Instance};
pub use error::{EnforceError, EnforceResult, ErrorKind};
pub use value::{Arg, Bag, PrimitiveTag, Value};
