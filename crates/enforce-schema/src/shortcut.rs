//! One-shot helpers: compile a throw-away contract and validate immediately.
//!
//! Convenient for call sites that run once; hot call sites should compile a
//! [`Schema`] once and reuse it.

use enforce_core::{Arg, EnforceResult};

use crate::compile::Schema;
use crate::spec::ParamSpec;

/// Label used when the caller gives none.
pub const DEFAULT_LABEL: &str = "<>";

/// Compile `spec` and validate `args` as named fragments.
pub fn named(args: &[Arg], spec: &ParamSpec, comment: Option<&str>) -> EnforceResult<Schema> {
    let schema = Schema::compile(spec, comment.unwrap_or(DEFAULT_LABEL))?;
    schema.validate_named(args)?;
    Ok(schema)
}

/// Compile `spec` and validate `args` positionally.
pub fn positional(args: &[Arg], spec: &ParamSpec, comment: Option<&str>) -> EnforceResult<Schema> {
    let schema = Schema::compile(spec, comment.unwrap_or(DEFAULT_LABEL))?;
    schema.validate_positional(args)?;
    Ok(schema)
}

/// Compile `spec` and validate `args` with destructured positions.
pub fn hybrid(args: &[Arg], spec: &ParamSpec, comment: Option<&str>) -> EnforceResult<Schema> {
    let schema = Schema::compile(spec, comment.unwrap_or(DEFAULT_LABEL))?;
    schema.validate_hybrid(args)?;
    Ok(schema)
}
