//! # Contract Compilation
//!
//! Turns a [`ParamSpec`] into an immutable [`Schema`]: the ordered parameter
//! list, the required subset, a resolved [`ExpectedType`] per parameter, and
//! nested schemas for destructured (hybrid) positions.
//!
//! ## Descriptor classification
//!
//! ```text
//! "!String"          → required, Primitive(string)   (marker stripped, lowercased)
//! "number"           → optional, Primitive(number)
//! "any"              → optional, Wildcard
//! ClassRef           → optional, Class               (instance-of)
//! ParamSpec { .. }   → optional, Hybrid(Schema)      (label "<parent> destructured arg #<idx>")
//! ParamSpec inside a destructured position → optional, Primitive(object)
//! ```
//!
//! ## Self-check
//!
//! [`compile`] and [`compile_dynamic`] validate their own two inputs
//! positionally against a fixed `{parameters: '!object', name: '!string'}`
//! contract before compiling. Any violation is reported as
//! `EnforceError::Configuration`.

use std::collections::HashMap;

use serde::Serialize;

use enforce_core::{Arg, ClassRef, EnforceError, EnforceResult, PrimitiveTag};

use crate::spec::{Descriptor, ParamSpec};
use crate::validate::ArgumentValidator;

/// Leading character marking a declared tag as required.
pub const REQUIRED_MARKER: char = '!';

/// Label of the compiler's own contract.
pub const SELF_CHECK_LABEL: &str = "Enforce.create";

/// Resolved expectation for one parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ExpectedType {
    Primitive(PrimitiveTag),
    Class(ClassRef),
    Wildcard,
    /// A destructured bag, validated against its own schema.
    Hybrid(Box<Schema>),
}

impl ExpectedType {
    /// Human-readable expectation used in error messages and summaries.
    pub fn describe(&self) -> String {
        match self {
            Self::Primitive(tag) => tag.as_str().to_string(),
            Self::Class(class) => format!("instance of class {}", class.name()),
            Self::Wildcard => "any".to_string(),
            Self::Hybrid(_) => "destructured object".to_string(),
        }
    }
}

/// One compiled parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    name: String,
    expected: ExpectedType,
    required: bool,
}

impl Param {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn expected(&self) -> &ExpectedType {
        &self.expected
    }

    pub fn is_required(&self) -> bool {
        self.required
    }
}

/// A compiled, immutable parameter contract.
///
/// ## Invariants
///
/// - Parameter names are unique; `index` maps each to its position.
/// - Every name in `required` is a declared parameter.
/// - Hybrid sub-schemas live inside the parameter they belong to, so every
///   hybrid index is a declared position by construction.
///
/// `Schema` holds no interior mutability and is `Send + Sync`; one instance
/// can back any number of concurrent validations.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    name: String,
    params: Vec<Param>,
    index: HashMap<String, usize>,
    required: Vec<String>,
}

impl Schema {
    /// Compile `spec` under the diagnostic `label`.
    ///
    /// # Errors
    ///
    /// Returns `EnforceError::Configuration` for unknown tags or a failed
    /// self-check. A nested spec inside a destructured position compiles to
    /// a plain `object` check.
    pub fn compile(spec: &ParamSpec, label: &str) -> EnforceResult<Self> {
        compile(Some(spec), Some(label))
    }

    /// The diagnostic label used in every error message.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parameters in declaration order.
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Parameter names in declaration order.
    pub fn ordered_params(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(Param::name)
    }

    pub fn param(&self, name: &str) -> Option<&Param> {
        self.position(name).map(|idx| &self.params[idx])
    }

    /// Positional index of `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Required names in declaration order.
    pub fn required(&self) -> &[String] {
        &self.required
    }

    pub fn expected_type(&self, name: &str) -> Option<&ExpectedType> {
        self.param(name).map(Param::expected)
    }

    /// Nested schemas keyed by positional index, in ascending order.
    pub fn hybrid_sub_schemas(&self) -> impl Iterator<Item = (usize, &Schema)> {
        self.params
            .iter()
            .enumerate()
            .filter_map(|(idx, p)| match &p.expected {
                ExpectedType::Hybrid(nested) => Some((idx, nested.as_ref())),
                _ => None,
            })
    }

    /// Number of declared parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// The error to raise when a required argument's default is evaluated.
    ///
    /// Use it as the default of a required parameter so that omitting the
    /// argument fails at the call site:
    ///
    /// ```
    /// # use enforce_core::Arg;
    /// # use enforce_schema::{ParamSpec, Schema};
    /// let schema = Schema::compile(&ParamSpec::new().param("a", "string"), "F").unwrap();
    /// let a = Arg::Absent.or_else(|| Err(schema.req()));
    /// assert!(a.is_err());
    /// ```
    pub fn req(&self) -> EnforceError {
        EnforceError::MissingRequired {
            contract: self.name.clone(),
            missing: Vec::new(),
        }
    }

    /// A validator bound to this schema.
    pub fn validator(&self) -> ArgumentValidator<'_> {
        ArgumentValidator::new(self)
    }

    /// Validate a named payload. See [`ArgumentValidator::validate_named`].
    pub fn validate_named(&self, fragments: &[Arg]) -> EnforceResult<()> {
        self.validator().validate_named(fragments)
    }

    /// Validate a positional payload. See [`ArgumentValidator::validate_positional`].
    pub fn validate_positional(&self, args: &[Arg]) -> EnforceResult<()> {
        self.validator().validate_positional(args)
    }

    /// Validate a hybrid payload. See [`ArgumentValidator::validate_hybrid`].
    pub fn validate_hybrid(&self, args: &[Arg]) -> EnforceResult<()> {
        self.validator().validate_hybrid(args)
    }

    /// Serialisable description of the compiled contract.
    pub fn summary(&self) -> SchemaSummary {
        SchemaSummary {
            name: self.name.clone(),
            required: self.required.clone(),
            params: self
                .params
                .iter()
                .enumerate()
                .map(|(position, p)| ParamSummary {
                    name: p.name.clone(),
                    position,
                    required: p.required,
                    expected: p.expected.describe(),
                    nested: match &p.expected {
                        ExpectedType::Hybrid(nested) => Some(nested.summary()),
                        _ => None,
                    },
                })
                .collect(),
        }
    }
}

/// Serialisable view of a [`Schema`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaSummary {
    pub name: String,
    pub params: Vec<ParamSummary>,
    pub required: Vec<String>,
}

/// Serialisable view of one [`Param`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamSummary {
    pub name: String,
    pub position: usize,
    pub required: bool,
    pub expected: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nested: Option<SchemaSummary>,
}

/// Compile a contract, rejecting a missing spec or label.
///
/// # Errors
///
/// Returns `EnforceError::Configuration` if either input is `None`, the
/// self-check fails, or any descriptor is invalid.
pub fn compile(spec: Option<&ParamSpec>, label: Option<&str>) -> EnforceResult<Schema> {
    let label = label.ok_or_else(|| {
        EnforceError::configuration(format!(
            "{SELF_CHECK_LABEL} \"name\" cannot be null, did you mean empty string instead?"
        ))
    })?;
    let spec = spec.ok_or_else(|| {
        EnforceError::configuration(format!("{SELF_CHECK_LABEL} \"parameters\" cannot be null"))
    })?;
    self_check(&[Arg::from(spec.to_bag()), Arg::from(label)])?;
    build(spec, label, 0)
}

/// Compile a contract from dynamic values, as read from a document or
/// supplied by untyped callers.
///
/// Trailing unset arguments are treated as omitted, so an unset label is
/// reported as a missing required argument of the self-check contract.
///
/// # Errors
///
/// Returns `EnforceError::Configuration` for a null or wrongly typed
/// spec/label and for any invalid descriptor.
pub fn compile_dynamic(spec: &Arg, label: &Arg) -> EnforceResult<Schema> {
    if label.is_null() {
        return Err(EnforceError::configuration(format!(
            "{SELF_CHECK_LABEL} \"name\" cannot be null, did you mean empty string instead?"
        )));
    }
    if spec.is_null() {
        return Err(EnforceError::configuration(format!(
            "{SELF_CHECK_LABEL} \"parameters\" cannot be null"
        )));
    }
    let mut args = vec![spec.clone(), label.clone()];
    while args.last().is_some_and(Arg::is_absent) {
        args.pop();
    }
    self_check(&args)?;

    let (Some(bag), Some(enforce_core::Value::String(label))) = (spec.as_bag(), label.as_value())
    else {
        return Err(EnforceError::configuration(format!(
            "{SELF_CHECK_LABEL} expects a parameter object and a string name"
        )));
    };
    build(&ParamSpec::from_bag(bag)?, label, 0)
}

fn self_check(args: &[Arg]) -> EnforceResult<()> {
    let contract = ParamSpec::new()
        .param("parameters", "!object")
        .param("name", "!string");
    let schema = build(&contract, SELF_CHECK_LABEL, 0)?;
    schema
        .validate_positional(args)
        .map_err(|e| EnforceError::configuration(e.to_string()))
}

fn build(spec: &ParamSpec, label: &str, depth: usize) -> EnforceResult<Schema> {
    let mut params = Vec::with_capacity(spec.len());
    let mut index = HashMap::with_capacity(spec.len());
    let mut required = Vec::new();

    for (idx, (name, descriptor)) in spec.iter().enumerate() {
        if index.insert(name.to_string(), idx).is_some() {
            return Err(EnforceError::configuration(format!(
                "parameter \"{name}\" is declared more than once in {label}"
            )));
        }

        let (expected, is_required) = match descriptor {
            Descriptor::Tag(tag) => {
                let (is_required, bare) = match tag.strip_prefix(REQUIRED_MARKER) {
                    Some(rest) => (true, rest),
                    None => (false, tag.as_str()),
                };
                let tag_lower = bare.to_lowercase();
                let expected = match PrimitiveTag::parse(&tag_lower) {
                    Some(PrimitiveTag::Any) => ExpectedType::Wildcard,
                    Some(prim) => ExpectedType::Primitive(prim),
                    None => {
                        return Err(EnforceError::configuration(format!(
                            "unknown type \"{tag}\" for parameter \"{name}\" in {label}"
                        )))
                    }
                };
                (expected, is_required)
            }
            Descriptor::Class(class) => (ExpectedType::Class(class.clone()), false),
            // Below the first level a nested spec is only checked as an object.
            Descriptor::Nested(_) if depth > 0 => {
                (ExpectedType::Primitive(PrimitiveTag::Object), false)
            }
            Descriptor::Nested(nested) => {
                let nested_label = format!("{label} destructured arg #{idx}");
                let schema = build(nested, &nested_label, depth + 1)?;
                (ExpectedType::Hybrid(Box::new(schema)), false)
            }
        };

        if is_required {
            required.push(name.to_string());
        }
        params.push(Param {
            name: name.to_string(),
            expected,
            required: is_required,
        });
    }

    tracing::debug!(
        contract = %label,
        params = params.len(),
        required = required.len(),
        "compiled contract"
    );

    Ok(Schema {
        name: label.to_string(),
        params,
        index,
        required,
    })
}
