//! # Argument Validation
//!
//! Checks a call-time payload against a compiled [`Schema`]. Three calling
//! conventions are supported; each normalizes its payload into one
//! name → [`Arg`] bag and then runs the shared pipeline.
//!
//! ```text
//! named       fragments ─ union of keys ─┐
//! positional  values ─ zip with params ──┼─► required ─► types ─► extra ─► (arity)
//! hybrid      positional, then each destructured position as named
//! ```
//!
//! | convention | undefined check | extra-key check | arity |
//! |------------|-----------------|-----------------|-------|
//! | named      | yes             | yes             | no    |
//! | positional | no              | no              | yes   |
//!
//! ## Failure policy
//!
//! Fail-fast. The first violation is returned; only the required-presence
//! and extra-key checks aggregate every offending name into one error.
//! Validation has no side effects except reporting the failure to an
//! optional [`ValidationSink`].

use std::fmt;

use serde::{Deserialize, Serialize};

use enforce_core::{Arg, Bag, EnforceError, EnforceResult, PrimitiveTag, Value};

use crate::compile::{ExpectedType, Param, Schema};
use crate::sink::{ValidationEvent, ValidationSink};

/// How the arguments of a call were passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Convention {
    Named,
    Positional,
    Hybrid,
}

impl Convention {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Named => "named",
            Self::Positional => "positional",
            Self::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for Convention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validator bound to one schema, optionally reporting failures to a sink.
#[derive(Clone, Copy)]
pub struct ArgumentValidator<'a> {
    schema: &'a Schema,
    sink: Option<&'a dyn ValidationSink>,
}

impl fmt::Debug for ArgumentValidator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgumentValidator")
            .field("schema", &self.schema.name())
            .field("sink", &self.sink.is_some())
            .finish()
    }
}

impl<'a> ArgumentValidator<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self { schema, sink: None }
    }

    /// Report every failure to `sink` before returning it.
    pub fn with_sink(mut self, sink: &'a dyn ValidationSink) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    /// Dispatch on `convention`.
    pub fn validate(&self, convention: Convention, args: &[Arg]) -> EnforceResult<()> {
        match convention {
            Convention::Named => self.validate_named(args),
            Convention::Positional => self.validate_positional(args),
            Convention::Hybrid => self.validate_hybrid(args),
        }
    }

    /// Validate arguments passed as one or more bags of named values.
    ///
    /// Keys of all fragments are merged (later fragments win). Unset and null
    /// fragments contribute nothing.
    ///
    /// # Errors
    ///
    /// `MissingRequired`, `UndefinedValue`, `TypeMismatch`, or
    /// `UnexpectedParameter`; a fragment that is not a bag is a `TypeMismatch`.
    pub fn validate_named(&self, fragments: &[Arg]) -> EnforceResult<()> {
        self.observe(Convention::Named, fragments.len(), named(self.schema, fragments))
    }

    /// Validate arguments passed in declaration order.
    ///
    /// # Errors
    ///
    /// `MissingRequired` or `TypeMismatch` for the supplied prefix, then
    /// `Arity` if more values were supplied than parameters declared.
    pub fn validate_positional(&self, args: &[Arg]) -> EnforceResult<()> {
        self.observe(Convention::Positional, args.len(), positional(self.schema, args))
    }

    /// Validate positional arguments where some positions are destructured bags.
    ///
    /// The flat pass treats destructured positions as opaque. Each one is then
    /// validated as a named payload against its nested schema, whose label
    /// identifies the position.
    pub fn validate_hybrid(&self, args: &[Arg]) -> EnforceResult<()> {
        self.observe(Convention::Hybrid, args.len(), hybrid(self.schema, args))
    }

    fn observe(
        &self,
        convention: Convention,
        arg_count: usize,
        result: EnforceResult<()>,
    ) -> EnforceResult<()> {
        tracing::trace!(
            contract = %self.schema.name(),
            %convention,
            args = arg_count,
            ok = result.is_ok(),
            "validated arguments"
        );
        if let (Err(error), Some(sink)) = (&result, self.sink) {
            sink.record(&ValidationEvent {
                contract: self.schema.name(),
                convention,
                error,
            });
        }
        result
    }
}

fn named(schema: &Schema, fragments: &[Arg]) -> EnforceResult<()> {
    let mut supplied = Bag::new();
    for (idx, fragment) in fragments.iter().enumerate() {
        match fragment {
            Arg::Absent | Arg::Null => {}
            Arg::Value(Value::Object(bag)) => supplied.merge(bag),
            Arg::Value(other) => {
                return Err(EnforceError::TypeMismatch {
                    contract: schema.name().to_string(),
                    param: format!("#{idx}"),
                    expected: "object of named arguments".to_string(),
                    actual: other.to_string(),
                })
            }
        }
    }
    check(schema, &supplied, true, true)
}

fn positional(schema: &Schema, args: &[Arg]) -> EnforceResult<()> {
    let supplied: Bag = schema
        .params()
        .iter()
        .zip(args)
        .map(|(param, arg)| (param.name(), arg.clone()))
        .collect();

    // Undefined slots pass through and extra keys cannot exist here; arity
    // covers over-supply instead.
    check(schema, &supplied, false, false)?;

    if args.len() > schema.len() {
        return Err(EnforceError::Arity {
            contract: schema.name().to_string(),
            received: args.len(),
            expected: schema.len(),
        });
    }
    Ok(())
}

fn hybrid(schema: &Schema, args: &[Arg]) -> EnforceResult<()> {
    positional(schema, args)?;

    for (idx, nested) in schema.hybrid_sub_schemas() {
        let fragment = match args.get(idx) {
            None | Some(Arg::Absent) | Some(Arg::Null) => Arg::from(Bag::new()),
            Some(arg @ Arg::Value(Value::Object(_))) => arg.clone(),
            Some(Arg::Value(other)) => {
                return Err(EnforceError::TypeMismatch {
                    contract: nested.name().to_string(),
                    param: schema.params()[idx].name().to_string(),
                    expected: "destructured object".to_string(),
                    actual: other.to_string(),
                })
            }
        };
        named(nested, std::slice::from_ref(&fragment))?;
    }
    Ok(())
}

fn check(
    schema: &Schema,
    supplied: &Bag,
    check_undefined: bool,
    check_extra: bool,
) -> EnforceResult<()> {
    let missing: Vec<String> = schema
        .required()
        .iter()
        .filter(|name| !supplied.contains_key(name))
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(EnforceError::MissingRequired {
            contract: schema.name().to_string(),
            missing,
        });
    }

    for param in schema.params() {
        let Some(arg) = supplied.get(param.name()) else {
            continue;
        };
        match arg {
            // Null satisfies every declared type.
            Arg::Null => continue,
            Arg::Absent => {
                if check_undefined {
                    return Err(EnforceError::UndefinedValue {
                        contract: schema.name().to_string(),
                        param: param.name().to_string(),
                    });
                }
            }
            Arg::Value(value) => check_type(schema, param, value)?,
        }
    }

    if check_extra {
        let extra: Vec<String> = supplied
            .keys()
            .filter(|key| schema.position(key).is_none())
            .map(str::to_string)
            .collect();
        if !extra.is_empty() {
            return Err(EnforceError::UnexpectedParameter {
                contract: schema.name().to_string(),
                extra,
            });
        }
    }
    Ok(())
}

fn check_type(schema: &Schema, param: &Param, value: &Value) -> EnforceResult<()> {
    let (matches, actual) = match param.expected() {
        ExpectedType::Wildcard | ExpectedType::Hybrid(_) => return Ok(()),
        ExpectedType::Primitive(PrimitiveTag::Any) => return Ok(()),
        ExpectedType::Class(class) => (
            matches!(value, Value::Instance(inst) if inst.is_instance_of(class)),
            value.constructor_name().to_string(),
        ),
        // Arrays classify as objects, so the array tag is checked by shape.
        ExpectedType::Primitive(PrimitiveTag::Array) => {
            (value.is_array(), value.type_tag().to_string())
        }
        ExpectedType::Primitive(tag) => (value.type_tag() == *tag, value.to_string()),
    };
    if matches {
        return Ok(());
    }
    Err(EnforceError::TypeMismatch {
        contract: schema.name().to_string(),
        param: param.name().to_string(),
        expected: param.expected().describe(),
        actual,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::ParamSpec;
    use enforce_core::{ClassRef, ErrorKind, Instance};

    fn f_schema() -> Schema {
        Schema::compile(
            &ParamSpec::new().param("a", "!string").param("b", "number"),
            "F",
        )
        .unwrap()
    }

    #[test]
    fn positional_prefix_with_optional_omitted_passes() {
        f_schema().validate_positional(&[Arg::from("x")]).unwrap();
    }

    #[test]
    fn positional_over_supply_is_arity_error() {
        let err = f_schema()
            .validate_positional(&[Arg::from("x"), Arg::from(1), Arg::from(2)])
            .unwrap_err();
        assert_eq!(
            err,
            EnforceError::Arity {
                contract: "F".to_string(),
                received: 3,
                expected: 2,
            }
        );
    }

    #[test]
    fn type_errors_win_over_arity_in_positional() {
        let err = f_schema()
            .validate_positional(&[Arg::from(1), Arg::from(1), Arg::from(2)])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn named_mismatch_names_the_field() {
        let err = f_schema()
            .validate_named(&[Arg::from(Bag::new().with("a", "x").with("b", "y"))])
            .unwrap_err();
        match err {
            EnforceError::TypeMismatch {
                contract,
                param,
                expected,
                actual,
            } => {
                assert_eq!(contract, "F");
                assert_eq!(param, "b");
                assert_eq!(expected, "number");
                assert_eq!(actual, "\"y\"");
            }
            other => panic!("expected TypeMismatch, got {other}"),
        }
    }

    #[test]
    fn named_fragments_are_merged() {
        f_schema()
            .validate_named(&[
                Arg::from(Bag::new().with("a", "x")),
                Arg::from(Bag::new().with("b", 2)),
            ])
            .unwrap();
    }

    #[test]
    fn named_rejects_non_bag_fragment() {
        let err = f_schema().validate_named(&[Arg::from(3)]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert!(err.to_string().contains("#0"));
    }

    #[test]
    fn absent_named_field_is_undefined_error_but_positional_skips_it() {
        let schema = f_schema();
        let err = schema
            .validate_named(&[Arg::from(Bag::new().with("a", "x").with("b", Arg::Absent))])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UndefinedValue);

        schema
            .validate_positional(&[Arg::from("x"), Arg::Absent])
            .unwrap();
    }

    #[test]
    fn null_required_value_passes_but_missing_key_does_not() {
        let schema = f_schema();
        schema.validate_named(&[Arg::from(Bag::new().with("a", Arg::Null))]).unwrap();
        let err = schema.validate_named(&[Arg::from(Bag::new())]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequired);
    }

    #[test]
    fn array_tag_checks_shape_and_object_accepts_arrays() {
        let schema = Schema::compile(
            &ParamSpec::new().param("list", "array").param("obj", "object"),
            "A",
        )
        .unwrap();
        schema
            .validate_positional(&[Arg::from(vec![Arg::from(1)]), Arg::from(Vec::<Arg>::new())])
            .unwrap();
        let err = schema
            .validate_positional(&[Arg::from(Bag::new())])
            .unwrap_err();
        assert!(err.to_string().contains("expected array but got object"), "{err}");
    }

    #[test]
    fn class_mismatch_reports_constructor_name() {
        let date = ClassRef::new("Date");
        let schema = Schema::compile(&ParamSpec::new().param("a", &date), "E").unwrap();
        schema
            .validate_positional(&[Arg::from(Instance::new(&date))])
            .unwrap();
        let err = schema.validate_positional(&[Arg::from("a")]).unwrap_err();
        assert!(err.to_string().contains("instance of class Date"), "{err}");
        assert!(err.to_string().contains("got String"), "{err}");
    }

    #[test]
    fn convention_dispatch_matches_direct_calls() {
        let schema = f_schema();
        let validator = schema.validator();
        let args = [Arg::from("x"), Arg::from(1), Arg::from(2)];
        assert_eq!(
            validator.validate(Convention::Positional, &args),
            validator.validate_positional(&args)
        );
        assert_eq!(Convention::Hybrid.to_string(), "hybrid");
    }
}
