//! Property tests for validation outcomes and schema sharing.

use enforce_core::{Arg, Bag, EnforceError, ErrorKind};
use enforce_schema::{ParamSpec, Schema};
use proptest::prelude::*;

/// Five string parameters `p0..p4`, each required when its flag is set.
fn string_schema(required: &[bool]) -> Schema {
    let spec = required
        .iter()
        .enumerate()
        .fold(ParamSpec::new(), |spec, (i, req)| {
            let tag = if *req { "!string" } else { "string" };
            spec.param(format!("p{i}"), tag)
        });
    Schema::compile(&spec, "P").unwrap()
}

fn arb_arg() -> impl Strategy<Value = Arg> {
    prop_oneof![
        Just(Arg::Absent),
        Just(Arg::Null),
        any::<bool>().prop_map(Arg::from),
        (-1000i32..1000).prop_map(Arg::from),
        "[a-z]{0,6}".prop_map(Arg::from),
    ]
}

proptest! {
    #[test]
    fn validation_is_deterministic(
        required in proptest::collection::vec(any::<bool>(), 5),
        args in proptest::collection::vec(arb_arg(), 0..8),
    ) {
        let schema = string_schema(&required);
        prop_assert_eq!(schema.validate_positional(&args), schema.validate_positional(&args));
        let bag: Bag = args
            .iter()
            .enumerate()
            .map(|(i, a)| (format!("p{i}"), a.clone()))
            .collect();
        let named = [Arg::from(bag)];
        prop_assert_eq!(schema.validate_named(&named), schema.validate_named(&named));
    }

    #[test]
    fn missing_required_lists_exactly_the_missing_names(
        required in proptest::collection::vec(any::<bool>(), 5),
        supplied in proptest::collection::vec(any::<bool>(), 5),
    ) {
        let schema = string_schema(&required);
        let bag: Bag = supplied
            .iter()
            .enumerate()
            .filter(|(_, s)| **s)
            .map(|(i, _)| (format!("p{i}"), Arg::from("x")))
            .collect();
        let expected: Vec<String> = required
            .iter()
            .zip(&supplied)
            .enumerate()
            .filter(|(_, (r, s))| **r && !**s)
            .map(|(i, _)| format!("p{i}"))
            .collect();

        let result = schema.validate_named(&[Arg::from(bag)]);
        if expected.is_empty() {
            prop_assert!(result.is_ok());
        } else {
            prop_assert_eq!(
                result,
                Err(EnforceError::MissingRequired { contract: "P".to_string(), missing: expected })
            );
        }
    }

    #[test]
    fn oversupplied_positional_call_is_arity_error(extra in 1usize..5) {
        let schema = string_schema(&[false; 5]);
        let args: Vec<Arg> = (0..5 + extra).map(|_| Arg::from("x")).collect();
        prop_assert_eq!(
            schema.validate_positional(&args),
            Err(EnforceError::Arity { contract: "P".to_string(), received: 5 + extra, expected: 5 })
        );
    }

    #[test]
    fn undeclared_named_keys_are_reported(key in "[q-z][a-z]{0,5}") {
        let schema = string_schema(&[false; 5]);
        let err = schema
            .validate_named(&[Arg::from(Bag::new().with(key.as_str(), 1))])
            .unwrap_err();
        prop_assert_eq!(
            err,
            EnforceError::UnexpectedParameter { contract: "P".to_string(), extra: vec![key] }
        );
    }

    #[test]
    fn null_satisfies_any_declared_tag(
        tag in prop_oneof![
            Just("string"), Just("number"), Just("boolean"),
            Just("object"), Just("array"), Just("function"),
        ],
    ) {
        let schema = Schema::compile(&ParamSpec::new().param("a", format!("!{tag}")), "N").unwrap();
        prop_assert!(schema.validate_positional(&[Arg::Null]).is_ok());
        prop_assert!(schema
            .validate_named(&[Arg::from(Bag::new().with("a", Arg::Null))])
            .is_ok());
    }
}

#[test]
fn compiled_schema_is_shared_across_threads() {
    let schema = string_schema(&[true, false, false, false, false]);
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let schema = &schema;
                scope.spawn(move || {
                    if i % 2 == 0 {
                        schema.validate_positional(&[Arg::from("ok")])
                    } else {
                        schema.validate_positional(&[Arg::from(i)])
                    }
                })
            })
            .collect();
        for (i, handle) in handles.into_iter().enumerate() {
            let result = handle.join().unwrap();
            if i % 2 == 0 {
                assert!(result.is_ok());
            } else {
                assert_eq!(result.unwrap_err().kind(), ErrorKind::TypeMismatch);
            }
        }
    });
}
