//! # Value Model Tests
//!
//! Classification of call-time values and class hierarchies as seen by the
//! validator: type tags, constructor names, and instance-of checks.

use enforce_core::{Arg, Bag, ClassRef, ClassRegistry, ErrorKind, Instance, PrimitiveTag, Value};

fn tag(arg: Arg) -> PrimitiveTag {
    arg.as_value().map(Value::type_tag).unwrap()
}

#[test]
fn containers_and_instances_classify_as_object() {
    let date = ClassRef::new("Date");
    assert_eq!(tag(Arg::from(Vec::<Arg>::new())), PrimitiveTag::Object);
    assert_eq!(tag(Arg::from(Bag::new())), PrimitiveTag::Object);
    assert_eq!(tag(Arg::from(Instance::new(&date))), PrimitiveTag::Object);
    assert_eq!(tag(Arg::from(&date)), PrimitiveTag::Function);
}

#[test]
fn scalars_classify_by_kind() {
    assert_eq!(tag(Arg::from(true)), PrimitiveTag::Boolean);
    assert_eq!(tag(Arg::from(1.5)), PrimitiveTag::Number);
    assert_eq!(tag(Arg::from("x")), PrimitiveTag::String);
}

#[test]
fn constructor_names_follow_value_kind() {
    let date = ClassRef::new("Date");
    let names: Vec<String> = [
        Arg::from(1),
        Arg::from("s"),
        Arg::from(Vec::<Arg>::new()),
        Arg::from(Bag::new()),
        Arg::from(Instance::new(&date)),
    ]
    .iter()
    .filter_map(Arg::as_value)
    .map(|v| v.constructor_name().to_string())
    .collect();
    assert_eq!(names, vec!["Number", "String", "Array", "Object", "Date"]);
}

#[test]
fn registry_builds_hierarchy_in_declaration_order() {
    let mut registry = ClassRegistry::new();
    let date = registry.define("Date", None).unwrap();
    let stamp = registry.define("Timestamp", Some("Date")).unwrap();
    let utc = registry.define("UtcTimestamp", Some("Timestamp")).unwrap();

    let instance = Instance::new(&utc);
    assert!(instance.is_instance_of(&stamp));
    assert!(instance.is_instance_of(&date));
    assert!(!Instance::new(&date).is_instance_of(&utc));

    let err = registry.define("Orphan", Some("Missing")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn same_named_classes_are_distinct() {
    let a = ClassRef::new("Date");
    let b = ClassRef::new("Date");
    assert_ne!(a, b);
    assert!(!Instance::new(&a).is_instance_of(&b));
}

#[test]
fn absent_and_null_take_defaults_differently() {
    assert_eq!(Arg::Absent.or(3), Arg::from(3));
    assert_eq!(Arg::Null.or(3), Arg::Null);
    assert!(Arg::Absent.is_absent());
    assert!(Arg::from(None::<i32>).is_null());
}
