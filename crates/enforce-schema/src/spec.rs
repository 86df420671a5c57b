//! # Parameter Specs
//!
//! The declarative input to the compiler: an insertion-ordered list of
//! `(name, descriptor)` pairs. Order defines which positional argument maps
//! to which name, so [`ParamSpec`] is an explicit list, never a hash map.
//!
//! A descriptor is one of:
//!
//! - a type tag string such as `"number"` or `"!string"` (leading `!` marks
//!   the parameter required),
//! - a class reference, checked with instance-of,
//! - a nested spec, marking the parameter as a destructured bag (hybrid).

use enforce_core::{Arg, Bag, ClassRef, EnforceError, EnforceResult, Value};

/// Declared type of one parameter, before compilation.
#[derive(Debug, Clone, PartialEq)]
pub enum Descriptor {
    Tag(String),
    Class(ClassRef),
    Nested(ParamSpec),
}

impl From<&str> for Descriptor {
    fn from(tag: &str) -> Self {
        Self::Tag(tag.to_string())
    }
}

impl From<String> for Descriptor {
    fn from(tag: String) -> Self {
        Self::Tag(tag)
    }
}

impl From<ClassRef> for Descriptor {
    fn from(class: ClassRef) -> Self {
        Self::Class(class)
    }
}

impl From<&ClassRef> for Descriptor {
    fn from(class: &ClassRef) -> Self {
        Self::Class(class.clone())
    }
}

impl From<ParamSpec> for Descriptor {
    fn from(spec: ParamSpec) -> Self {
        Self::Nested(spec)
    }
}

/// Ordered parameter declarations for one contract.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParamSpec {
    entries: Vec<(String, Descriptor)>,
}

impl ParamSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter. Re-declaring a name replaces its descriptor in place.
    pub fn param(mut self, name: impl Into<String>, descriptor: impl Into<Descriptor>) -> Self {
        let name = name.into();
        let descriptor = descriptor.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = descriptor,
            None => self.entries.push((name, descriptor)),
        }
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Descriptor)> {
        self.entries.iter().map(|(n, d)| (n.as_str(), d))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Read a spec out of a dynamic bag.
    ///
    /// # Errors
    ///
    /// Returns `EnforceError::Configuration` for any descriptor that is not a
    /// string, a class, or a nested bag.
    pub fn from_bag(bag: &Bag) -> EnforceResult<Self> {
        let mut spec = ParamSpec::new();
        for (name, arg) in bag.iter() {
            let descriptor = match arg {
                Arg::Value(Value::String(tag)) => Descriptor::Tag(tag.clone()),
                Arg::Value(Value::Class(class)) => Descriptor::Class(class.clone()),
                Arg::Value(Value::Object(nested)) => Descriptor::Nested(Self::from_bag(nested)?),
                other => {
                    let kind = other.as_value().map_or(
                        if other.is_null() { "object" } else { "undefined" },
                        |v| v.type_tag().as_str(),
                    );
                    return Err(EnforceError::configuration(format!(
                        "must use strings, classes, or objects to describe parameters, \
                         passed \"{other}\" of type \"{kind}\" for \"{name}\" instead"
                    )));
                }
            };
            spec = spec.param(name, descriptor);
        }
        Ok(spec)
    }

    /// Dynamic form of the spec, as handed to the compiler's self-check.
    pub fn to_bag(&self) -> Bag {
        self.iter()
            .map(|(name, descriptor)| {
                let arg = match descriptor {
                    Descriptor::Tag(tag) => Arg::from(tag.as_str()),
                    Descriptor::Class(class) => Arg::from(class),
                    Descriptor::Nested(nested) => Arg::from(nested.to_bag()),
                };
                (name, arg)
            })
            .collect()
    }
}
