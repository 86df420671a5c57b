//! # Call-Time Values
//!
//! The value model handed to the validator. A parameter slot is an [`Arg`]
//! with three states:
//!
//! ```text
//! Arg::Absent        present but unset (the "undefined" sentinel)
//! Arg::Null          explicitly null
//! Arg::Value(Value)  an actual value
//! ```
//!
//! A name missing from a [`Bag`] is a fourth, distinct situation: the key was
//! never supplied. Collapsing any two of these would change validation
//! results, so the distinction is kept in the type.
//!
//! [`Value::type_tag`] classifies a value the way dynamic runtime type
//! inspection does: arrays, bags, and instances all classify as `object`,
//! which is why `array` is checked separately by shape.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::class::{ClassRef, Instance};

/// A primitive type tag a parameter may be declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveTag {
    String,
    Number,
    Boolean,
    Object,
    Array,
    Function,
    Any,
}

impl PrimitiveTag {
    /// Parse an already-lowercased tag.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "string" => Some(Self::String),
            "number" => Some(Self::Number),
            "boolean" => Some(Self::Boolean),
            "object" => Some(Self::Object),
            "array" => Some(Self::Array),
            "function" => Some(Self::Function),
            "any" => Some(Self::Any),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
            Self::Function => "function",
            Self::Any => "any",
        }
    }
}

impl fmt::Display for PrimitiveTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One argument slot.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Arg {
    /// Present but unset.
    #[default]
    Absent,
    /// Explicitly null.
    Null,
    Value(Value),
}

impl Arg {
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }

    /// The bag held by this slot, if it holds one.
    pub fn as_bag(&self) -> Option<&Bag> {
        match self {
            Self::Value(Value::Object(bag)) => Some(bag),
            _ => None,
        }
    }

    /// Substitute `default` when the slot is unset, as a default parameter would.
    pub fn or(self, default: impl Into<Arg>) -> Arg {
        match self {
            Self::Absent => default.into(),
            other => other,
        }
    }

    /// Substitute a lazily computed default when the slot is unset.
    ///
    /// Pairs with a schema's `req()` to make an omitted required argument fail.
    pub fn or_else<E>(self, default: impl FnOnce() -> Result<Arg, E>) -> Result<Arg, E> {
        match self {
            Self::Absent => default(),
            other => Ok(other),
        }
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => f.write_str("undefined"),
            Self::Null => f.write_str("null"),
            Self::Value(v) => fmt::Display::fmt(v, f),
        }
    }
}

/// A non-null, non-undefined value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Arg>),
    Object(Bag),
    Instance(Instance),
    /// A class passed as a value.
    Class(ClassRef),
}

impl Value {
    /// Runtime primitive classification. Never returns `Array` or `Any`.
    pub fn type_tag(&self) -> PrimitiveTag {
        match self {
            Self::Bool(_) => PrimitiveTag::Boolean,
            Self::Number(_) => PrimitiveTag::Number,
            Self::String(_) => PrimitiveTag::String,
            Self::Array(_) | Self::Object(_) | Self::Instance(_) => PrimitiveTag::Object,
            Self::Class(_) => PrimitiveTag::Function,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// Name of the constructor that produced this value.
    pub fn constructor_name(&self) -> &str {
        match self {
            Self::Bool(_) => "Boolean",
            Self::Number(_) => "Number",
            Self::String(_) => "String",
            Self::Array(_) => "Array",
            Self::Object(_) => "Object",
            Self::Instance(inst) => inst.class().name(),
            Self::Class(_) => "Function",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => {
                if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{n}")
                }
            }
            Self::String(s) => write!(f, "{s:?}"),
            Self::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Object(bag) => fmt::Display::fmt(bag, f),
            Self::Instance(inst) => write!(f, "{} {}", inst.class().name(), inst.fields()),
            Self::Class(class) => write!(f, "class {}", class.name()),
        }
    }
}

/// An insertion-ordered name → [`Arg`] map with unique keys.
///
/// Order is significant: a bag used as a parameter spec defines positional
/// order, and extra-key reports list keys in the order supplied.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Bag {
    entries: Vec<(String, Arg)>,
}

impl Bag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Bag::insert`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Arg>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or overwrite `name`. An overwritten key keeps its original position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Arg>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Copy every entry of `other` into `self`; later keys win.
    pub fn merge(&mut self, other: &Bag) {
        for (name, value) in &other.entries {
            self.insert(name.clone(), value.clone());
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arg> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arg)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for Bag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (k, v)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, " {k}: {v}")?;
        }
        if self.entries.is_empty() {
            f.write_str("}")
        } else {
            f.write_str(" }")
        }
    }
}

impl<K: Into<String>, V: Into<Arg>> FromIterator<(K, V)> for Bag {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bag = Bag::new();
        for (k, v) in iter {
            bag.insert(k, v);
        }
        bag
    }
}

// ─── Conversions ────────────────────────────────────────────────────

impl From<Value> for Arg {
    fn from(v: Value) -> Self {
        Arg::Value(v)
    }
}

impl<T: Into<Arg>> From<Option<T>> for Arg {
    fn from(v: Option<T>) -> Self {
        v.map_or(Arg::Null, Into::into)
    }
}

impl From<bool> for Arg {
    fn from(b: bool) -> Self {
        Arg::Value(Value::Bool(b))
    }
}

impl From<f64> for Arg {
    fn from(n: f64) -> Self {
        Arg::Value(Value::Number(n))
    }
}

impl From<i32> for Arg {
    fn from(n: i32) -> Self {
        Arg::Value(Value::Number(f64::from(n)))
    }
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Arg::Value(Value::String(s.to_string()))
    }
}

impl From<String> for Arg {
    fn from(s: String) -> Self {
        Arg::Value(Value::String(s))
    }
}

impl From<Vec<Arg>> for Arg {
    fn from(items: Vec<Arg>) -> Self {
        Arg::Value(Value::Array(items))
    }
}

impl From<Bag> for Arg {
    fn from(bag: Bag) -> Self {
        Arg::Value(Value::Object(bag))
    }
}

impl From<Instance> for Arg {
    fn from(inst: Instance) -> Self {
        Arg::Value(Value::Instance(inst))
    }
}

impl From<ClassRef> for Arg {
    fn from(class: ClassRef) -> Self {
        Arg::Value(Value::Class(class))
    }
}

impl From<&ClassRef> for Arg {
    fn from(class: &ClassRef) -> Self {
        Arg::Value(Value::Class(class.clone()))
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn leaf() -> impl Strategy<Value = Value> {
        prop_oneof![
            any::<bool>().prop_map(Value::Bool),
            any::<i32>().prop_map(|n| Value::Number(f64::from(n))),
            "[a-z]{0,12}".prop_map(Value::String),
        ]
    }

    fn value() -> impl Strategy<Value = Value> {
        leaf().prop_recursive(3, 32, 6, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone().prop_map(Arg::Value), 0..6)
                    .prop_map(Value::Array),
                prop::collection::vec(("[a-z]{1,6}", inner), 0..6)
                    .prop_map(|pairs| Value::Object(pairs.into_iter().collect())),
            ]
        })
    }

    proptest! {
        /// Classification never reports the shape-only or wildcard tags.
        #[test]
        fn type_tag_is_never_array_or_any(v in value()) {
            let tag = v.type_tag();
            prop_assert_ne!(tag, PrimitiveTag::Array);
            prop_assert_ne!(tag, PrimitiveTag::Any);
        }

        /// Arrays are exactly the values that classify as object and are array-shaped.
        #[test]
        fn arrays_are_objects(v in value()) {
            if v.is_array() {
                prop_assert_eq!(v.type_tag(), PrimitiveTag::Object);
            }
        }
    }
}
