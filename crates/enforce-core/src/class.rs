//! # Nominal Classes
//!
//! A [`ClassRef`] is a nominal class identity. Two references are the same
//! class only if they point at the same definition; equal names are not
//! enough. Classes may extend one parent, and instance-of checks walk the
//! parent chain, so an instance of a subclass satisfies its ancestors.
//!
//! [`ClassRegistry`] resolves class names for contracts and payloads loaded
//! from documents, where classes can only be referred to by name.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{EnforceError, EnforceResult};
use crate::value::Bag;

#[derive(Debug)]
struct ClassDef {
    name: String,
    parent: Option<ClassRef>,
}

/// Shared handle to a class definition. Cloning is cheap.
#[derive(Clone)]
pub struct ClassRef(Arc<ClassDef>);

impl ClassRef {
    /// Define a new root class.
    pub fn new(name: impl Into<String>) -> Self {
        Self(Arc::new(ClassDef {
            name: name.into(),
            parent: None,
        }))
    }

    /// Define a new class extending `parent`.
    pub fn extending(name: impl Into<String>, parent: &ClassRef) -> Self {
        Self(Arc::new(ClassDef {
            name: name.into(),
            parent: Some(parent.clone()),
        }))
    }

    /// The display name of the class.
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// The direct parent, if the class extends one.
    pub fn parent(&self) -> Option<&ClassRef> {
        self.0.parent.as_ref()
    }

    /// Whether `self` is `other` or one of its descendants.
    pub fn is_subclass_of(&self, other: &ClassRef) -> bool {
        let mut current = Some(self);
        while let Some(class) = current {
            if class == other {
                return true;
            }
            current = class.parent();
        }
        false
    }
}

impl PartialEq for ClassRef {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for ClassRef {}

impl fmt::Debug for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClassRef({})", self.name())
    }
}

impl fmt::Display for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An object constructed from a class.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    class: ClassRef,
    fields: Bag,
}

impl Instance {
    /// A field-less instance of `class`.
    pub fn new(class: &ClassRef) -> Self {
        Self {
            class: class.clone(),
            fields: Bag::new(),
        }
    }

    /// An instance of `class` carrying `fields`.
    pub fn with_fields(class: &ClassRef, fields: Bag) -> Self {
        Self {
            class: class.clone(),
            fields,
        }
    }

    pub fn class(&self) -> &ClassRef {
        &self.class
    }

    pub fn fields(&self) -> &Bag {
        &self.fields
    }

    /// Instance-of semantics: true for the instance's own class and every ancestor.
    pub fn is_instance_of(&self, class: &ClassRef) -> bool {
        self.class.is_subclass_of(class)
    }
}

/// Name → class lookup for document-sourced contracts and payloads.
#[derive(Debug, Clone, Default)]
pub struct ClassRegistry {
    classes: BTreeMap<String, ClassRef>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define `name`, optionally extending an already-defined `parent`.
    ///
    /// # Errors
    ///
    /// Returns `EnforceError::Configuration` if `name` is already defined or
    /// `parent` is unknown.
    pub fn define(&mut self, name: &str, parent: Option<&str>) -> EnforceResult<ClassRef> {
        if self.classes.contains_key(name) {
            return Err(EnforceError::configuration(format!(
                "class \"{name}\" is defined more than once"
            )));
        }
        let class = match parent {
            Some(parent) => ClassRef::extending(name, self.resolve(parent)?),
            None => ClassRef::new(name),
        };
        self.classes.insert(name.to_string(), class.clone());
        Ok(class)
    }

    /// Register an existing class handle under its own name.
    pub fn insert(&mut self, class: ClassRef) {
        self.classes.insert(class.name().to_string(), class);
    }

    pub fn get(&self, name: &str) -> Option<&ClassRef> {
        self.classes.get(name)
    }

    /// Look up `name`, failing with a configuration error when unknown.
    pub fn resolve(&self, name: &str) -> EnforceResult<&ClassRef> {
        self.classes
            .get(name)
            .ok_or_else(|| EnforceError::configuration(format!("unknown class \"{name}\"")))
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Defined class names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }
}
