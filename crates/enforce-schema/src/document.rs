//! # Contract Documents
//!
//! Loads contracts declared in YAML (JSON is accepted as a YAML subset) and
//! converts JSON argument payloads into call-time values.
//!
//! ```yaml
//! classes:
//!   Date: ~
//!   Timestamp: Date          # extends Date; parents must be declared first
//! contracts:
//!   F:
//!     id: "!number"
//!     obj:                   # nested mapping → destructured (hybrid) bag
//!       date: { $class: Date }
//! ```
//!
//! YAML mapping order is preserved, so the order parameters are written in
//! is their positional order. In a contract, `{ $class: Name }` is a class
//! reference. In a payload, an object with a `$class` key is an instance of
//! that class carrying the remaining keys as fields.

use std::path::{Path, PathBuf};

use thiserror::Error;

use enforce_core::{Arg, Bag, ClassRegistry, EnforceError, EnforceResult, Instance, Value};

use crate::compile::{compile_dynamic, Schema};

/// Key marking a mapping as a class reference or class instance.
pub const CLASS_KEY: &str = "$class";

/// Error while loading a contract document or payload.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The document file could not be read.
    #[error("cannot read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid YAML.
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The payload is not valid JSON.
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    /// The document parsed but declares an invalid contract or class.
    #[error(transparent)]
    Contract(#[from] EnforceError),
}

/// A set of compiled contracts and the classes they refer to.
#[derive(Debug, Clone, Default)]
pub struct ContractDocument {
    classes: ClassRegistry,
    contracts: Vec<Schema>,
}

impl ContractDocument {
    /// Read and compile the document at `path`.
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let content = std::fs::read_to_string(path).map_err(|source| DocumentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let document = Self::from_yaml_str(&content)?;
        tracing::debug!(
            path = %path.display(),
            contracts = document.contracts.len(),
            classes = document.classes.len(),
            "loaded contract document"
        );
        Ok(document)
    }

    /// Parse and compile a document held in memory.
    pub fn from_yaml_str(content: &str) -> Result<Self, DocumentError> {
        let root: serde_yaml::Value = serde_yaml::from_str(content)?;
        let root = match root {
            serde_yaml::Value::Mapping(map) => map,
            serde_yaml::Value::Null => serde_yaml::Mapping::new(),
            _ => {
                return Err(EnforceError::configuration(
                    "contract document must be a mapping with `classes` and `contracts`",
                )
                .into())
            }
        };

        let mut classes = ClassRegistry::new();
        if let Some(declared) = root.get("classes") {
            let declared = as_mapping(declared, "classes")?;
            for (name, parent) in declared {
                let name = key_str(name)?;
                let parent = match parent {
                    serde_yaml::Value::Null => None,
                    serde_yaml::Value::String(p) => Some(p.as_str()),
                    _ => {
                        return Err(EnforceError::configuration(format!(
                            "parent of class \"{name}\" must be a class name or null"
                        ))
                        .into())
                    }
                };
                classes.define(name, parent)?;
            }
        }

        let mut contracts = Vec::new();
        if let Some(declared) = root.get("contracts") {
            let declared = as_mapping(declared, "contracts")?;
            for (label, spec) in declared {
                let label = key_str(label)?;
                let spec = yaml_to_spec_arg(spec, &classes)?;
                contracts.push(compile_dynamic(&spec, &Arg::from(label))?);
            }
        }

        Ok(Self { classes, contracts })
    }

    pub fn classes(&self) -> &ClassRegistry {
        &self.classes
    }

    /// The contract labelled `name`.
    pub fn contract(&self, name: &str) -> Option<&Schema> {
        self.contracts.iter().find(|s| s.name() == name)
    }

    /// Contracts in document order.
    pub fn contracts(&self) -> impl Iterator<Item = &Schema> {
        self.contracts.iter()
    }

    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }

    /// Parse a JSON argument list, resolving `$class` instances against this
    /// document's classes. A bare (non-array) JSON value is one argument.
    pub fn parse_args(&self, json: &str) -> Result<Vec<Arg>, DocumentError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let args = match value {
            serde_json::Value::Array(items) => items
                .iter()
                .map(|item| json_to_arg(item, &self.classes))
                .collect::<EnforceResult<Vec<_>>>()?,
            other => vec![json_to_arg(&other, &self.classes)?],
        };
        Ok(args)
    }
}

/// Convert a JSON value into a call-time argument.
///
/// # Errors
///
/// Returns `EnforceError::Configuration` for a `$class` naming an unknown
/// class or a non-string `$class`.
pub fn json_to_arg(json: &serde_json::Value, classes: &ClassRegistry) -> EnforceResult<Arg> {
    Ok(match json {
        serde_json::Value::Null => Arg::Null,
        serde_json::Value::Bool(b) => Arg::from(*b),
        serde_json::Value::Number(n) => n
            .as_f64()
            .map(Arg::from)
            .ok_or_else(|| EnforceError::configuration(format!("unsupported number {n}")))?,
        serde_json::Value::String(s) => Arg::from(s.as_str()),
        serde_json::Value::Array(items) => Arg::from(
            items
                .iter()
                .map(|item| json_to_arg(item, classes))
                .collect::<EnforceResult<Vec<_>>>()?,
        ),
        serde_json::Value::Object(map) => {
            let mut fields = Bag::new();
            let mut class = None;
            for (key, value) in map {
                if key == CLASS_KEY {
                    let name = value.as_str().ok_or_else(|| {
                        EnforceError::configuration(format!("{CLASS_KEY} must be a class name"))
                    })?;
                    class = Some(classes.resolve(name)?);
                } else {
                    fields.insert(key.as_str(), json_to_arg(value, classes)?);
                }
            }
            match class {
                Some(class) => Arg::from(Instance::with_fields(class, fields)),
                None => Arg::from(fields),
            }
        }
    })
}

/// Convert a contract's YAML spec into the dynamic form the compiler reads.
/// Here `{ $class: Name }` is a class reference and must stand alone.
fn yaml_to_spec_arg(yaml: &serde_yaml::Value, classes: &ClassRegistry) -> EnforceResult<Arg> {
    Ok(match yaml {
        serde_yaml::Value::Null => Arg::Null,
        serde_yaml::Value::Bool(b) => Arg::from(*b),
        serde_yaml::Value::Number(n) => n
            .as_f64()
            .map(Arg::from)
            .ok_or_else(|| EnforceError::configuration(format!("unsupported number {n}")))?,
        serde_yaml::Value::String(s) => Arg::from(s.as_str()),
        serde_yaml::Value::Sequence(items) => Arg::from(
            items
                .iter()
                .map(|item| yaml_to_spec_arg(item, classes))
                .collect::<EnforceResult<Vec<_>>>()?,
        ),
        serde_yaml::Value::Mapping(map) => {
            if let Some(name) = map.get(CLASS_KEY) {
                if map.len() != 1 {
                    return Err(EnforceError::configuration(format!(
                        "a {CLASS_KEY} reference must not carry other keys"
                    )));
                }
                let name = name.as_str().ok_or_else(|| {
                    EnforceError::configuration(format!("{CLASS_KEY} must be a class name"))
                })?;
                return Ok(Arg::from(Value::Class(classes.resolve(name)?.clone())));
            }
            let mut fields = Bag::new();
            for (key, value) in map {
                fields.insert(key_str(key)?, yaml_to_spec_arg(value, classes)?);
            }
            Arg::from(fields)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_spec_arg(&tagged.value, classes)?,
    })
}

fn as_mapping<'a>(
    value: &'a serde_yaml::Value,
    section: &str,
) -> EnforceResult<&'a serde_yaml::Mapping> {
    value
        .as_mapping()
        .ok_or_else(|| EnforceError::configuration(format!("`{section}` must be a mapping")))
}

fn key_str(key: &serde_yaml::Value) -> EnforceResult<&str> {
    key.as_str()
        .ok_or_else(|| EnforceError::configuration(format!("mapping keys must be strings, got {key:?}")))
}
