use crate::core::FieldName;
use crate::core::field::FieldSpec;
use crate::core::value::{FieldKind, FieldValue};
use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("unknown field '{0}'")]
    UnknownField(String),
    #[error("field '{field}' holds {expected} values, got {actual}")]
    KindMismatch {
        field: String,
        expected: FieldKind,
        actual: FieldKind,
    },
    #[error("'{option}' is not an option of field '{field}'")]
    UnknownOption { field: String, option: String },
    #[error("field '{field}' is not on the current step '{step}'")]
    NotOnCurrentStep { field: String, step: String },
}

/// Field values keyed by name, in declaration order. Never validates.
#[derive(Debug, Clone, Default)]
pub struct FormStore {
    specs: IndexMap<FieldName, FieldSpec>,
    values: IndexMap<FieldName, FieldValue>,
}

impl FormStore {
    pub fn new(specs: impl IntoIterator<Item = FieldSpec>) -> Self {
        let specs: IndexMap<FieldName, FieldSpec> = specs
            .into_iter()
            .map(|spec| (spec.name.clone(), spec))
            .collect();
        let values = specs
            .iter()
            .map(|(name, spec)| (name.clone(), spec.default_value()))
            .collect();
        Self { specs, values }
    }

    pub fn spec(&self, name: &str) -> Option<&FieldSpec> {
        self.specs.get(name)
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn set(&mut self, name: &str, value: FieldValue) -> Result<(), FieldError> {
        let spec = self
            .specs
            .get(name)
            .ok_or_else(|| FieldError::UnknownField(name.to_string()))?;
        if spec.kind != value.kind() {
            return Err(FieldError::KindMismatch {
                field: name.to_string(),
                expected: spec.kind,
                actual: value.kind(),
            });
        }
        let unknown = match &value {
            FieldValue::SingleSelect(Some(option)) => {
                (!spec.accepts_option(option)).then(|| option.clone())
            }
            FieldValue::MultiSelect(options) => options
                .iter()
                .find(|option| !spec.accepts_option(option))
                .cloned(),
            _ => None,
        };
        if let Some(option) = unknown {
            return Err(FieldError::UnknownOption {
                field: name.to_string(),
                option,
            });
        }

        if let Some(slot) = self.values.get_mut(name) {
            *slot = value;
        }
        Ok(())
    }

    /// Flips membership of `option`. Returns whether it is selected afterwards.
    pub fn toggle(&mut self, name: &str, option: &str) -> Result<bool, FieldError> {
        let spec = self
            .specs
            .get(name)
            .ok_or_else(|| FieldError::UnknownField(name.to_string()))?;
        if spec.kind != FieldKind::MultiSelect {
            return Err(FieldError::KindMismatch {
                field: name.to_string(),
                expected: spec.kind,
                actual: FieldKind::MultiSelect,
            });
        }
        if !spec.accepts_option(option) {
            return Err(FieldError::UnknownOption {
                field: name.to_string(),
                option: option.to_string(),
            });
        }

        let Some(FieldValue::MultiSelect(selected)) = self.values.get_mut(name) else {
            return Err(FieldError::UnknownField(name.to_string()));
        };
        if selected.shift_remove(option) {
            Ok(false)
        } else {
            selected.insert(option.to_string());
            Ok(true)
        }
    }

    pub fn reset(&mut self) {
        for (name, value) in self.values.iter_mut() {
            if let Some(spec) = self.specs.get(name) {
                *value = spec.default_value();
            }
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot(self.values.clone())
    }
}

/// Every field value at the moment a submission was started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Snapshot(IndexMap<FieldName, FieldValue>);

impl Snapshot {
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_text)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
