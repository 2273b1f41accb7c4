use crate::core::FieldName;
use crate::core::value::{FieldKind, FieldValue};
use serde::Deserialize;

/// Declaration of one input owned by a step.
///
/// `options` restricts the values a select field may hold; an empty list
/// accepts anything. `optional` fields may be left without a rule.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldSpec {
    pub name: FieldName,
    pub kind: FieldKind,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub optional: bool,
}

impl FieldSpec {
    pub fn new(name: impl Into<FieldName>, kind: FieldKind, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            label: label.into(),
            options: Vec::new(),
            optional: false,
        }
    }

    pub fn text(name: impl Into<FieldName>, label: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Text, label)
    }

    pub fn boolean(name: impl Into<FieldName>, label: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Boolean, label)
    }

    pub fn single_select<I, S>(name: impl Into<FieldName>, label: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(name, FieldKind::SingleSelect, label).with_options(options)
    }

    pub fn multi_select<I, S>(name: impl Into<FieldName>, label: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(name, FieldKind::MultiSelect, label).with_options(options)
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn accepts_option(&self, option: &str) -> bool {
        self.options.is_empty() || self.options.iter().any(|o| o == option)
    }

    pub fn default_value(&self) -> FieldValue {
        self.kind.default_value()
    }
}
