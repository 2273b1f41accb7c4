use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Boolean,
    SingleSelect,
    MultiSelect,
}

impl FieldKind {
    pub fn default_value(self) -> FieldValue {
        match self {
            Self::Text => FieldValue::Text(String::new()),
            Self::Boolean => FieldValue::Boolean(false),
            Self::SingleSelect => FieldValue::SingleSelect(None),
            Self::MultiSelect => FieldValue::MultiSelect(IndexSet::new()),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Boolean => "boolean",
            Self::SingleSelect => "single_select",
            Self::MultiSelect => "multi_select",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single form value. `SingleSelect(None)` is the unselected placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Boolean(bool),
    SingleSelect(Option<String>),
    MultiSelect(IndexSet<String>),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn selected(option: impl Into<String>) -> Self {
        Self::SingleSelect(Some(option.into()))
    }

    pub fn options<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::MultiSelect(options.into_iter().map(Into::into).collect())
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Text(_) => FieldKind::Text,
            Self::Boolean(_) => FieldKind::Boolean,
            Self::SingleSelect(_) => FieldKind::SingleSelect,
            Self::MultiSelect(_) => FieldKind::MultiSelect,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(v) => v.trim().is_empty(),
            Self::Boolean(v) => !v,
            Self::SingleSelect(v) => v.as_deref().is_none_or(str::is_empty),
            Self::MultiSelect(v) => v.is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_selected(&self) -> Option<&str> {
        match self {
            Self::SingleSelect(v) => v.as_deref(),
            _ => None,
        }
    }

    pub fn as_options(&self) -> Option<&IndexSet<String>> {
        match self {
            Self::MultiSelect(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(v) => f.write_str(v),
            Self::Boolean(v) => write!(f, "{}", if *v { "[x]" } else { "[ ]" }),
            Self::SingleSelect(Some(v)) => f.write_str(v),
            Self::SingleSelect(None) => f.write_str("-"),
            Self::MultiSelect(v) => {
                let joined = v.iter().map(String::as_str).collect::<Vec<_>>().join(", ");
                write!(f, "{{{joined}}}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldKind, FieldValue};

    #[test]
    fn defaults_are_empty_for_every_kind() {
        for kind in [
            FieldKind::Text,
            FieldKind::Boolean,
            FieldKind::SingleSelect,
            FieldKind::MultiSelect,
        ] {
            let value = kind.default_value();
            assert_eq!(value.kind(), kind);
            assert!(value.is_empty(), "{kind} default should be empty");
        }
    }

    #[test]
    fn whitespace_text_counts_as_empty() {
        assert!(FieldValue::text("   ").is_empty());
        assert!(!FieldValue::text(" a ").is_empty());
    }

    #[test]
    fn multi_select_compares_as_set() {
        let left = FieldValue::options(["google", "facebook"]);
        let right = FieldValue::options(["facebook", "google"]);
        assert_eq!(left, right);
    }

    #[test]
    fn serializes_untagged() {
        let json = serde_json::to_value(FieldValue::selected("1-10")).expect("serialize");
        assert_eq!(json, serde_json::json!("1-10"));

        let json = serde_json::to_value(FieldValue::SingleSelect(None)).expect("serialize");
        assert_eq!(json, serde_json::Value::Null);

        let json = serde_json::to_value(FieldValue::options(["a", "b"])).expect("serialize");
        assert_eq!(json, serde_json::json!(["a", "b"]));
    }
}
