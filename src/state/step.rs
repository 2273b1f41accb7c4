use crate::core::FieldName;
use crate::core::field::FieldSpec;
use crate::core::value::FieldValue;
use crate::input::validators::{self, Predicate};
use crate::state::validation::ValidationContext;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Pending,
    Active,
    Done,
}

pub struct ValidationRule {
    pub field: FieldName,
    pub message: String,
    predicate: Predicate,
}

impl ValidationRule {
    pub fn new(field: impl Into<FieldName>, predicate: Predicate, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            predicate,
        }
    }

    pub fn check(&self, value: &FieldValue, ctx: &ValidationContext<'_>) -> bool {
        (self.predicate)(value, ctx)
    }
}

impl fmt::Debug for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationRule")
            .field("field", &self.field)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub struct StepDefinition {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub fields: Vec<FieldSpec>,
    pub rules: Vec<ValidationRule>,
}

impl StepDefinition {
    pub fn builder(id: impl Into<String>, title: impl Into<String>) -> StepBuilder {
        StepBuilder::new(id, title)
    }

    pub fn owns(&self, field: &str) -> bool {
        self.fields.iter().any(|spec| spec.name == field)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &FieldName> {
        self.fields.iter().map(|spec| &spec.name)
    }

    pub fn has_rule_for(&self, field: &str) -> bool {
        self.rules.iter().any(|rule| rule.field == field)
    }
}

pub struct StepBuilder {
    id: String,
    title: String,
    description: Option<String>,
    fields: Vec<FieldSpec>,
    rules: Vec<ValidationRule>,
}

impl StepBuilder {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            fields: Vec::new(),
            rules: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    pub fn fields(mut self, fields: impl IntoIterator<Item = FieldSpec>) -> Self {
        self.fields.extend(fields);
        self
    }

    pub fn rule(
        mut self,
        field: impl Into<FieldName>,
        predicate: Predicate,
        message: impl Into<String>,
    ) -> Self {
        self.rules.push(ValidationRule::new(field, predicate, message));
        self
    }

    pub fn require(self, field: impl Into<FieldName>, message: impl Into<String>) -> Self {
        self.rule(field, validators::required(), message)
    }

    pub fn build(self) -> StepDefinition {
        StepDefinition {
            id: self.id,
            title: self.title,
            description: self.description,
            fields: self.fields,
            rules: self.rules,
        }
    }
}
