use crate::core::FieldName;
use crate::core::value::FieldValue;
use crate::state::step::StepDefinition;
use crate::state::store::FormStore;
use indexmap::IndexMap;
use std::collections::HashSet;

/// Field name -> first failing rule's message, in the step's rule order.
pub type FieldErrors = IndexMap<FieldName, String>;

/// Read-only view handed to rule predicates.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    step_id: &'a str,
    store: &'a FormStore,
}

impl<'a> ValidationContext<'a> {
    pub fn new(step_id: &'a str, store: &'a FormStore) -> Self {
        Self { step_id, store }
    }

    pub fn step_id(&self) -> &str {
        self.step_id
    }

    pub fn value(&self, name: &str) -> Option<&'a FieldValue> {
        self.store.get(name)
    }

    pub fn text(&self, name: &str) -> Option<&'a str> {
        self.value(name).and_then(FieldValue::as_text)
    }

    pub fn bool_value(&self, name: &str) -> Option<bool> {
        self.value(name).and_then(FieldValue::as_bool)
    }
}

/// Runs the rules owned by `step` against `store`. Pure: the same inputs
/// always give the same mapping. Fields without a rule never appear.
pub fn validate_step(step: &StepDefinition, store: &FormStore) -> FieldErrors {
    let ctx = ValidationContext::new(step.id.as_str(), store);
    let mut errors = FieldErrors::new();
    for rule in &step.rules {
        if errors.contains_key(rule.field.as_str()) {
            continue;
        }
        let Some(value) = store.get(rule.field.as_str()) else {
            continue;
        };
        if !rule.check(value, &ctx) {
            errors.insert(rule.field.clone(), rule.message.clone());
        }
    }
    errors
}

/// Which fields currently show their error. Errors themselves are never
/// stored here; they are recomputed from the store on every read.
#[derive(Debug, Default, Clone)]
pub struct ValidationState {
    revealed: HashSet<FieldName>,
}

impl ValidationState {
    pub fn reveal<'a>(&mut self, ids: impl IntoIterator<Item = &'a FieldName>) {
        self.revealed.extend(ids.into_iter().cloned());
    }

    pub fn hide(&mut self, id: &str) {
        self.revealed.remove(id);
    }

    pub fn is_revealed(&self, id: &str) -> bool {
        self.revealed.contains(id)
    }

    pub fn clear(&mut self) {
        self.revealed.clear();
    }

    pub fn visible(&self, mut errors: FieldErrors) -> FieldErrors {
        errors.retain(|id, _| self.revealed.contains(id.as_str()));
        errors
    }
}
