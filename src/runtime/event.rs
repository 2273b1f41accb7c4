use crate::core::FieldName;
use crate::core::value::FieldValue;
use crate::state::store::FieldError;
use crate::state::flow::NavigationError;
use crate::state::wizard::{NextOutcome, SubmissionOutcome};
use thiserror::Error;

/// User input the runtime reacts to. Applied strictly in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardEvent {
    SetField { name: FieldName, value: FieldValue },
    ToggleOption { name: FieldName, option: String },
    Next,
    Previous,
    JumpTo(usize),
    SocialSignIn { provider: String },
}

impl WizardEvent {
    pub fn set(name: impl Into<FieldName>, value: FieldValue) -> Self {
        Self::SetField {
            name: name.into(),
            value,
        }
    }

    pub fn toggle(name: impl Into<FieldName>, option: impl Into<String>) -> Self {
        Self::ToggleOption {
            name: name.into(),
            option: option.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatched {
    Updated,
    Toggled { selected: bool },
    Next(NextOutcome),
    Moved { to: usize },
    Notified,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Field(#[from] FieldError),
    #[error(transparent)]
    Navigation(#[from] NavigationError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionReport {
    pub run_id: u64,
    pub outcome: SubmissionOutcome,
}
