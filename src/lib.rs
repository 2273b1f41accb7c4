pub mod config;
pub mod core;
pub mod input;
pub mod pricing;
pub mod runtime;
pub mod state;
pub mod task;

pub use config::presets;
pub use config::{ConfigError, FlowDefinition, FlowSettings};

pub use core::FieldName;
pub use core::field::FieldSpec;
pub use core::value::{FieldKind, FieldValue};

pub use input::validators;

pub use runtime::Runtime;
pub use runtime::effect::{Notification, NotificationTemplate, Notifier, Redirector, Severity};
pub use runtime::event::{CompletionReport, DispatchError, Dispatched, WizardEvent};

pub use state::flow::NavigationError;
pub use state::step::{StepBuilder, StepDefinition, StepStatus, ValidationRule};
pub use state::store::{FieldError, FormStore, Snapshot};
pub use state::validation::FieldErrors;
pub use state::wizard::{NextOutcome, SubmissionOutcome, Wizard, WizardError};

pub use task::{SimulatedSubmitter, SubmitError, Submitter};
