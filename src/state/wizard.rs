use crate::core::FieldName;
use crate::core::value::FieldValue;
use crate::state::flow::{Flow, NavigationError};
use crate::state::step::{StepDefinition, StepStatus};
use crate::state::store::{FieldError, FormStore, Snapshot};
use crate::state::validation::{FieldErrors, ValidationState, validate_step};
use crate::task::{SubmissionCompletion, SubmissionRequest, SubmissionRunState, SubmitError};
use std::collections::HashSet;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Configuration mistakes caught when a wizard is assembled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("a wizard needs at least one step")]
    NoSteps,
    #[error("duplicate step id '{0}'")]
    DuplicateStep(String),
    #[error("field '{0}' is declared more than once")]
    DuplicateField(String),
    #[error("step '{step}' has a rule for field '{field}' it does not own")]
    ForeignRule { step: String, field: String },
    #[error("field '{field}' on step '{step}' has no rule and is not optional")]
    MissingRule { step: String, field: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextOutcome {
    Advanced { from: usize, to: usize },
    Blocked(FieldErrors),
    SubmissionStarted(SubmissionRequest),
    /// A submission is already outstanding; the trigger was dropped.
    SubmissionPending,
    AlreadyCompleted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Succeeded,
    Failed(SubmitError),
    /// Completion for a run the wizard no longer waits on.
    Stale,
}

#[derive(Debug, Default)]
struct RuntimeState {
    validation: ValidationState,
    submission: SubmissionRunState,
    completed: bool,
}

/// Owns every piece of wizard state. All writes go through its methods.
#[derive(Debug)]
pub struct Wizard {
    flow: Flow,
    store: FormStore,
    runtime: RuntimeState,
}

impl Wizard {
    pub fn new(steps: Vec<StepDefinition>) -> Result<Self, WizardError> {
        check_steps(&steps)?;
        let store = FormStore::new(steps.iter().flat_map(|step| step.fields.iter().cloned()));
        Ok(Self {
            flow: Flow::new(steps),
            store,
            runtime: RuntimeState::default(),
        })
    }

    pub fn steps(&self) -> &[StepDefinition] {
        self.flow.steps()
    }

    pub fn step_count(&self) -> usize {
        self.flow.len()
    }

    pub fn current_index(&self) -> usize {
        debug_assert!(self.flow.current_index() < self.flow.len());
        self.flow.current_index()
    }

    pub fn current_step(&self) -> &StepDefinition {
        self.flow.current_step()
    }

    pub fn status_at(&self, index: usize) -> StepStatus {
        self.flow.status_at(index)
    }

    pub fn is_terminal(&self) -> bool {
        self.flow.is_terminal()
    }

    pub fn progress_percentage(&self) -> f32 {
        self.flow.progress_percentage()
    }

    pub fn is_submitting(&self) -> bool {
        self.runtime.submission.is_running()
    }

    pub fn in_flight_run_id(&self) -> Option<u64> {
        self.runtime.submission.in_flight_run_id()
    }

    pub fn is_completed(&self) -> bool {
        self.runtime.completed
    }

    pub fn submission_attempts(&self) -> u32 {
        self.runtime.submission.attempts()
    }

    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.store.get(name)
    }

    pub fn values(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.store.iter()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.store.snapshot()
    }

    /// Editing a field hides its error until the next failed `next`.
    pub fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), FieldError> {
        self.ensure_editable(name)?;
        self.store.set(name, value)?;
        self.runtime.validation.hide(name);
        debug!(field = name, "field updated");
        Ok(())
    }

    pub fn toggle_option(&mut self, name: &str, option: &str) -> Result<bool, FieldError> {
        self.ensure_editable(name)?;
        let selected = self.store.toggle(name, option)?;
        self.runtime.validation.hide(name);
        debug!(field = name, option, selected, "option toggled");
        Ok(selected)
    }

    pub fn validate_step(&self, index: usize) -> Result<FieldErrors, NavigationError> {
        let step = self.flow.step(index).ok_or(NavigationError::OutOfRange {
            index,
            len: self.flow.len(),
        })?;
        Ok(validate_step(step, &self.store))
    }

    /// Errors currently shown for the active step, recomputed from values.
    pub fn errors(&self) -> FieldErrors {
        let all = validate_step(self.flow.current_step(), &self.store);
        self.runtime.validation.visible(all)
    }

    pub fn next(&mut self) -> NextOutcome {
        if self.runtime.completed {
            return NextOutcome::AlreadyCompleted;
        }
        if self.runtime.submission.is_running() {
            debug!("submit trigger ignored, submission in flight");
            return NextOutcome::SubmissionPending;
        }

        let from = self.flow.current_index();
        let errors = validate_step(self.flow.current_step(), &self.store);
        if !errors.is_empty() {
            self.runtime.validation.reveal(errors.keys());
            debug!(step = from, invalid = errors.len(), "step blocked by validation");
            return NextOutcome::Blocked(errors);
        }

        if self.flow.advance() {
            let to = self.flow.current_index();
            debug!(from, to, "advanced");
            return NextOutcome::Advanced { from, to };
        }

        match self.runtime.submission.try_start(Instant::now()) {
            Some(run_id) => {
                let snapshot = self.store.snapshot();
                info!(run_id, fields = snapshot.len(), "submission started");
                NextOutcome::SubmissionStarted(SubmissionRequest { run_id, snapshot })
            }
            None => NextOutcome::SubmissionPending,
        }
    }

    /// Moves one step back without validating. A no-op on the first step.
    pub fn previous(&mut self) -> Result<usize, NavigationError> {
        self.ensure_navigable()?;
        if self.flow.retreat() {
            debug!(to = self.flow.current_index(), "moved back");
        }
        Ok(self.flow.current_index())
    }

    pub fn jump_to(&mut self, index: usize) -> Result<(), NavigationError> {
        self.ensure_navigable()?;
        self.flow.jump_to(index).inspect_err(|err| {
            warn!(step = index, %err, "jump refused");
        })
    }

    pub fn complete_submission(&mut self, completion: SubmissionCompletion) -> SubmissionOutcome {
        let Some(elapsed) = self
            .runtime
            .submission
            .finish(completion.run_id, Instant::now())
        else {
            warn!(run_id = completion.run_id, "ignoring stale submission completion");
            return SubmissionOutcome::Stale;
        };

        match completion.result {
            Ok(()) => {
                info!(
                    run_id = completion.run_id,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "submission succeeded"
                );
                self.flow.complete_current();
                self.runtime.completed = true;
                SubmissionOutcome::Succeeded
            }
            Err(err) => {
                warn!(
                    run_id = completion.run_id,
                    elapsed_ms = elapsed.as_millis() as u64,
                    %err,
                    "submission failed"
                );
                SubmissionOutcome::Failed(err)
            }
        }
    }

    /// Returns to a blank first step. Run ids stay unique across resets.
    pub fn reset(&mut self) {
        self.store.reset();
        self.flow.reset();
        self.runtime.validation.clear();
        self.runtime.submission.reset();
        self.runtime.completed = false;
    }

    /// Only the active step's fields accept writes.
    fn ensure_editable(&self, name: &str) -> Result<(), FieldError> {
        if !self.store.contains(name) {
            return Err(FieldError::UnknownField(name.to_string()));
        }
        let step = self.flow.current_step();
        if !step.owns(name) {
            debug!(field = name, step = step.id.as_str(), "edit outside current step refused");
            return Err(FieldError::NotOnCurrentStep {
                field: name.to_string(),
                step: step.id.clone(),
            });
        }
        Ok(())
    }

    fn ensure_navigable(&self) -> Result<(), NavigationError> {
        if self.runtime.completed {
            return Err(NavigationError::Completed);
        }
        if self.runtime.submission.is_running() {
            return Err(NavigationError::SubmissionInFlight);
        }
        Ok(())
    }
}

fn check_steps(steps: &[StepDefinition]) -> Result<(), WizardError> {
    if steps.is_empty() {
        return Err(WizardError::NoSteps);
    }

    let mut step_ids = HashSet::<&str>::new();
    let mut fields = HashSet::<&FieldName>::new();
    for step in steps {
        if !step_ids.insert(step.id.as_str()) {
            return Err(WizardError::DuplicateStep(step.id.clone()));
        }
        for spec in &step.fields {
            if !fields.insert(&spec.name) {
                return Err(WizardError::DuplicateField(spec.name.to_string()));
            }
        }
        if let Some(rule) = step.rules.iter().find(|rule| !step.owns(rule.field.as_str())) {
            return Err(WizardError::ForeignRule {
                step: step.id.clone(),
                field: rule.field.to_string(),
            });
        }
        if let Some(spec) = step
            .fields
            .iter()
            .find(|spec| !spec.optional && !step.has_rule_for(spec.name.as_str()))
        {
            return Err(WizardError::MissingRule {
                step: step.id.clone(),
                field: spec.name.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{NextOutcome, SubmissionOutcome, Wizard, WizardError};
    use crate::core::field::FieldSpec;
    use crate::core::value::FieldValue;
    use crate::input::validators;
    use crate::state::flow::NavigationError;
    use crate::state::step::{StepDefinition, StepStatus};
    use crate::state::store::FieldError;
    use crate::task::{SubmissionCompletion, SubmitError};

    fn wizard() -> Wizard {
        Wizard::new(vec![
            StepDefinition::builder("account", "Account")
                .field(FieldSpec::text("email", "Email"))
                .field(FieldSpec::text("password", "Password"))
                .rule("email", validators::email(), "Please enter a valid email")
                .rule("password", validators::min_length(8), "Password too short")
                .build(),
            StepDefinition::builder("terms", "Terms")
                .field(FieldSpec::boolean("acceptTerms", "Accept"))
                .field(FieldSpec::boolean("newsletter", "Newsletter").optional())
                .rule("acceptTerms", validators::accepted(), "Accept the terms")
                .build(),
        ])
        .expect("valid wizard")
    }

    fn fill_account(wizard: &mut Wizard) {
        wizard
            .set_field("email", FieldValue::text("a@b.com"))
            .expect("set");
        wizard
            .set_field("password", FieldValue::text("longenough1"))
            .expect("set");
    }

    fn started(outcome: NextOutcome) -> u64 {
        match outcome {
            NextOutcome::SubmissionStarted(request) => request.run_id,
            other => panic!("expected submission, got {other:?}"),
        }
    }

    #[test]
    fn construction_rejects_broken_definitions() {
        assert_eq!(Wizard::new(Vec::new()).err(), Some(WizardError::NoSteps));

        let missing = Wizard::new(vec![
            StepDefinition::builder("a", "A")
                .field(FieldSpec::text("x", "X"))
                .build(),
        ]);
        assert!(matches!(missing, Err(WizardError::MissingRule { .. })));

        let foreign = Wizard::new(vec![
            StepDefinition::builder("a", "A")
                .field(FieldSpec::text("x", "X").optional())
                .require("y", "required")
                .build(),
        ]);
        assert!(matches!(foreign, Err(WizardError::ForeignRule { .. })));

        let duplicate = Wizard::new(vec![
            StepDefinition::builder("a", "A")
                .field(FieldSpec::text("x", "X").optional())
                .build(),
            StepDefinition::builder("b", "B")
                .field(FieldSpec::text("x", "X").optional())
                .build(),
        ]);
        assert_eq!(duplicate.err(), Some(WizardError::DuplicateField("x".into())));
    }

    #[test]
    fn failed_next_reveals_errors_and_stays() {
        let mut wizard = wizard();
        assert!(wizard.errors().is_empty());

        let outcome = wizard.next();
        assert!(matches!(outcome, NextOutcome::Blocked(ref errors) if errors.len() == 2));
        assert_eq!(wizard.current_index(), 0);
        assert_eq!(wizard.errors().len(), 2);
    }

    #[test]
    fn editing_clears_only_that_fields_error() {
        let mut wizard = wizard();
        wizard.next();
        wizard
            .set_field("email", FieldValue::text("still-bad"))
            .expect("set");
        let errors = wizard.errors();
        assert!(!errors.contains_key("email"));
        assert!(errors.contains_key("password"));
    }

    #[test]
    fn errors_follow_values_without_new_next() {
        let mut wizard = wizard();
        wizard.next();
        wizard
            .set_field("password", FieldValue::text("longenough1"))
            .expect("set");
        wizard.next();
        assert_eq!(wizard.errors().len(), 1);
        assert!(wizard.errors().contains_key("email"));
    }

    #[test]
    fn previous_keeps_errors_of_left_step() {
        let mut wizard = wizard();
        fill_account(&mut wizard);
        assert_eq!(wizard.next(), NextOutcome::Advanced { from: 0, to: 1 });
        assert!(matches!(wizard.next(), NextOutcome::Blocked(_)));
        assert_eq!(wizard.previous(), Ok(0));
        assert_eq!(wizard.status_at(1), StepStatus::Pending);
        wizard.jump_to(0).expect("jump to current");
        assert_eq!(wizard.next(), NextOutcome::Advanced { from: 0, to: 1 });
        assert!(wizard.errors().contains_key("acceptTerms"));
    }

    #[test]
    fn previous_on_first_step_does_not_validate() {
        let mut wizard = wizard();
        assert_eq!(wizard.previous(), Ok(0));
        assert!(wizard.errors().is_empty());
    }

    #[test]
    fn terminal_next_starts_exactly_one_submission() {
        let mut wizard = wizard();
        fill_account(&mut wizard);
        wizard.next();
        wizard
            .set_field("acceptTerms", FieldValue::Boolean(true))
            .expect("set");

        let run_id = started(wizard.next());
        assert!(wizard.is_submitting());
        assert_eq!(wizard.next(), NextOutcome::SubmissionPending);
        assert_eq!(wizard.submission_attempts(), 1);
        assert_eq!(wizard.previous(), Err(NavigationError::SubmissionInFlight));

        let outcome = wizard.complete_submission(SubmissionCompletion {
            run_id,
            result: Ok(()),
        });
        assert_eq!(outcome, SubmissionOutcome::Succeeded);
        assert!(wizard.is_completed());
        assert_eq!(wizard.next(), NextOutcome::AlreadyCompleted);
    }

    #[test]
    fn failure_preserves_values_and_allows_retry() {
        let mut wizard = wizard();
        fill_account(&mut wizard);
        wizard.next();
        wizard
            .set_field("acceptTerms", FieldValue::Boolean(true))
            .expect("set");
        let before = wizard.snapshot();

        let run_id = started(wizard.next());
        let outcome = wizard.complete_submission(SubmissionCompletion {
            run_id,
            result: Err(SubmitError::Transport("offline".into())),
        });
        assert!(matches!(outcome, SubmissionOutcome::Failed(_)));
        assert_eq!(wizard.snapshot(), before);
        assert_eq!(wizard.current_index(), 1);
        assert!(!wizard.is_submitting());

        let retry = started(wizard.next());
        assert_ne!(retry, run_id);
        assert_eq!(wizard.submission_attempts(), 2);
    }

    #[test]
    fn stale_completion_is_ignored() {
        let mut wizard = wizard();
        fill_account(&mut wizard);
        wizard.next();
        wizard
            .set_field("acceptTerms", FieldValue::Boolean(true))
            .expect("set");
        let run_id = started(wizard.next());

        let outcome = wizard.complete_submission(SubmissionCompletion {
            run_id: run_id + 10,
            result: Ok(()),
        });
        assert_eq!(outcome, SubmissionOutcome::Stale);
        assert!(wizard.is_submitting());
        assert!(!wizard.is_completed());
    }

    #[test]
    fn left_steps_are_read_only() {
        let mut wizard = wizard();
        fill_account(&mut wizard);
        wizard.next();
        wizard
            .set_field("acceptTerms", FieldValue::Boolean(true))
            .expect("set");

        assert_eq!(
            wizard.set_field("email", FieldValue::text("bad")),
            Err(FieldError::NotOnCurrentStep {
                field: "email".into(),
                step: "terms".into(),
            })
        );
        assert!(matches!(
            wizard.set_field("password", FieldValue::text("x")),
            Err(FieldError::NotOnCurrentStep { .. })
        ));

        match wizard.next() {
            NextOutcome::SubmissionStarted(request) => {
                assert_eq!(request.snapshot.text("email"), Some("a@b.com"));
                assert_eq!(request.snapshot.text("password"), Some("longenough1"));
            }
            other => panic!("expected submission, got {other:?}"),
        }
    }

    #[test]
    fn later_steps_cannot_be_filled_early() {
        let mut wizard = wizard();
        assert!(matches!(
            wizard.set_field("acceptTerms", FieldValue::Boolean(true)),
            Err(FieldError::NotOnCurrentStep { ref step, .. }) if step == "account"
        ));
        assert_eq!(wizard.value("acceptTerms"), Some(&FieldValue::Boolean(false)));
        assert_eq!(
            wizard.set_field("phone", FieldValue::text("1")),
            Err(FieldError::UnknownField("phone".into()))
        );
    }

    #[test]
    fn going_back_makes_a_step_editable_again() {
        let mut wizard = wizard();
        fill_account(&mut wizard);
        wizard.next();
        assert_eq!(wizard.previous(), Ok(0));
        wizard
            .set_field("email", FieldValue::text("c@d.org"))
            .expect("current step again");
        assert_eq!(wizard.next(), NextOutcome::Advanced { from: 0, to: 1 });
    }

    #[test]
    fn validate_step_out_of_range() {
        let wizard = wizard();
        assert_eq!(
            wizard.validate_step(5),
            Err(NavigationError::OutOfRange { index: 5, len: 2 })
        );
    }

    #[test]
    fn reset_restores_blank_first_step() {
        let mut wizard = wizard();
        fill_account(&mut wizard);
        wizard.next();
        wizard.reset();
        assert_eq!(wizard.current_index(), 0);
        assert_eq!(wizard.value("email"), Some(&FieldValue::text("")));
        assert_eq!(wizard.status_at(1), StepStatus::Pending);
    }
}
