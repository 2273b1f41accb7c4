use crate::config::{FlowDefinition, FlowSettings};
use crate::runtime::effect::{Notification, Notifier, Redirector, Severity};
use crate::runtime::event::{CompletionReport, DispatchError, Dispatched, WizardEvent};
use crate::state::wizard::{NextOutcome, SubmissionOutcome, Wizard, WizardError};
use crate::task::{SubmissionCompletion, SubmissionExecutor, Submitter};
use std::time::Duration;
use tracing::{debug, info};

const SOCIAL_NOTICE_DURATION: Duration = Duration::from_millis(3_000);

/// Drives one wizard: applies events, runs the submission off to the side
/// and turns its completion into a notification and, on success, a
/// redirect.
pub struct Runtime<S, N, R> {
    wizard: Wizard,
    settings: FlowSettings,
    executor: SubmissionExecutor<S>,
    notifier: N,
    redirector: R,
}

impl<S, N, R> Runtime<S, N, R>
where
    S: Submitter,
    N: Notifier,
    R: Redirector,
{
    pub fn new(
        definition: FlowDefinition,
        submitter: S,
        notifier: N,
        redirector: R,
    ) -> Result<Self, WizardError> {
        let (wizard, settings) = definition.into_parts()?;
        Ok(Self::with_parts(wizard, settings, submitter, notifier, redirector))
    }

    pub fn with_parts(
        wizard: Wizard,
        settings: FlowSettings,
        submitter: S,
        notifier: N,
        redirector: R,
    ) -> Self {
        let executor = SubmissionExecutor::new(submitter).with_timeout(settings.timeout);
        Self {
            wizard,
            settings,
            executor,
            notifier,
            redirector,
        }
    }

    pub fn wizard(&self) -> &Wizard {
        &self.wizard
    }

    pub fn settings(&self) -> &FlowSettings {
        &self.settings
    }

    pub fn submitter(&self) -> &S {
        self.executor.submitter()
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn redirector(&self) -> &R {
        &self.redirector
    }

    /// Applies one event. A submission started here runs on the tokio
    /// runtime; its result arrives through [`Self::next_completion`] or
    /// [`Self::drain_ready`].
    pub fn dispatch(&mut self, event: WizardEvent) -> Result<Dispatched, DispatchError> {
        match event {
            WizardEvent::SetField { name, value } => {
                self.wizard.set_field(name.as_str(), value)?;
                Ok(Dispatched::Updated)
            }
            WizardEvent::ToggleOption { name, option } => {
                let selected = self.wizard.toggle_option(name.as_str(), option.as_str())?;
                Ok(Dispatched::Toggled { selected })
            }
            WizardEvent::Next => {
                let outcome = self.wizard.next();
                if let NextOutcome::SubmissionStarted(request) = &outcome {
                    self.executor.spawn(request.clone());
                }
                Ok(Dispatched::Next(outcome))
            }
            WizardEvent::Previous => {
                let to = self.wizard.previous()?;
                Ok(Dispatched::Moved { to })
            }
            WizardEvent::JumpTo(index) => {
                self.wizard.jump_to(index)?;
                Ok(Dispatched::Moved { to: index })
            }
            WizardEvent::SocialSignIn { provider } => {
                debug!(provider = provider.as_str(), "social sign-in requested");
                self.notifier.notify(
                    Notification::new(
                        Severity::Info,
                        format!("{provider} {}", self.settings.social_label),
                        "Redirecting to authentication...",
                    )
                    .with_duration(SOCIAL_NOTICE_DURATION),
                );
                Ok(Dispatched::Notified)
            }
        }
    }

    /// Waits for the outstanding submission, if any, and applies it.
    pub async fn next_completion(&mut self) -> Option<CompletionReport> {
        if !self.wizard.is_submitting() {
            return None;
        }
        let completion = self.executor.recv().await?;
        Some(self.apply_completion(completion))
    }

    pub fn drain_ready(&mut self) -> Vec<CompletionReport> {
        self.executor
            .drain_ready()
            .into_iter()
            .map(|completion| self.apply_completion(completion))
            .collect()
    }

    /// Abandons the outstanding submission. The wizard stays on its step
    /// with every value intact and the submit action unlocked.
    pub fn cancel_submission(&mut self) -> Option<CompletionReport> {
        self.executor.abort_all();
        let run_id = self.wizard.in_flight_run_id()?;
        info!(run_id, "submission cancelled");
        Some(self.apply_completion(SubmissionCompletion {
            run_id,
            result: Err(crate::task::SubmitError::Aborted),
        }))
    }

    fn apply_completion(&mut self, completion: SubmissionCompletion) -> CompletionReport {
        let run_id = completion.run_id;
        let outcome = self.wizard.complete_submission(completion);
        match &outcome {
            SubmissionOutcome::Succeeded => {
                self.notifier
                    .notify(self.settings.success.render(Severity::Success));
                self.redirector.redirect(self.settings.redirect_to.as_str());
            }
            SubmissionOutcome::Failed(_) => {
                self.notifier
                    .notify(self.settings.failure.render(Severity::Error));
            }
            SubmissionOutcome::Stale => {}
        }
        CompletionReport { run_id, outcome }
    }
}
