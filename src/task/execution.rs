use crate::state::store::Snapshot;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("submission rejected: {0}")]
    Rejected(String),
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("no response after {}ms", .0.as_millis())]
    TimedOut(Duration),
    #[error("submission aborted")]
    Aborted,
    #[error("submitter panicked")]
    Panicked,
}

/// One outbound write of the full snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRequest {
    pub run_id: u64,
    pub snapshot: Snapshot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionCompletion {
    pub run_id: u64,
    pub result: Result<(), SubmitError>,
}

/// The outbound boundary. Transport and encoding belong to the implementor.
pub trait Submitter: Send + Sync + 'static {
    fn submit(&self, snapshot: Snapshot) -> impl Future<Output = Result<(), SubmitError>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulatedOutcome {
    Succeed,
    Fail(String),
}

/// Resolves after a fixed delay, like the hosted form's mocked API call.
#[derive(Debug, Clone)]
pub struct SimulatedSubmitter {
    delay: Duration,
    outcome: SimulatedOutcome,
}

impl SimulatedSubmitter {
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(2_000);

    pub fn succeeding() -> Self {
        Self {
            delay: Self::DEFAULT_DELAY,
            outcome: SimulatedOutcome::Succeed,
        }
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            delay: Self::DEFAULT_DELAY,
            outcome: SimulatedOutcome::Fail(reason.into()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl Submitter for SimulatedSubmitter {
    fn submit(&self, snapshot: Snapshot) -> impl Future<Output = Result<(), SubmitError>> + Send {
        let delay = self.delay;
        let outcome = self.outcome.clone();
        async move {
            tracing::debug!(fields = snapshot.len(), ?delay, "simulated submission");
            tokio::time::sleep(delay).await;
            match outcome {
                SimulatedOutcome::Succeed => Ok(()),
                SimulatedOutcome::Fail(reason) => Err(SubmitError::Transport(reason)),
            }
        }
    }
}
