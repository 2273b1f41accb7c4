use crate::task::execution::{SubmissionCompletion, SubmissionRequest, SubmitError, Submitter};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender, error::TryRecvError};
use tokio::task::AbortHandle;
use tracing::warn;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Runs submissions on the tokio runtime and hands completions back as
/// messages, so the wizard itself is only ever touched from one place.
pub struct SubmissionExecutor<S> {
    submitter: Arc<S>,
    timeout: Option<Duration>,
    completion_tx: UnboundedSender<SubmissionCompletion>,
    completion_rx: UnboundedReceiver<SubmissionCompletion>,
    running: Vec<AbortHandle>,
}

impl<S: Submitter> SubmissionExecutor<S> {
    pub fn new(submitter: S) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel::<SubmissionCompletion>();
        Self {
            submitter: Arc::new(submitter),
            timeout: Some(DEFAULT_TIMEOUT),
            completion_tx,
            completion_rx,
            running: Vec::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn submitter(&self) -> &S {
        &self.submitter
    }

    /// Must be called from within a tokio runtime. The submitter runs in
    /// its own task so a panic still yields a completion for `run_id`.
    pub fn spawn(&mut self, request: SubmissionRequest) {
        let submitter = Arc::clone(&self.submitter);
        let completion_tx = self.completion_tx.clone();
        let timeout = self.timeout;
        let SubmissionRequest { run_id, snapshot } = request;

        let call = tokio::spawn(async move {
            let call = submitter.submit(snapshot);
            match timeout {
                Some(limit) => tokio::time::timeout(limit, call)
                    .await
                    .unwrap_or(Err(SubmitError::TimedOut(limit))),
                None => call.await,
            }
        });
        let call_abort = call.abort_handle();

        let watcher = tokio::spawn(async move {
            let result = match call.await {
                Ok(result) => result,
                Err(err) if err.is_panic() => {
                    warn!(run_id, "submitter panicked");
                    Err(SubmitError::Panicked)
                }
                Err(_) => return,
            };
            let _ = completion_tx.send(SubmissionCompletion { run_id, result });
        });

        self.running.retain(|h| !h.is_finished());
        self.running.push(call_abort);
        self.running.push(watcher.abort_handle());
    }

    pub fn drain_ready(&mut self) -> Vec<SubmissionCompletion> {
        let mut out = Vec::<SubmissionCompletion>::new();
        loop {
            match self.completion_rx.try_recv() {
                Ok(completion) => out.push(completion),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        out
    }

    /// Waits for the next completion. Pending forever when nothing runs.
    pub async fn recv(&mut self) -> Option<SubmissionCompletion> {
        self.completion_rx.recv().await
    }

    pub fn abort_all(&mut self) {
        for handle in self.running.drain(..) {
            handle.abort();
        }
    }
}

impl<S> Drop for SubmissionExecutor<S> {
    fn drop(&mut self) {
        for handle in &self.running {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SubmissionExecutor;
    use crate::core::field::FieldSpec;
    use crate::state::store::{FormStore, Snapshot};
    use crate::task::execution::{
        SimulatedSubmitter, SubmissionRequest, SubmitError, Submitter,
    };
    use std::future::Future;
    use std::time::Duration;

    fn snapshot() -> Snapshot {
        FormStore::new([FieldSpec::text("email", "Email")]).snapshot()
    }

    struct Hanging;

    impl Submitter for Hanging {
        fn submit(&self, _: Snapshot) -> impl Future<Output = Result<(), SubmitError>> + Send {
            std::future::pending()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn delivers_completion_with_run_id() {
        let mut executor = SubmissionExecutor::new(
            SimulatedSubmitter::succeeding().with_delay(Duration::from_millis(50)),
        );
        executor.spawn(SubmissionRequest {
            run_id: 7,
            snapshot: snapshot(),
        });
        assert!(executor.drain_ready().is_empty());

        let completion = executor.recv().await.expect("completion");
        assert_eq!(completion.run_id, 7);
        assert_eq!(completion.result, Ok(()));
    }

    #[tokio::test(start_paused = true)]
    async fn times_out_slow_submitter() {
        let mut executor =
            SubmissionExecutor::new(Hanging).with_timeout(Some(Duration::from_secs(5)));
        executor.spawn(SubmissionRequest {
            run_id: 1,
            snapshot: snapshot(),
        });

        let completion = executor.recv().await.expect("completion");
        assert_eq!(
            completion.result,
            Err(SubmitError::TimedOut(Duration::from_secs(5)))
        );
    }

    struct Exploding;

    impl Submitter for Exploding {
        fn submit(&self, _: Snapshot) -> impl Future<Output = Result<(), SubmitError>> + Send {
            async {
                let response: Option<Result<(), SubmitError>> = None;
                response.expect("backend client blew up")
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn panicking_submitter_still_completes() {
        let mut executor = SubmissionExecutor::new(Exploding);
        executor.spawn(SubmissionRequest {
            run_id: 3,
            snapshot: snapshot(),
        });

        let completion = executor.recv().await.expect("completion");
        assert_eq!(completion.run_id, 3);
        assert_eq!(completion.result, Err(SubmitError::Panicked));
    }

    #[tokio::test(start_paused = true)]
    async fn aborted_run_never_completes() {
        let mut executor = SubmissionExecutor::new(
            SimulatedSubmitter::succeeding().with_delay(Duration::from_millis(10)),
        );
        executor.spawn(SubmissionRequest {
            run_id: 1,
            snapshot: snapshot(),
        });
        executor.abort_all();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(executor.drain_ready().is_empty());
    }
}
