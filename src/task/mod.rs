pub mod execution;
pub mod executor;
pub mod run_state;

pub use execution::{
    SimulatedOutcome, SimulatedSubmitter, SubmissionCompletion, SubmissionRequest, SubmitError,
    Submitter,
};
pub use executor::{DEFAULT_TIMEOUT, SubmissionExecutor};
pub use run_state::SubmissionRunState;
