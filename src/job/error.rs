//! Error types for the processing job lifecycle.

use thiserror::Error;

/// Errors surfaced by the job lifecycle coordinator.
///
/// Every variant is terminal for the job that produced it; nothing here is
/// retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JobError {
    /// The backend rejected the submission or was unreachable.
    #[error("Submission failed: {0}")]
    Submission(String),

    /// A status poll failed at the transport level.
    #[error("Status poll failed: {0}")]
    PollTransport(String),

    /// The backend reported an explicit processing error. The message is the
    /// backend's error string, passed through verbatim.
    #[error("Processing failed: {0}")]
    JobFailed(String),
}
