//! Processing job lifecycle coordinator.
//!
//! Drives one job from submission through polling to a terminal state:
//!
//! ```text
//! Idle -> Submitting -> Polling -> { Completed | Failed }
//! ```
//!
//! The coordinator submits exactly once, then queries status on a fixed
//! cadence with at most one query in flight; a tick that fires while a query
//! is still running is skipped, never queued. Exactly one terminal
//! transition occurs, the timer is inert from that instant, and no observer
//! callback fires afterwards. A coordinator instance is single-use; a new
//! submission starts a fresh instance.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::backend::ProcessingBackend;
use super::error::JobError;
use super::types::{JobStatus, ProcessRequest, ProcessingJob};

/// Lifecycle states of a coordinator instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorState {
    Idle,
    Submitting,
    Polling,
    Completed,
    Failed,
}

impl CoordinatorState {
    /// Completed and Failed are terminal; the instance is spent.
    pub fn is_terminal(&self) -> bool {
        matches!(self, CoordinatorState::Completed | CoordinatorState::Failed)
    }
}

/// Host callback surface for job progress.
///
/// `on_status` fires once per successful status query, including the query
/// that observes the terminal status. `on_error` fires at most once, for the
/// poll transport failure that terminates the job.
pub trait StatusObserver: Send + Sync {
    fn on_status(&self, job: &ProcessingJob);
    fn on_error(&self, error: &JobError);
}

/// Coordinates one processing job against a `ProcessingBackend`.
pub struct JobCoordinator {
    backend: Arc<dyn ProcessingBackend>,
    poll_interval: Duration,
    state: Arc<RwLock<CoordinatorState>>,
    job: Arc<RwLock<Option<ProcessingJob>>>,
    last_error: Arc<RwLock<Option<JobError>>>,
    shutdown: Mutex<Option<oneshot::Sender<()>>>,
    poll_task: Mutex<Option<JoinHandle<()>>>,
}

impl JobCoordinator {
    /// Create an idle coordinator polling at `poll_interval`.
    pub fn new(backend: Arc<dyn ProcessingBackend>, poll_interval: Duration) -> Self {
        Self {
            backend,
            poll_interval,
            state: Arc::new(RwLock::new(CoordinatorState::Idle)),
            job: Arc::new(RwLock::new(None)),
            last_error: Arc::new(RwLock::new(None)),
            shutdown: Mutex::new(None),
            poll_task: Mutex::new(None),
        }
    }

    /// Submit `request` and start polling on success.
    ///
    /// Sends the request to the backend exactly once. On success the
    /// coordinator moves to `Polling`, spawns the poll task and returns the
    /// backend-issued job id. On failure it moves to `Failed` and performs
    /// no polling at all. Calling `submit` on a non-idle coordinator is a
    /// `Submission` error.
    pub async fn submit(
        &self,
        request: ProcessRequest,
        observer: Arc<dyn StatusObserver>,
    ) -> Result<String, JobError> {
        {
            let mut state = self.state.write();
            if *state != CoordinatorState::Idle {
                return Err(JobError::Submission(format!(
                    "coordinator is not idle (state: {:?}); start a fresh instance",
                    *state
                )));
            }
            *state = CoordinatorState::Submitting;
        }

        let job_id = match self.backend.submit(&request).await {
            Ok(id) => id,
            Err(err) => {
                tracing::warn!(error = %err, "job submission failed");
                *self.last_error.write() = Some(err.clone());
                *self.state.write() = CoordinatorState::Failed;
                return Err(err);
            }
        };

        *self.state.write() = CoordinatorState::Polling;
        tracing::info!(job_id = %job_id, interval_ms = self.poll_interval.as_millis() as u64, "polling job status");

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        *self.shutdown.lock() = Some(shutdown_tx);

        let handle = tokio::spawn(poll_loop(
            Arc::clone(&self.backend),
            job_id.clone(),
            self.poll_interval,
            Arc::clone(&self.state),
            Arc::clone(&self.job),
            Arc::clone(&self.last_error),
            observer,
            shutdown_rx,
        ));
        *self.poll_task.lock() = Some(handle);

        Ok(job_id)
    }

    /// Cancel polling.
    ///
    /// Clears the pending timer and discards any in-flight status response;
    /// no observer callback fires after this returns. Idempotent, and a
    /// no-op once a terminal state has been reached.
    pub fn cancel(&self) {
        if let Some(tx) = self.shutdown.lock().take() {
            // A closed receiver means the task already terminated on its own.
            let _ = tx.send(());
            tracing::debug!("job coordinator cancelled");
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> CoordinatorState {
        *self.state.read()
    }

    /// Whether a terminal transition has occurred.
    pub fn is_terminal(&self) -> bool {
        self.state().is_terminal()
    }

    /// Last observed job snapshot, if any poll succeeded.
    pub fn job(&self) -> Option<ProcessingJob> {
        self.job.read().clone()
    }

    /// The error that terminated the job, if it failed.
    pub fn last_error(&self) -> Option<JobError> {
        self.last_error.read().clone()
    }

    /// Wait for the poll task to finish (terminal state or cancellation).
    pub async fn wait(&self) {
        let handle = self.poll_task.lock().take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }
}

impl Drop for JobCoordinator {
    fn drop(&mut self) {
        // Don't leave a detached poll task running after the host loses
        // interest.
        self.cancel();
    }
}

#[allow(clippy::too_many_arguments)]
async fn poll_loop(
    backend: Arc<dyn ProcessingBackend>,
    job_id: String,
    poll_interval: Duration,
    state: Arc<RwLock<CoordinatorState>>,
    job_slot: Arc<RwLock<Option<ProcessingJob>>>,
    last_error: Arc<RwLock<Option<JobError>>>,
    observer: Arc<dyn StatusObserver>,
    mut shutdown_rx: oneshot::Receiver<()>,
) {
    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // An interval's first tick fires immediately; consume it so the first
    // query happens one full interval after submit.
    ticker.tick().await;

    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown_rx => {
                tracing::debug!(job_id = %job_id, "poll loop stopped before tick");
                return;
            }
            _ = ticker.tick() => {}
        }

        // The query is awaited inside the tick body, so at most one request
        // is ever in flight; Skip drops the ticks a slow query overlaps.
        let result = tokio::select! {
            biased;
            _ = &mut shutdown_rx => {
                tracing::debug!(job_id = %job_id, "in-flight status response discarded");
                return;
            }
            result = backend.fetch_status(&job_id) => result,
        };

        match result {
            Ok(update) => {
                *job_slot.write() = Some(update.clone());
                observer.on_status(&update);

                if update.has_error() {
                    tracing::warn!(job_id = %job_id, error = %update.error, "job reported failure");
                    *last_error.write() = Some(JobError::JobFailed(update.error.clone()));
                    *state.write() = CoordinatorState::Failed;
                    return;
                }
                if update.status == JobStatus::Completed {
                    tracing::info!(job_id = %job_id, "job completed");
                    *state.write() = CoordinatorState::Completed;
                    return;
                }
                tracing::debug!(
                    job_id = %job_id,
                    status = ?update.status,
                    progress = update.progress,
                    "job status updated"
                );
            }
            Err(err) => {
                // A single failed poll is terminal; no retry.
                tracing::warn!(job_id = %job_id, error = %err, "status poll failed");
                observer.on_error(&err);
                *last_error.write() = Some(err);
                *state.write() = CoordinatorState::Failed;
                return;
            }
        }
    }
}
