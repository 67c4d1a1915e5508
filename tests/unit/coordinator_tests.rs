// Job coordinator unit tests
// Lifecycle and cadence behavior against a scripted backend

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

use sukashi::job::{
    CoordinatorState, JobCoordinator, JobError, JobStatus, ProcessRequest, ProcessingBackend,
    ProcessingJob, StatusObserver, WatermarkAnchor,
};

fn job(status: JobStatus, progress: u8, error: &str) -> ProcessingJob {
    let now = Utc::now();
    ProcessingJob {
        id: "task_1".to_string(),
        status,
        progress,
        error: error.to_string(),
        created_at: now,
        updated_at: now,
    }
}

fn request() -> ProcessRequest {
    ProcessRequest {
        source_path: "/media/in.mp4".to_string(),
        output_path: "/media/out".to_string(),
        watermark_path: "data:image/png;base64,AAAA".to_string(),
        position: WatermarkAnchor::BottomRight,
        scale: 100,
        opacity: 50,
    }
}

struct ScriptedBackend {
    responses: Mutex<VecDeque<Result<ProcessingJob, JobError>>>,
    polls: AtomicU32,
    query_delay: Duration,
}

impl ScriptedBackend {
    fn new(responses: Vec<Result<ProcessingJob, JobError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            polls: AtomicU32::new(0),
            query_delay: Duration::ZERO,
        }
    }

    fn poll_count(&self) -> u32 {
        self.polls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProcessingBackend for ScriptedBackend {
    async fn submit(&self, _request: &ProcessRequest) -> Result<String, JobError> {
        Ok("task_1".to_string())
    }

    async fn fetch_status(&self, _job_id: &str) -> Result<ProcessingJob, JobError> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        if !self.query_delay.is_zero() {
            tokio::time::sleep(self.query_delay).await;
        }
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(job(JobStatus::Processing, 0, "")))
    }
}

#[derive(Default)]
struct RecordingObserver {
    progresses: Mutex<Vec<u8>>,
    errors: Mutex<Vec<JobError>>,
}

impl StatusObserver for RecordingObserver {
    fn on_status(&self, job: &ProcessingJob) {
        self.progresses.lock().push(job.progress);
    }
    fn on_error(&self, error: &JobError) {
        self.errors.lock().push(error.clone());
    }
}

#[tokio::test(start_paused = true)]
async fn test_full_lifecycle_reports_each_snapshot_in_order() {
    let backend = Arc::new(ScriptedBackend::new(vec![
        Ok(job(JobStatus::Pending, 0, "")),
        Ok(job(JobStatus::Processing, 35, "")),
        Ok(job(JobStatus::Processing, 80, "")),
        Ok(job(JobStatus::Completed, 100, "")),
    ]));
    let observer = Arc::new(RecordingObserver::default());
    let coordinator = JobCoordinator::new(backend.clone(), Duration::from_millis(1000));

    let start = tokio::time::Instant::now();
    coordinator
        .submit(request(), observer.clone())
        .await
        .expect("submit failed");
    coordinator.wait().await;

    assert_eq!(coordinator.state(), CoordinatorState::Completed);
    assert_eq!(backend.poll_count(), 4);
    assert_eq!(*observer.progresses.lock(), vec![0, 35, 80, 100]);
    assert!(observer.errors.lock().is_empty());

    // Four polls on a 1000ms cadence: the last lands at the 4s tick.
    assert_eq!(start.elapsed(), Duration::from_secs(4));
}

#[tokio::test(start_paused = true)]
async fn test_cancel_during_in_flight_query_discards_response() {
    let mut backend = ScriptedBackend::new(vec![Ok(job(JobStatus::Completed, 100, ""))]);
    backend.query_delay = Duration::from_millis(5000);
    let backend = Arc::new(backend);
    let observer = Arc::new(RecordingObserver::default());
    let coordinator = JobCoordinator::new(backend.clone(), Duration::from_millis(1000));

    coordinator
        .submit(request(), observer.clone())
        .await
        .expect("submit failed");

    // Let the first query start, then cancel while it is still in flight.
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(backend.poll_count(), 1);
    coordinator.cancel();
    coordinator.wait().await;

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert!(observer.progresses.lock().is_empty());
    assert_eq!(backend.poll_count(), 1);
    assert_eq!(coordinator.state(), CoordinatorState::Polling);
    assert!(coordinator.job().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_drop_stops_the_poll_task() {
    let backend = Arc::new(ScriptedBackend::new(vec![]));
    let observer = Arc::new(RecordingObserver::default());

    {
        let coordinator = JobCoordinator::new(backend.clone(), Duration::from_millis(1000));
        coordinator
            .submit(request(), observer.clone())
            .await
            .expect("submit failed");
        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(backend.poll_count(), 2);
    }

    // The coordinator is gone; no further polls may happen.
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(backend.poll_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_failed_status_with_error_string_terminates() {
    let backend = Arc::new(ScriptedBackend::new(vec![
        Ok(job(JobStatus::Processing, 50, "")),
        Ok(job(JobStatus::Failed, 50, "codec not supported")),
    ]));
    let observer = Arc::new(RecordingObserver::default());
    let coordinator = JobCoordinator::new(backend.clone(), Duration::from_millis(1000));

    coordinator
        .submit(request(), observer.clone())
        .await
        .expect("submit failed");
    coordinator.wait().await;

    assert_eq!(coordinator.state(), CoordinatorState::Failed);
    assert_eq!(
        coordinator.last_error(),
        Some(JobError::JobFailed("codec not supported".to_string()))
    );
    // Both snapshots were observed, including the failing one.
    assert_eq!(*observer.progresses.lock(), vec![50, 50]);

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(backend.poll_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_last_snapshot_is_kept_after_completion() {
    let backend = Arc::new(ScriptedBackend::new(vec![Ok(job(
        JobStatus::Completed,
        100,
        "",
    ))]));
    let observer = Arc::new(RecordingObserver::default());
    let coordinator = JobCoordinator::new(backend, Duration::from_millis(1000));

    coordinator
        .submit(request(), observer)
        .await
        .expect("submit failed");
    coordinator.wait().await;

    let snapshot = coordinator.job().expect("no job snapshot");
    assert_eq!(snapshot.status, JobStatus::Completed);
    assert_eq!(snapshot.progress, 100);
    assert!(snapshot.status.is_terminal());
}
