//! Processing job lifecycle.
//!
//! Submitting a watermark job to the backend and tracking it to completion:
//!
//! - [`backend`] — the `ProcessingBackend` seam and its HTTP implementation
//! - [`coordinator`] — submit-then-poll state machine with fixed cadence
//! - [`types`] — wire types matching the backend JSON
//! - [`error`] — terminal error classification
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use sukashi::job::{HttpBackend, JobCoordinator, ProcessRequest, StatusObserver};
//! use sukashi::job::{JobError, ProcessingJob};
//! use sukashi::config::BackendConfig;
//!
//! struct LogObserver;
//!
//! impl StatusObserver for LogObserver {
//!     fn on_status(&self, job: &ProcessingJob) {
//!         println!("{}: {}%", job.id, job.progress);
//!     }
//!     fn on_error(&self, error: &JobError) {
//!         eprintln!("{}", error);
//!     }
//! }
//!
//! # async fn run(request: ProcessRequest) -> Result<(), JobError> {
//! let backend = Arc::new(HttpBackend::new(&BackendConfig::default())?);
//! let coordinator = JobCoordinator::new(backend, Duration::from_millis(1000));
//! coordinator.submit(request, Arc::new(LogObserver)).await?;
//! coordinator.wait().await;
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod coordinator;
pub mod error;
pub mod types;

// Re-export main types for convenience
pub use backend::{HttpBackend, ProcessingBackend};
pub use coordinator::{CoordinatorState, JobCoordinator, StatusObserver};
pub use error::JobError;
pub use types::{ApiEnvelope, JobStatus, ProcessRequest, ProcessingJob, WatermarkAnchor};
