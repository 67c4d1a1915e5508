//! Processing backend seam.
//!
//! The coordinator talks to the external media-processing service through the
//! `ProcessingBackend` trait. `HttpBackend` is the production implementation
//! speaking the backend's JSON envelope over HTTP; tests substitute scripted
//! fakes.

use std::time::Duration;

use async_trait::async_trait;

use crate::config::BackendConfig;

use super::error::JobError;
use super::types::{ApiEnvelope, ProcessRequest, ProcessingJob};

/// RPC surface of the external processing service.
#[async_trait]
pub trait ProcessingBackend: Send + Sync {
    /// Submit a processing request. Returns the backend-issued job id.
    async fn submit(&self, request: &ProcessRequest) -> Result<String, JobError>;

    /// Fetch the current status of a previously submitted job.
    async fn fetch_status(&self, job_id: &str) -> Result<ProcessingJob, JobError>;
}

/// HTTP implementation of `ProcessingBackend`.
///
/// Endpoints:
/// - `POST {base}/api/process` with the request JSON, returning the job id
/// - `GET {base}/api/process/{id}` returning the job status
///
/// Both wrap their payloads in the `{code, message, data}` envelope.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    /// Create a backend client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `JobError::Submission` if the HTTP client cannot be created
    /// (e.g., TLS configuration issues, system resource exhaustion).
    pub fn new(config: &BackendConfig) -> Result<Self, JobError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| JobError::Submission(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn submit_url(&self) -> String {
        format!("{}/api/process", self.base_url)
    }

    fn status_url(&self, job_id: &str) -> String {
        format!("{}/api/process/{}", self.base_url, job_id)
    }
}

#[async_trait]
impl ProcessingBackend for HttpBackend {
    async fn submit(&self, request: &ProcessRequest) -> Result<String, JobError> {
        let response = self
            .client
            .post(self.submit_url())
            .json(request)
            .send()
            .await
            .map_err(|e| JobError::Submission(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(JobError::Submission(format!(
                "HTTP request failed with status: {}",
                response.status()
            )));
        }

        let envelope: ApiEnvelope<String> = response
            .json()
            .await
            .map_err(|e| JobError::Submission(format!("Invalid response body: {}", e)))?;

        let job_id = envelope.into_data().map_err(JobError::Submission)?;
        tracing::info!(job_id = %job_id, "submitted processing job");
        Ok(job_id)
    }

    async fn fetch_status(&self, job_id: &str) -> Result<ProcessingJob, JobError> {
        let response = self
            .client
            .get(self.status_url(job_id))
            .send()
            .await
            .map_err(|e| JobError::PollTransport(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(JobError::PollTransport(format!(
                "HTTP request failed with status: {}",
                response.status()
            )));
        }

        let envelope: ApiEnvelope<ProcessingJob> = response
            .json()
            .await
            .map_err(|e| JobError::PollTransport(format!("Invalid response body: {}", e)))?;

        envelope.into_data().map_err(JobError::PollTransport)
    }
}
