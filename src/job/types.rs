//! Wire types for the processing backend.
//!
//! Field names and casing match the backend's JSON exactly, so these structs
//! serialize straight onto the wire without adapter layers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where the watermark is anchored on the processed media.
///
/// Nine-grid placement: four corners, four edge midpoints, and the center.
/// Serialized kebab-case (`"top-left"`, `"bottom-center"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum WatermarkAnchor {
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    #[default]
    Center,
    CenterRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

/// A request to composite a watermark onto a source file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRequest {
    /// Path of the source media file on the backend.
    pub source_path: String,
    /// Output path for the processed file.
    pub output_path: String,
    /// Watermark image reference; typically the data URL produced by the
    /// pattern renderer.
    pub watermark_path: String,
    /// Watermark placement.
    pub position: WatermarkAnchor,
    /// Watermark scale as a percentage (> 0).
    pub scale: u32,
    /// Watermark opacity, 0-100.
    pub opacity: u32,
}

/// Backend-reported job state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    /// Completed and Failed are terminal; no further transitions happen.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// One observed snapshot of a processing job.
///
/// Created by a successful submit, mutated only by poll responses, and
/// dropped from tracking the moment a terminal status or an unrecoverable
/// poll error is observed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingJob {
    /// Opaque handle issued by the backend.
    pub id: String,
    pub status: JobStatus,
    /// Progress, 0-100.
    pub progress: u8,
    /// Backend error string; empty means no error.
    #[serde(default)]
    pub error: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProcessingJob {
    /// Whether the backend reported an explicit error.
    pub fn has_error(&self) -> bool {
        !self.error.is_empty()
    }
}

/// Response envelope used by every backend endpoint:
/// `{ "code": 200, "message": "Success", "data": ... }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub code: i32,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// Unwrap the payload, treating any non-200 code as an error carrying
    /// the envelope message.
    pub fn into_data(self) -> Result<T, String> {
        if self.code != 200 {
            return Err(self.message);
        }
        self.data
            .ok_or_else(|| "response envelope carried no data".to_string())
    }
}
