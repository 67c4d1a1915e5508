//! Watermark error types.
//!
//! Defines errors that can occur during watermark pattern rendering.

use std::fmt;

/// Errors that can occur during watermark pattern rendering.
#[derive(Debug)]
pub enum WatermarkError {
    /// Settings failed a local precondition (bad density, dimensions, color).
    /// Never produced by the surface capability itself.
    InvalidSettings(String),

    /// The raster surface capability failed to measure or draw
    Render(String),

    /// Failed to encode the rendered surface as an image
    Encode(String),
}

impl fmt::Display for WatermarkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSettings(msg) => write!(f, "Invalid watermark settings: {}", msg),
            Self::Render(msg) => write!(f, "Failed to render watermark pattern: {}", msg),
            Self::Encode(msg) => write!(f, "Failed to encode watermark image: {}", msg),
        }
    }
}

impl std::error::Error for WatermarkError {}
