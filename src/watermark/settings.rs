//! Watermark settings and validation.
//!
//! `WatermarkSettings` carries everything a single render call needs. The
//! struct is immutable per call; the host rebuilds it whenever the user
//! changes a knob and re-renders.
//!
//! # Density fallback
//!
//! A density of 0 is normalized to 1 rather than rejected. The host UI
//! historically sent 0 for "unset" density fields and expected a single
//! centered tile, so the fallback is an explicit compatibility rule here.
//! Negative densities have no meaning and are rejected.

use serde::{Deserialize, Serialize};

use super::WatermarkError;

/// Background style for the rendered pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// One fixed neutral tone across the full surface.
    Solid,
    /// Transparency-indicator checkerboard of two fixed tones.
    Checkerboard,
}

/// Settings for one watermark pattern render.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatermarkSettings {
    /// The watermark text. Empty text yields a background-only pattern.
    pub text: String,
    /// Font size in surface units. Also used as the nominal text height.
    pub font_size: f32,
    /// Font family name, forwarded to the surface capability.
    pub font_family: String,
    /// Text color as a hex token (#RGB, #RRGGBB or #RRGGBBAA).
    pub color: String,
    /// Text opacity. Forwarded to the surface unvalidated; out-of-range
    /// behavior is capability-defined.
    pub opacity: f32,
    /// Grid rotation in degrees. The whole tile grid rotates as one rigid
    /// body about the surface center.
    pub angle: f32,
    /// Tile count along the horizontal axis.
    pub horizontal_density: i32,
    /// Tile count along the vertical axis.
    pub vertical_density: i32,
    /// Target surface width.
    pub canvas_width: u32,
    /// Target surface height.
    pub canvas_height: u32,
}

impl Default for WatermarkSettings {
    fn default() -> Self {
        Self {
            text: String::new(),
            font_size: 24.0,
            font_family: "sans-serif".to_string(),
            color: "#000000".to_string(),
            opacity: 0.5,
            angle: 0.0,
            horizontal_density: 3,
            vertical_density: 3,
            canvas_width: 400,
            canvas_height: 300,
        }
    }
}

impl WatermarkSettings {
    /// Check the local preconditions the renderer relies on.
    ///
    /// Surface capability failures are not covered here; this only rejects
    /// inputs that would make the layout math meaningless.
    pub fn validate(&self) -> Result<(), WatermarkError> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(WatermarkError::InvalidSettings(
                "canvas dimensions must be positive".to_string(),
            ));
        }
        if !(self.font_size > 0.0) {
            return Err(WatermarkError::InvalidSettings(
                "font size must be positive".to_string(),
            ));
        }
        resolve_density(self.horizontal_density)?;
        resolve_density(self.vertical_density)?;
        Ok(())
    }
}

/// Normalize a density value to the tile count actually used.
///
/// Zero falls back to 1 (see the module docs); negative values are rejected.
pub fn resolve_density(value: i32) -> Result<u32, WatermarkError> {
    match value {
        0 => Ok(1),
        v if v < 0 => Err(WatermarkError::InvalidSettings(format!(
            "density must not be negative, got {}",
            v
        ))),
        v => Ok(v as u32),
    }
}
