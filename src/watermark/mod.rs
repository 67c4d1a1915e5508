//! Watermark pattern rendering.
//!
//! This module turns a `WatermarkSettings` value into an encoded PNG preview
//! of a repeating, rotated, semi-transparent text pattern. Drawing happens
//! through the `RasterSurface` capability so hosts can plug in their own
//! canvas; `PixmapSurface` is the built-in CPU implementation.
//!
//! # Features
//!
//! - Deterministic tile-grid layout (density-based spacing, centered grid)
//! - Single rigid-body rotation of the whole grid about the surface center
//! - Solid or transparency-indicator checkerboard backgrounds
//! - Hex color parsing (#RGB, #RRGGBB and #RRGGBBAA formats)
//! - PNG output, optionally wrapped as a base64 data URL
//!
//! # Example
//!
//! ```no_run
//! use sukashi::watermark::{render_pattern, PixmapSurface, RenderMode, WatermarkSettings};
//!
//! let settings = WatermarkSettings {
//!     text: "DRAFT".to_string(),
//!     canvas_width: 400,
//!     canvas_height: 300,
//!     ..Default::default()
//! };
//!
//! let mut surface = PixmapSurface::with_system_font(400, 300)?;
//! let image = render_pattern(&settings, RenderMode::Checkerboard, &mut surface)?;
//! let watermark_path = image.to_data_url();
//! # Ok::<(), sukashi::watermark::WatermarkError>(())
//! ```

pub mod color;
pub mod error;
pub mod pattern;
pub mod pixmap;
pub mod settings;
pub mod surface;

// Re-export main types for convenience
pub use color::{parse_hex_color, Color};
pub use error::WatermarkError;
pub use pattern::{checker_tone, render_pattern, EncodedImage};
pub use pixmap::{discover_system_font, PixmapSurface};
pub use settings::{resolve_density, RenderMode, WatermarkSettings};
pub use surface::{RasterSurface, RotationScope};
