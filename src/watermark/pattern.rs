//! Watermark pattern renderer.
//!
//! Lays out a repeating, rotated, semi-transparent text pattern onto a
//! raster surface and encodes the result as a PNG. The layout is fully
//! deterministic: the same settings on a fresh surface produce byte-identical
//! output, which is what lets the host cache and diff previews.
//!
//! # Layout
//!
//! Spacing divides the canvas evenly by tile count per axis; the grid is then
//! centered with the first column shifted by half the measured text width.
//! Spacing is deliberately not reduced to fit the last tile's width, so the
//! rightmost tile may overhang the nominal edge when the text is wide
//! relative to its spacing. Rotation is applied once, to the whole grid as a
//! rigid body about the surface center; tiles are never rotated individually.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::constants::{
    CHECKER_BLOCK_SIZE, CHECKER_DARK, CHECKER_LIGHT, SOLID_BACKGROUND,
};

use super::settings::resolve_density;
use super::surface::RotationScope;
use super::{parse_hex_color, RasterSurface, RenderMode, WatermarkError, WatermarkSettings};

/// A rendered watermark pattern, encoded as a lossless PNG.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    bytes: Vec<u8>,
}

impl EncodedImage {
    /// Wrap already-encoded PNG bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// The raw PNG bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume into the raw PNG bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Base64 data URL form, usable directly as a `watermark_path` value.
    pub fn to_data_url(&self) -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(&self.bytes))
    }
}

/// Render the watermark pattern described by `settings` onto `surface`.
///
/// Never fails for structurally valid settings; capability failures from the
/// surface are propagated as `WatermarkError::Render` / `Encode` without
/// retry. The surface transform is reset on every exit path.
pub fn render_pattern<S: RasterSurface + ?Sized>(
    settings: &WatermarkSettings,
    mode: RenderMode,
    surface: &mut S,
) -> Result<EncodedImage, WatermarkError> {
    settings.validate()?;
    if surface.width() != settings.canvas_width || surface.height() != settings.canvas_height {
        return Err(WatermarkError::InvalidSettings(format!(
            "surface is {}x{} but settings expect {}x{}",
            surface.width(),
            surface.height(),
            settings.canvas_width,
            settings.canvas_height
        )));
    }
    let color = parse_hex_color(&settings.color)?;
    let h_density = resolve_density(settings.horizontal_density)?;
    let v_density = resolve_density(settings.vertical_density)?;

    surface.clear();
    paint_background(surface, mode);

    surface.set_font(settings.font_size, &settings.font_family);
    surface.set_fill_color(color);
    surface.set_alpha(settings.opacity);

    let text_width = surface.measure_text(&settings.text)?;
    let text_height = settings.font_size;

    let canvas_width = settings.canvas_width as f32;
    let canvas_height = settings.canvas_height as f32;

    let h_spacing = canvas_width / h_density as f32;
    let v_spacing = canvas_height / v_density as f32;

    // Center the grid as a whole; the horizontal start also absorbs the
    // text width so a single column lands dead center.
    let start_x = (canvas_width - (h_density - 1) as f32 * h_spacing - text_width) / 2.0;
    let start_y = (canvas_height - (v_density - 1) as f32 * v_spacing) / 2.0;

    {
        let mut scope = RotationScope::new(surface, settings.angle);
        for i in 0..v_density {
            for j in 0..h_density {
                let x = start_x + j as f32 * h_spacing;
                let y = start_y + i as f32 * v_spacing + text_height / 2.0;
                scope.surface().draw_text(&settings.text, x, y)?;
            }
        }
    }

    tracing::debug!(
        tiles = h_density * v_density,
        text_width,
        angle = settings.angle,
        "rendered watermark pattern"
    );

    Ok(EncodedImage::new(surface.encode_png()?))
}

/// Pick the checkerboard tone for the block containing `(x, y)`.
pub fn checker_tone(x: u32, y: u32) -> crate::watermark::Color {
    if (x / CHECKER_BLOCK_SIZE + y / CHECKER_BLOCK_SIZE) % 2 == 0 {
        CHECKER_LIGHT
    } else {
        CHECKER_DARK
    }
}

fn paint_background<S: RasterSurface + ?Sized>(surface: &mut S, mode: RenderMode) {
    let width = surface.width();
    let height = surface.height();

    match mode {
        RenderMode::Solid => {
            surface.fill_rect(0.0, 0.0, width as f32, height as f32, SOLID_BACKGROUND);
        }
        RenderMode::Checkerboard => {
            let block = CHECKER_BLOCK_SIZE;
            let mut y = 0;
            while y < height {
                let mut x = 0;
                while x < width {
                    surface.fill_rect(
                        x as f32,
                        y as f32,
                        block as f32,
                        block as f32,
                        checker_tone(x, y),
                    );
                    x += block;
                }
                y += block;
            }
        }
    }
}
