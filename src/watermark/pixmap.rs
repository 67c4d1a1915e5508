//! CPU raster surface backed by an RGBA pixel buffer.
//!
//! `PixmapSurface` is the crate's own `RasterSurface` implementation, used
//! when the host has no platform canvas of its own. Text is rasterized with
//! `ab_glyph` from a font the host supplies as raw bytes; when none is given,
//! well-known system font locations are probed.
//!
//! # Rotation
//!
//! The surface keeps a 2x3 affine transform, mutated by
//! `rotate_about_center` and cleared by `reset_transform`. Rotated text is
//! produced by rasterizing the glyph run into a scratch buffer and
//! inverse-mapping destination pixels with bilinear sampling, so the whole
//! run rotates as one rigid piece.

use std::io::Cursor;

use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use image::{DynamicImage, ImageOutputFormat, Rgba, RgbaImage};

use crate::constants::SYSTEM_FONT_PATHS;

use super::{Color, RasterSurface, WatermarkError};

/// Row-major 2x3 affine transform: `x' = a*x + c*y + e`, `y' = b*x + d*y + f`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Affine {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Affine {
    const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    /// Rotation by `radians` about `(cx, cy)`, y-down (clockwise on screen).
    fn rotation_about(cx: f32, cy: f32, radians: f32) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            e: cx - cx * cos + cy * sin,
            f: cy - cx * sin - cy * cos,
        }
    }

    fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// Compose so that `other` is applied first, then `self`.
    fn then(&self, other: &Affine) -> Self {
        Self {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    fn invert(&self) -> Option<Self> {
        let det = self.a * self.d - self.b * self.c;
        if det.abs() < 1e-9 {
            return None;
        }
        Some(Self {
            a: self.d / det,
            b: -self.b / det,
            c: -self.c / det,
            d: self.a / det,
            e: (self.c * self.f - self.d * self.e) / det,
            f: (self.b * self.e - self.a * self.f) / det,
        })
    }

    fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

/// CPU raster surface over an `RgbaImage`.
pub struct PixmapSurface {
    pixels: RgbaImage,
    font: Option<FontVec>,
    font_size: f32,
    font_family: String,
    fill: Color,
    alpha: f32,
    transform: Affine,
}

impl std::fmt::Debug for PixmapSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixmapSurface")
            .field("dimensions", &(self.pixels.width(), self.pixels.height()))
            .field("has_font", &self.font.is_some())
            .field("font_size", &self.font_size)
            .finish()
    }
}

impl PixmapSurface {
    /// Create a surface with no font loaded. Shape drawing and encoding
    /// work; text operations fail until a font is supplied.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width.max(1), height.max(1)),
            font: None,
            font_size: 16.0,
            font_family: String::new(),
            fill: Color::black(),
            alpha: 1.0,
            transform: Affine::IDENTITY,
        }
    }

    /// Create a surface rendering text with the given font bytes (TTF/OTF).
    pub fn with_font_bytes(
        width: u32,
        height: u32,
        font_bytes: Vec<u8>,
    ) -> Result<Self, WatermarkError> {
        let font = FontVec::try_from_vec(font_bytes)
            .map_err(|e| WatermarkError::Render(format!("Failed to parse font: {}", e)))?;
        let mut surface = Self::new(width, height);
        surface.font = Some(font);
        Ok(surface)
    }

    /// Create a surface using a font discovered on the local system.
    ///
    /// # Errors
    ///
    /// Returns `WatermarkError::Render` if no usable font file is found at
    /// any of the probed locations.
    pub fn with_system_font(width: u32, height: u32) -> Result<Self, WatermarkError> {
        let bytes = discover_system_font().ok_or_else(|| {
            WatermarkError::Render("No system font found at any known location".to_string())
        })?;
        Self::with_font_bytes(width, height, bytes)
    }

    /// Direct read access to the pixel buffer.
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    fn scaled_font(&self) -> Result<(&FontVec, PxScale), WatermarkError> {
        let font = self.font.as_ref().ok_or_else(|| {
            WatermarkError::Render(format!(
                "No font loaded for family '{}'",
                self.font_family
            ))
        })?;
        Ok((font, PxScale::from(self.font_size)))
    }

    /// Rasterize the glyph run into a transparent scratch buffer.
    ///
    /// Returns the scratch image together with the baseline ascent, so the
    /// caller can place the buffer relative to a baseline anchor.
    fn rasterize_run(&self, text: &str) -> Result<(RgbaImage, f32), WatermarkError> {
        let (font, scale) = self.scaled_font()?;
        let scaled = font.as_scaled(scale);

        let width = advance_width(&scaled, text).ceil().max(1.0) as u32;
        let height = scaled.height().ceil().max(1.0) as u32;
        let mut scratch = RgbaImage::new(width, height);

        let ascent = scaled.ascent();
        let alpha = (self.alpha.clamp(0.0, 1.0) * self.fill.a as f32) as u32;

        let mut cursor_x = 0.0f32;
        let mut prev_glyph: Option<ab_glyph::GlyphId> = None;

        for c in text.chars() {
            let glyph_id = scaled.glyph_id(c);
            if let Some(prev) = prev_glyph {
                cursor_x += scaled.kern(prev, glyph_id);
            }

            let glyph = glyph_id.with_scale_and_position(scale, ab_glyph::point(cursor_x, ascent));
            if let Some(outlined) = font.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                outlined.draw(|px, py, coverage| {
                    let x = px as i32 + bounds.min.x as i32;
                    let y = py as i32 + bounds.min.y as i32;
                    if x >= 0 && y >= 0 && x < width as i32 && y < height as i32 {
                        let pixel_alpha = (coverage * alpha as f32) as u8;
                        let pixel = Rgba([self.fill.r, self.fill.g, self.fill.b, pixel_alpha]);
                        let existing = scratch.get_pixel(x as u32, y as u32);
                        let blended = blend_pixels(*existing, pixel);
                        scratch.put_pixel(x as u32, y as u32, blended);
                    }
                });
            }

            cursor_x += scaled.h_advance(glyph_id);
            prev_glyph = Some(glyph_id);
        }

        Ok((scratch, ascent))
    }

    /// Composite `scratch` onto the canvas with its top-left corner at the
    /// untransformed point `(origin_x, origin_y)`, through the current
    /// transform.
    fn composite_scratch(&mut self, scratch: &RgbaImage, origin_x: f32, origin_y: f32) {
        if self.transform.is_identity() {
            self.blit(scratch, origin_x.round() as i32, origin_y.round() as i32);
            return;
        }
        self.blit_transformed(scratch, origin_x, origin_y);
    }

    /// Clamped source-over blit at an integer offset.
    fn blit(&mut self, src: &RgbaImage, at_x: i32, at_y: i32) {
        let target_width = self.pixels.width() as i32;
        let target_height = self.pixels.height() as i32;
        let src_width = src.width() as i32;
        let src_height = src.height() as i32;

        let x_start = at_x.max(0);
        let y_start = at_y.max(0);
        let x_end = (at_x + src_width).min(target_width);
        let y_end = (at_y + src_height).min(target_height);

        for ty in y_start..y_end {
            for tx in x_start..x_end {
                let sx = (tx - at_x) as u32;
                let sy = (ty - at_y) as u32;
                let top = *src.get_pixel(sx, sy);
                if top[3] == 0 {
                    continue;
                }
                let bottom = *self.pixels.get_pixel(tx as u32, ty as u32);
                self.pixels
                    .put_pixel(tx as u32, ty as u32, blend_pixels(bottom, top));
            }
        }
    }

    /// Inverse-mapped blit with bilinear sampling for non-identity
    /// transforms.
    fn blit_transformed(&mut self, src: &RgbaImage, origin_x: f32, origin_y: f32) {
        let inverse = match self.transform.invert() {
            Some(inv) => inv,
            // Rotations are always invertible; a degenerate transform draws
            // nothing.
            None => return,
        };

        let src_w = src.width() as f32;
        let src_h = src.height() as f32;

        // Destination bounding box of the transformed scratch rect.
        let corners = [
            self.transform.apply(origin_x, origin_y),
            self.transform.apply(origin_x + src_w, origin_y),
            self.transform.apply(origin_x, origin_y + src_h),
            self.transform.apply(origin_x + src_w, origin_y + src_h),
        ];
        let min_x = corners.iter().map(|(x, _)| *x).fold(f32::INFINITY, f32::min);
        let max_x = corners
            .iter()
            .map(|(x, _)| *x)
            .fold(f32::NEG_INFINITY, f32::max);
        let min_y = corners.iter().map(|(_, y)| *y).fold(f32::INFINITY, f32::min);
        let max_y = corners
            .iter()
            .map(|(_, y)| *y)
            .fold(f32::NEG_INFINITY, f32::max);

        let x_start = (min_x.floor() as i32).max(0);
        let y_start = (min_y.floor() as i32).max(0);
        let x_end = (max_x.ceil() as i32 + 1).min(self.pixels.width() as i32);
        let y_end = (max_y.ceil() as i32 + 1).min(self.pixels.height() as i32);

        for dy in y_start..y_end {
            for dx in x_start..x_end {
                // Map the destination pixel back into scratch coordinates.
                let (ux, uy) = inverse.apply(dx as f32, dy as f32);
                let sx = ux - origin_x;
                let sy = uy - origin_y;

                if sx < 0.0 || sy < 0.0 || sx >= src_w - 1.0 || sy >= src_h - 1.0 {
                    continue;
                }

                let top = bilinear_sample(src, sx, sy);
                if top[3] == 0 {
                    continue;
                }
                let bottom = *self.pixels.get_pixel(dx as u32, dy as u32);
                self.pixels
                    .put_pixel(dx as u32, dy as u32, blend_pixels(bottom, top));
            }
        }
    }
}

impl RasterSurface for PixmapSurface {
    fn width(&self) -> u32 {
        self.pixels.width()
    }

    fn height(&self) -> u32 {
        self.pixels.height()
    }

    fn clear(&mut self) {
        for pixel in self.pixels.pixels_mut() {
            *pixel = Rgba([0, 0, 0, 0]);
        }
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        let x_start = (x.floor() as i32).max(0);
        let y_start = (y.floor() as i32).max(0);
        let x_end = ((x + width).ceil() as i32).min(self.pixels.width() as i32);
        let y_end = ((y + height).ceil() as i32).min(self.pixels.height() as i32);

        let top = Rgba([color.r, color.g, color.b, color.a]);
        for py in y_start..y_end {
            for px in x_start..x_end {
                let bottom = *self.pixels.get_pixel(px as u32, py as u32);
                self.pixels
                    .put_pixel(px as u32, py as u32, blend_pixels(bottom, top));
            }
        }
    }

    fn set_font(&mut self, size: f32, family: &str) {
        self.font_size = size;
        // Single-font surface: the family is recorded for diagnostics only.
        self.font_family = family.to_string();
    }

    fn set_fill_color(&mut self, color: Color) {
        self.fill = color;
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha;
    }

    fn measure_text(&mut self, text: &str) -> Result<f32, WatermarkError> {
        if text.is_empty() {
            return Ok(0.0);
        }
        let (font, scale) = self.scaled_font()?;
        Ok(advance_width(&font.as_scaled(scale), text))
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32) -> Result<(), WatermarkError> {
        if text.is_empty() {
            return Ok(());
        }
        let (scratch, ascent) = self.rasterize_run(text)?;
        // The baseline anchor is (x, y); the scratch baseline sits at
        // `ascent` below its top edge.
        self.composite_scratch(&scratch, x, y - ascent);
        Ok(())
    }

    fn rotate_about_center(&mut self, degrees: f32) {
        let cx = self.pixels.width() as f32 / 2.0;
        let cy = self.pixels.height() as f32 / 2.0;
        let rotation = Affine::rotation_about(cx, cy, degrees.to_radians());
        self.transform = self.transform.then(&rotation);
    }

    fn reset_transform(&mut self) {
        self.transform = Affine::IDENTITY;
    }

    fn encode_png(&mut self) -> Result<Vec<u8>, WatermarkError> {
        let mut out = Vec::new();
        DynamicImage::ImageRgba8(self.pixels.clone())
            .write_to(&mut Cursor::new(&mut out), ImageOutputFormat::Png)
            .map_err(|e| WatermarkError::Encode(format!("PNG encoding failed: {}", e)))?;
        Ok(out)
    }
}

/// Kerned advance width of `text` in pixels.
fn advance_width<F, SF>(scaled: &SF, text: &str) -> f32
where
    F: Font,
    SF: ScaleFont<F>,
{
    let mut width = 0.0f32;
    let mut prev_glyph: Option<ab_glyph::GlyphId> = None;

    for c in text.chars() {
        let glyph_id = scaled.glyph_id(c);
        if let Some(prev) = prev_glyph {
            width += scaled.kern(prev, glyph_id);
        }
        width += scaled.h_advance(glyph_id);
        prev_glyph = Some(glyph_id);
    }

    width
}

/// Blend two RGBA pixels using source-over alpha compositing.
fn blend_pixels(bottom: Rgba<u8>, top: Rgba<u8>) -> Rgba<u8> {
    let top_alpha = top[3] as f32 / 255.0;
    let bottom_alpha = bottom[3] as f32 / 255.0;

    let out_alpha = top_alpha + bottom_alpha * (1.0 - top_alpha);

    if out_alpha < 0.001 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend = |t: u8, b: u8| -> u8 {
        let t = t as f32 / 255.0;
        let b = b as f32 / 255.0;
        let result = (t * top_alpha + b * bottom_alpha * (1.0 - top_alpha)) / out_alpha;
        (result * 255.0) as u8
    };

    Rgba([
        blend(top[0], bottom[0]),
        blend(top[1], bottom[1]),
        blend(top[2], bottom[2]),
        (out_alpha * 255.0) as u8,
    ])
}

/// Bilinear sample of `src` at fractional coordinates.
fn bilinear_sample(src: &RgbaImage, x: f32, y: f32) -> Rgba<u8> {
    let x0 = x.floor() as u32;
    let y0 = y.floor() as u32;
    let x1 = x0 + 1;
    let y1 = y0 + 1;

    let fx = x - x0 as f32;
    let fy = y - y0 as f32;

    let p00 = src.get_pixel(x0, y0);
    let p10 = src.get_pixel(x1, y0);
    let p01 = src.get_pixel(x0, y1);
    let p11 = src.get_pixel(x1, y1);

    let interpolate = |c: usize| -> u8 {
        let v = p00[c] as f32 * (1.0 - fx) * (1.0 - fy)
            + p10[c] as f32 * fx * (1.0 - fy)
            + p01[c] as f32 * (1.0 - fx) * fy
            + p11[c] as f32 * fx * fy;
        v.clamp(0.0, 255.0) as u8
    };

    Rgba([
        interpolate(0),
        interpolate(1),
        interpolate(2),
        interpolate(3),
    ])
}

/// Probe well-known system font locations, returning the first readable
/// font file.
pub fn discover_system_font() -> Option<Vec<u8>> {
    for path in SYSTEM_FONT_PATHS {
        if let Ok(bytes) = std::fs::read(path) {
            tracing::debug!(path, "using system font");
            return Some(bytes);
        }
    }
    None
}
