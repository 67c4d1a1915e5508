//! Raster surface capability.
//!
//! The pattern renderer does not rasterize pixels itself; it draws through
//! this capability trait, which the host platform supplies. The crate ships
//! one concrete implementation (`PixmapSurface`), and tests use scripted
//! fakes that record draw calls.
//!
//! The transform state is global and mutable, like a 2D canvas context.
//! `RotationScope` wraps the rotate/reset pair so the transform cannot leak
//! to later users of the surface, even when a draw call fails mid-pattern.

use super::{Color, WatermarkError};

/// Drawing capability required by the pattern renderer.
///
/// Coordinates are in surface units with the origin at the top-left corner.
/// `draw_text` anchors at the text baseline, matching 2D canvas semantics.
pub trait RasterSurface {
    /// Surface width in units.
    fn width(&self) -> u32;

    /// Surface height in units.
    fn height(&self) -> u32;

    /// Reset every pixel to fully transparent.
    fn clear(&mut self);

    /// Fill an axis-aligned rectangle with `color`, source-over.
    ///
    /// Rectangles are not subject to the rotation transform; the renderer
    /// only paints backgrounds before rotating.
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color);

    /// Set the font used by subsequent `measure_text`/`draw_text` calls.
    fn set_font(&mut self, size: f32, family: &str);

    /// Set the fill color for subsequent text draws.
    fn set_fill_color(&mut self, color: Color);

    /// Set the global alpha applied to subsequent text draws.
    fn set_alpha(&mut self, alpha: f32);

    /// Measure the advance width of `text` at the configured font.
    fn measure_text(&mut self, text: &str) -> Result<f32, WatermarkError>;

    /// Draw `text` with its baseline anchor at `(x, y)`, through the
    /// current transform.
    fn draw_text(&mut self, text: &str, x: f32, y: f32) -> Result<(), WatermarkError>;

    /// Rotate the coordinate frame by `degrees` about the surface center.
    fn rotate_about_center(&mut self, degrees: f32);

    /// Restore the identity transform.
    fn reset_transform(&mut self);

    /// Encode the surface contents as a lossless PNG.
    fn encode_png(&mut self) -> Result<Vec<u8>, WatermarkError>;
}

/// Scoped rotation of a surface's coordinate frame.
///
/// Rotates on construction and resets the transform when dropped, so every
/// exit path out of the tile-drawing block restores the identity transform.
pub struct RotationScope<'a, S: RasterSurface + ?Sized> {
    surface: &'a mut S,
}

impl<'a, S: RasterSurface + ?Sized> RotationScope<'a, S> {
    /// Enter a rotated coordinate frame.
    pub fn new(surface: &'a mut S, degrees: f32) -> Self {
        surface.rotate_about_center(degrees);
        Self { surface }
    }

    /// Access the surface inside the rotated frame.
    pub fn surface(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: RasterSurface + ?Sized> Drop for RotationScope<'_, S> {
    fn drop(&mut self) {
        self.surface.reset_transform();
    }
}
