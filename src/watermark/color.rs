//! Color parsing for watermark settings.
//!
//! The color token carried by `WatermarkSettings` is a CSS-style hex string.
//! Supported formats are `#RGB`, `#RRGGBB` and `#RRGGBBAA`.

use super::WatermarkError;

/// An RGBA color parsed from a hex token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Create a fully opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a color with an explicit alpha channel.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// White color.
    pub const fn white() -> Self {
        Self::rgb(255, 255, 255)
    }

    /// Black color.
    pub const fn black() -> Self {
        Self::rgb(0, 0, 0)
    }
}

fn hex_pair(hex: &str, range: std::ops::Range<usize>) -> Result<u8, WatermarkError> {
    u8::from_str_radix(&hex[range], 16)
        .map_err(|_| WatermarkError::InvalidSettings("Invalid hex digit in color".to_string()))
}

/// Parse a hex color string into RGBA components.
///
/// Supports `#RGB`, `#RRGGBB` and `#RRGGBBAA` formats. Short-form components
/// are doubled (`0xF` becomes `0xFF`). Alpha defaults to fully opaque.
///
/// # Examples
///
/// ```
/// use sukashi::watermark::{parse_hex_color, Color};
///
/// assert_eq!(parse_hex_color("#FFF").unwrap(), Color::white());
/// assert_eq!(parse_hex_color("#ff000080").unwrap(), Color::rgba(255, 0, 0, 128));
/// ```
pub fn parse_hex_color(hex: &str) -> Result<Color, WatermarkError> {
    let hex = hex.strip_prefix('#').ok_or_else(|| {
        WatermarkError::InvalidSettings("Color must start with '#'".to_string())
    })?;

    match hex.len() {
        3 => {
            // #RGB format - each character represents a hex digit, doubled
            let r = hex_pair(hex, 0..1)?;
            let g = hex_pair(hex, 1..2)?;
            let b = hex_pair(hex, 2..3)?;
            // Double each component: 0xF -> 0xFF, 0xA -> 0xAA
            Ok(Color::rgb(r * 17, g * 17, b * 17))
        }
        6 => Ok(Color::rgb(
            hex_pair(hex, 0..2)?,
            hex_pair(hex, 2..4)?,
            hex_pair(hex, 4..6)?,
        )),
        8 => Ok(Color::rgba(
            hex_pair(hex, 0..2)?,
            hex_pair(hex, 2..4)?,
            hex_pair(hex, 4..6)?,
            hex_pair(hex, 6..8)?,
        )),
        _ => Err(WatermarkError::InvalidSettings(format!(
            "Color must be #RGB, #RRGGBB or #RRGGBBAA format, got {} characters",
            hex.len()
        ))),
    }
}
