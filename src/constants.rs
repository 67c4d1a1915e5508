// Constants module - centralized default values for configuration
//
// This module defines all default values used throughout the codebase.
// Using constants instead of magic numbers improves maintainability
// and makes it easier to understand and modify defaults.

use crate::watermark::Color;

// =============================================================================
// Job coordinator defaults
// =============================================================================

/// Default poll cadence for job status queries in milliseconds
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

/// Default processing backend request timeout in seconds
pub const DEFAULT_BACKEND_TIMEOUT_SECS: u64 = 30;

/// Default processing backend base URL
pub const DEFAULT_BACKEND_BASE_URL: &str = "http://localhost:8080";

// =============================================================================
// Watermark renderer defaults
// =============================================================================

/// Background tone for solid-background previews
pub const SOLID_BACKGROUND: Color = Color::rgb(0xf3, 0xf4, 0xf6);

/// Light tone of the transparency-indicator checkerboard
pub const CHECKER_LIGHT: Color = Color::rgb(0xff, 0xff, 0xff);

/// Dark tone of the transparency-indicator checkerboard
pub const CHECKER_DARK: Color = Color::rgb(0xe0, 0xe0, 0xe0);

/// Edge length of one checkerboard block in surface units
pub const CHECKER_BLOCK_SIZE: u32 = 10;

// =============================================================================
// Font discovery
// =============================================================================

/// Well-known font locations probed by `PixmapSurface` when the host does
/// not supply font bytes of its own.
pub const SYSTEM_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
];
