//! Shared geometry calculations for strokes
//!
//! Constants and math shared between the gesture tracker (brush validation)
//! and the tiny-skia renderer.

/// Stroke width constants
pub mod stroke {
    /// Default stroke width in logical pixels
    pub const DEFAULT_WIDTH: f32 = 4.0;
    /// Narrowest width the renderer will draw
    pub const MIN_WIDTH: f32 = 0.5;
}

/// Width actually used when drawing a stroke of the requested width
#[inline]
pub fn effective_width(width: f32) -> f32 {
    if width.is_finite() {
        width.max(stroke::MIN_WIDTH)
    } else {
        stroke::DEFAULT_WIDTH
    }
}

/// Radius of the filled dot drawn for a single-point stroke
#[inline]
pub fn dot_radius(width: f32) -> f32 {
    effective_width(width) * 0.5
}

/// Check whether a width is usable for a new brush
#[inline]
pub fn is_valid_width(width: f32) -> bool {
    width.is_finite() && width > 0.0
}
