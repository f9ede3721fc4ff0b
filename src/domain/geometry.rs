//! Geometric types for the drawing surface

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// A point in surface-local logical coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Both coordinates are finite (no NaN or infinity)
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

impl From<[f32; 2]> for Point {
    fn from([x, y]: [f32; 2]) -> Self {
        Self { x, y }
    }
}

/// Size of the drawing surface in pixels
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Convert to non-zero dimensions, `None` for an empty surface
    pub fn dimensions(self) -> Option<SurfaceDimension> {
        let width = NonZeroU32::new(self.width)?;
        let height = NonZeroU32::new(self.height)?;
        Some(SurfaceDimension { width, height })
    }
}

/// Non-zero dimensions of a surface
#[derive(Clone, Copy, Debug)]
pub struct SurfaceDimension {
    pub width: NonZeroU32,
    pub height: NonZeroU32,
}

impl SurfaceDimension {
    /// Get the width as u32
    pub fn width(&self) -> u32 {
        self.width.get()
    }

    /// Get the height as u32
    pub fn height(&self) -> u32 {
        self.height.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_finite() {
        assert!(Point::new(1.0, -3.5).is_finite());
        assert!(!Point::new(f32::NAN, 0.0).is_finite());
        assert!(!Point::new(0.0, f32::INFINITY).is_finite());
    }

    #[test]
    fn test_zero_size_has_no_dimensions() {
        assert!(SurfaceSize::new(0, 400).dimensions().is_none());
        assert!(SurfaceSize::new(360, 0).dimensions().is_none());
        let dim = SurfaceSize::new(360, 400).dimensions().unwrap();
        assert_eq!((dim.width(), dim.height()), (360, 400));
    }
}
