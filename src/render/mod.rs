//! Stroke rendering module
//!
//! This module contains:
//! - Geometry constants and math shared by the renderer and the gesture tracker
//! - Surface rendering using tiny-skia (the on-screen raster and export source)

pub mod geometry;
pub mod image;

pub use self::image::{Frame, SurfaceRenderer};
