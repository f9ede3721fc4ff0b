//! Freehand drawing surface
//!
//! This module provides:
//! - Gesture handling that turns touch events into path model updates
//! - The drawing surface and the imperative handle exposed to its host

pub mod handlers;
pub mod surface;

pub use handlers::{Brush, GestureEvent, GestureTracker, InputRejected};
pub use surface::{CanvasHandle, DrawingSurface};
