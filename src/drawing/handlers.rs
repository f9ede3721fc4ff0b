//! Gesture handlers
//!
//! Handles start/move/end gesture events for the single active stroke.

use thiserror::Error;

use crate::config::{AppConfig, StrokeColor};
use crate::domain::{PathModel, Point};
use crate::render::geometry;

/// One event of a single-touch gesture
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    /// Pen down
    Start(Point),
    /// Pen moved while down
    Move(Point),
    /// Pen up
    End,
}

/// A sample or setting that was dropped instead of applied
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum InputRejected {
    #[error("non-finite point ({x}, {y})")]
    NonFinitePoint { x: f32, y: f32 },
    #[error("invalid stroke width {0}")]
    InvalidWidth(f32),
}

/// Color and width given to new strokes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brush {
    pub color: StrokeColor,
    pub width: f32,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            color: StrokeColor::default(),
            width: geometry::stroke::DEFAULT_WIDTH,
        }
    }
}

impl From<&AppConfig> for Brush {
    fn from(config: &AppConfig) -> Self {
        Self {
            color: config.brush_color,
            width: config.brush_width,
        }
    }
}

/// Turns gesture events into path model mutations
///
/// Only one gesture is tracked at a time: a start while a stroke is in
/// progress is ignored, and an end without a start does nothing.
#[derive(Debug, Clone, Default)]
pub struct GestureTracker {
    brush: Brush,
}

impl GestureTracker {
    pub fn new(brush: Brush) -> Self {
        let brush = if geometry::is_valid_width(brush.width) {
            brush
        } else {
            log::warn!("Invalid brush width {}, using default", brush.width);
            Brush {
                width: geometry::stroke::DEFAULT_WIDTH,
                ..brush
            }
        };
        Self { brush }
    }

    pub fn brush(&self) -> Brush {
        self.brush
    }

    /// Change the brush for strokes started from now on
    pub fn set_brush(&mut self, brush: Brush) -> Result<(), InputRejected> {
        if !geometry::is_valid_width(brush.width) {
            return Err(InputRejected::InvalidWidth(brush.width));
        }
        self.brush = brush;
        Ok(())
    }

    /// Apply one event, returns true if the model changed
    pub fn handle(&self, model: &mut PathModel, event: GestureEvent) -> bool {
        match event {
            GestureEvent::Start(point) => self.on_gesture_start(model, point),
            GestureEvent::Move(point) => self.on_gesture_move(model, point),
            GestureEvent::End => self.on_gesture_end(model),
        }
    }

    pub fn on_gesture_start(&self, model: &mut PathModel, point: Point) -> bool {
        let Some(point) = accept(point) else {
            return false;
        };
        if !model.begin(point, self.brush.color, self.brush.width) {
            log::debug!("Ignoring gesture start while a stroke is in progress");
            return false;
        }
        true
    }

    pub fn on_gesture_move(&self, model: &mut PathModel, point: Point) -> bool {
        let Some(point) = accept(point) else {
            return false;
        };
        model.extend(point)
    }

    pub fn on_gesture_end(&self, model: &mut PathModel) -> bool {
        model.commit()
    }
}

fn validate_point(point: Point) -> Result<Point, InputRejected> {
    if point.is_finite() {
        Ok(point)
    } else {
        Err(InputRejected::NonFinitePoint {
            x: point.x,
            y: point.y,
        })
    }
}

/// Validate a sample, logging and dropping it if malformed
fn accept(point: Point) -> Option<Point> {
    match validate_point(point) {
        Ok(point) => Some(point),
        Err(err) => {
            log::debug!("Dropping gesture sample: {}", err);
            None
        }
    }
}
