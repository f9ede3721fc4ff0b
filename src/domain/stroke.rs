//! Freehand stroke types and the in-memory path model
//!
//! All points are stored in surface-local logical coordinates.

use crate::config::StrokeColor;

use super::geometry::Point;

/// One pen-down to pen-up drawing gesture
///
/// Color and width are fixed when the stroke starts. A stroke always holds
/// at least one point; a single point is drawn as a dot.
#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
    points: Vec<Point>,
    color: StrokeColor,
    width: f32,
}

impl Stroke {
    /// Start a new stroke seeded with its first point
    pub fn new(start: Point, color: StrokeColor, width: f32) -> Self {
        Self {
            points: vec![start],
            color,
            width,
        }
    }

    pub(crate) fn push(&mut self, point: Point) {
        self.points.push(point);
    }

    /// Points in capture order
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn color(&self) -> StrokeColor {
        self.color
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    /// Check if every point sits on the same coordinate (renders as a dot)
    pub fn is_dot(&self) -> bool {
        let first = self.points[0];
        self.points.iter().all(|p| *p == first)
    }
}

/// Completed strokes plus at most one in-progress stroke
///
/// `revision` increases on every mutation and `epoch` on every clear, so a
/// renderer can tell whether a cached raster of the completed strokes is
/// still valid.
#[derive(Clone, Debug, Default)]
pub struct PathModel {
    completed: Vec<Stroke>,
    active: Option<Stroke>,
    revision: u64,
    epoch: u64,
}

impl PathModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the active stroke
    ///
    /// Returns false and leaves the model untouched if a stroke is already
    /// in progress.
    pub fn begin(&mut self, start: Point, color: StrokeColor, width: f32) -> bool {
        if self.active.is_some() {
            return false;
        }
        self.active = Some(Stroke::new(start, color, width));
        self.revision += 1;
        true
    }

    /// Append a point to the active stroke, false if there is none
    pub fn extend(&mut self, point: Point) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        active.push(point);
        self.revision += 1;
        true
    }

    /// Move the active stroke to the end of the completed list
    pub fn commit(&mut self) -> bool {
        let Some(stroke) = self.active.take() else {
            return false;
        };
        self.completed.push(stroke);
        self.revision += 1;
        true
    }

    /// Hard reset: drop every stroke, including one still being drawn
    pub fn clear(&mut self) {
        self.completed.clear();
        self.active = None;
        self.revision += 1;
        self.epoch += 1;
    }

    /// Read-only view for rendering
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            completed: &self.completed,
            active: self.active.as_ref(),
            revision: self.revision,
            epoch: self.epoch,
        }
    }

    pub fn completed(&self) -> &[Stroke] {
        &self.completed
    }

    pub fn active(&self) -> Option<&Stroke> {
        self.active.as_ref()
    }

    /// Check if a gesture is currently in progress
    pub fn is_drawing(&self) -> bool {
        self.active.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.completed.is_empty() && self.active.is_none()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// Immutable view of the drawing state at one point in time
#[derive(Clone, Copy, Debug)]
pub struct Snapshot<'a> {
    pub completed: &'a [Stroke],
    pub active: Option<&'a Stroke>,
    pub revision: u64,
    pub epoch: u64,
}

impl<'a> Snapshot<'a> {
    /// Strokes in draw order, the active one last
    pub fn strokes(&self) -> impl Iterator<Item = &'a Stroke> + use<'a> {
        self.completed.iter().chain(self.active)
    }

    pub fn is_empty(&self) -> bool {
        self.completed.is_empty() && self.active.is_none()
    }
}
