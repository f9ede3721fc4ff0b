//! Drawing surface and its imperative handle
//!
//! The surface owns the path model, the gesture tracker and the renderer.
//! Hosts only see the [`CanvasHandle`] capability plus read-only accessors.

use std::future::Future;

use crate::capture::{ExportConfig, ExportError, ExportedImage, PendingExport};
use crate::config::{AppConfig, StrokeColor};
use crate::domain::{PathModel, Snapshot, SurfaceSize};
use crate::render::SurfaceRenderer;

use super::handlers::{Brush, GestureEvent, GestureTracker, InputRejected};

/// Capability handed to the screen hosting a drawing surface
pub trait CanvasHandle {
    /// Hard reset of the drawing, including a stroke in progress
    fn clear(&mut self);

    /// Capture the current frame; the result does not borrow the surface
    fn capture(&self) -> PendingExport;

    /// Export the rendered surface as plain base64 (no data URI prefix)
    fn export_to_image(&self) -> impl Future<Output = Result<String, ExportError>> + Send {
        self.capture().encode()
    }
}

/// A freehand drawing surface
pub struct DrawingSurface {
    model: PathModel,
    tracker: GestureTracker,
    renderer: Option<SurfaceRenderer>,
    background: StrokeColor,
    export_config: ExportConfig,
}

impl DrawingSurface {
    /// Create an unmounted surface
    pub fn new(config: &AppConfig) -> Self {
        Self {
            model: PathModel::new(),
            tracker: GestureTracker::new(Brush::from(config)),
            renderer: None,
            background: config.background_color,
            export_config: ExportConfig::from(config),
        }
    }

    /// Create a surface already mounted at the configured size
    pub fn mounted(config: &AppConfig) -> Self {
        let mut surface = Self::new(config);
        surface.mount(config.surface_size());
        surface
    }

    /// Attach a render target of the given size and draw the current model
    pub fn mount(&mut self, size: SurfaceSize) {
        log::debug!("Mounting drawing surface {}x{}", size.width, size.height);
        self.renderer = Some(SurfaceRenderer::new(size, self.background));
        self.render();
    }

    /// Drop the render target; exports fail until mounted again
    pub fn unmount(&mut self) {
        self.renderer = None;
    }

    pub fn is_mounted(&self) -> bool {
        self.renderer.is_some()
    }

    /// Apply a gesture event, re-rendering if the model changed
    pub fn handle_gesture(&mut self, event: GestureEvent) -> bool {
        let changed = self.tracker.handle(&mut self.model, event);
        if changed {
            self.render();
        }
        changed
    }

    pub fn brush(&self) -> Brush {
        self.tracker.brush()
    }

    pub fn set_brush(&mut self, brush: Brush) -> Result<(), InputRejected> {
        self.tracker.set_brush(brush)
    }

    pub fn export_config(&self) -> ExportConfig {
        self.export_config
    }

    pub fn set_export_config(&mut self, config: ExportConfig) {
        self.export_config = config;
    }

    pub fn model(&self) -> &PathModel {
        &self.model
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        self.model.snapshot()
    }

    pub fn renderer(&self) -> Option<&SurfaceRenderer> {
        self.renderer.as_ref()
    }

    /// Export the current frame synchronously
    pub fn export(&self) -> Result<ExportedImage, ExportError> {
        self.capture().export()
    }

    fn render(&mut self) {
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.render(self.model.snapshot());
        }
    }
}

impl CanvasHandle for DrawingSurface {
    fn clear(&mut self) {
        self.model.clear();
        self.render();
    }

    fn capture(&self) -> PendingExport {
        let frame = self.renderer.as_ref().map(SurfaceRenderer::frame);
        PendingExport::new(frame, self.export_config)
    }
}
