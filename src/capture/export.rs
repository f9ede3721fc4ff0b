//! Snapshot export of the rendered drawing surface
//!
//! Export always reads the rendered pixels, never the vector model, so what
//! the user sees (including a stroke still being drawn) is what gets sent.

use std::io;

use anyhow::Context;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::RgbaImage;
use thiserror::Error;

use crate::config::{AppConfig, ExportFormat};
use crate::render::Frame;

/// Errors surfaced by an export request
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExportError {
    /// The drawing surface is not mounted (or already torn down)
    #[error("Drawing surface is not available. Please try again.")]
    SurfaceUnavailable,
    /// Any failure while capturing or encoding the surface
    #[error("Failed to export canvas: {0}. Please try drawing again.")]
    ExportFailed(String),
}

/// Export settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportConfig {
    pub format: ExportFormat,
    /// Quality factor in (0, 1], passed through with the image
    pub quality: f32,
    /// Composite transparent pixels onto the surface background
    pub flatten: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: ExportFormat::Png,
            quality: 0.9,
            flatten: true,
        }
    }
}

impl From<&AppConfig> for ExportConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            format: ExportFormat::Png,
            quality: config.export_quality,
            flatten: config.export_flatten,
        }
    }
}

impl ExportConfig {
    fn validate(&self) -> Result<(), ExportError> {
        if !(self.quality > 0.0 && self.quality <= 1.0) {
            return Err(ExportError::ExportFailed(format!(
                "quality must be in (0, 1], got {}",
                self.quality
            )));
        }
        Ok(())
    }
}

/// Encoded image produced by one export call
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedImage {
    bytes: Vec<u8>,
    format: ExportFormat,
    quality: f32,
}

impl ExportedImage {
    /// Encoded payload bytes (never a data URI)
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn format(&self) -> ExportFormat {
        self.format
    }

    pub fn quality(&self) -> f32 {
        self.quality
    }

    /// Plain base64 of the payload, without any data URI prefix
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Result of capturing a surface
#[derive(Debug, Clone, PartialEq)]
pub enum Captured {
    /// Encoded image bytes
    Bytes(Vec<u8>),
    /// Base64 text, possibly prefixed as a `data:` URI
    Encoded(String),
}

/// Something that can hand over its rendered pixels as an encoded image
pub trait SurfaceCapture {
    fn capture(&self, config: &ExportConfig) -> anyhow::Result<Captured>;
}

impl SurfaceCapture for Frame {
    fn capture(&self, config: &ExportConfig) -> anyhow::Result<Captured> {
        let image = self
            .to_rgba_image(config.flatten)
            .context("drawing surface has zero size")?;
        let mut buffer = Vec::new();
        match config.format {
            ExportFormat::Png => write_png(&mut buffer, &image).context("PNG encoding failed")?,
        }
        Ok(Captured::Bytes(buffer))
    }
}

/// Produces [`ExportedImage`]s from a captured surface
pub struct SnapshotExporter;

impl SnapshotExporter {
    /// Capture the surface and return its encoded payload
    ///
    /// `None` means the surface is not mounted. Every capture problem is
    /// reported as [`ExportError::ExportFailed`].
    pub fn export<C: SurfaceCapture + ?Sized>(
        surface: Option<&C>,
        config: &ExportConfig,
    ) -> Result<ExportedImage, ExportError> {
        let surface = surface.ok_or(ExportError::SurfaceUnavailable)?;
        config.validate()?;

        let captured = surface
            .capture(config)
            .map_err(|err| ExportError::ExportFailed(format!("{err:#}")))?;

        let bytes = match captured {
            Captured::Bytes(bytes) => bytes,
            Captured::Encoded(text) => STANDARD
                .decode(strip_data_uri_prefix(&text).trim())
                .map_err(|err| ExportError::ExportFailed(format!("invalid base64 data: {err}")))?,
        };
        if bytes.is_empty() {
            return Err(ExportError::ExportFailed(
                "capture produced no data".to_string(),
            ));
        }

        log::info!(
            "Exported drawing: {} bytes of {} (quality {})",
            bytes.len(),
            config.format.mime_type(),
            config.quality
        );
        Ok(ExportedImage {
            bytes,
            format: config.format,
            quality: config.quality,
        })
    }
}

/// A frame captured for export but not yet encoded
///
/// Owns its pixels, so the drawing can keep changing while it encodes.
#[derive(Debug, Clone)]
pub struct PendingExport {
    frame: Option<Frame>,
    config: ExportConfig,
}

impl PendingExport {
    /// `None` means the surface was not mounted at capture time
    pub fn new(frame: Option<Frame>, config: ExportConfig) -> Self {
        Self { frame, config }
    }

    pub fn export(&self) -> Result<ExportedImage, ExportError> {
        SnapshotExporter::export(self.frame.as_ref(), &self.config)
    }

    /// Encode on the blocking pool and return plain base64
    pub async fn encode(self) -> Result<String, ExportError> {
        let image = tokio::task::spawn_blocking(move || self.export())
            .await
            .map_err(|err| ExportError::ExportFailed(format!("export task failed: {err}")))??;
        Ok(image.to_base64())
    }
}

/// Strip a `data:<mime>;base64,` style prefix, leaving the payload
///
/// Base64 text never contains a comma, so everything after the first comma
/// is the payload.
pub fn strip_data_uri_prefix(encoded: &str) -> &str {
    match encoded.split_once(',') {
        Some((_, payload)) => payload,
        None => encoded,
    }
}

fn write_png<W: io::Write>(w: W, image: &RgbaImage) -> Result<(), png::EncodingError> {
    let mut encoder = png::Encoder::new(w, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(image.as_raw())
}
