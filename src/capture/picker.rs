//! Image picker collaborator
//!
//! Pickers hand back a plain base64 image (no data URI prefix), or `None`
//! when the user cancels. Their output is interchangeable with a canvas
//! export as input to the analysis call.

use std::io;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::ImageFormat;
use thiserror::Error;

/// Errors from picking an image
#[derive(Debug, Error)]
pub enum PickerError {
    /// The OS refused access to the file or device
    #[error("Permission to access {} was denied", .0.display())]
    PermissionDenied(PathBuf),
    /// The file is not a PNG or JPEG image
    #[error("Unsupported image file {}: {reason}", .path.display())]
    Unsupported { path: PathBuf, reason: String },
    /// Any other read failure
    #[error("Failed to read image {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Source of a user-chosen image
pub trait ImagePicker {
    /// Pick an image, `Ok(None)` if the user cancelled
    fn pick(&self) -> Result<Option<String>, PickerError>;
}

/// Picker for a known file path
#[derive(Debug, Clone)]
pub struct FilePicker {
    path: PathBuf,
}

impl FilePicker {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ImagePicker for FilePicker {
    fn pick(&self) -> Result<Option<String>, PickerError> {
        let bytes = std::fs::read(&self.path).map_err(|source| match source.kind() {
            io::ErrorKind::PermissionDenied => PickerError::PermissionDenied(self.path.clone()),
            _ => PickerError::Io {
                path: self.path.clone(),
                source,
            },
        })?;

        let format = image::guess_format(&bytes).map_err(|err| PickerError::Unsupported {
            path: self.path.clone(),
            reason: err.to_string(),
        })?;
        if !matches!(format, ImageFormat::Png | ImageFormat::Jpeg) {
            return Err(PickerError::Unsupported {
                path: self.path.clone(),
                reason: format!("{format:?} images are not supported"),
            });
        }

        log::info!(
            "Picked {:?} image {} ({} bytes)",
            format,
            self.path.display(),
            bytes.len()
        );
        Ok(Some(STANDARD.encode(&bytes)))
    }
}

/// Picker backed by the native file dialog
#[derive(Debug, Clone, Copy, Default)]
pub struct DialogPicker;

impl ImagePicker for DialogPicker {
    fn pick(&self) -> Result<Option<String>, PickerError> {
        let Some(path) = rfd::FileDialog::new()
            .set_title("Choose an image")
            .add_filter("Images", &["png", "jpg", "jpeg"])
            .pick_file()
        else {
            log::debug!("Image dialog cancelled");
            return Ok(None);
        };
        FilePicker::new(path).pick()
    }
}
