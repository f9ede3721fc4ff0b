//! Image capture module
//!
//! This module consolidates:
//! - Snapshot export of the rendered drawing surface (export.rs)
//! - The image picker collaborator for photos (picker.rs)

pub mod export;
pub mod picker;

pub use export::{
    Captured, ExportConfig, ExportError, ExportedImage, PendingExport, SnapshotExporter,
    SurfaceCapture, strip_data_uri_prefix,
};
pub use picker::{DialogPicker, FilePicker, ImagePicker, PickerError};
