//! Client for the remote image analysis service
//!
//! The service accepts a base64 image and answers with a list of intents.

pub mod client;
pub mod error;

use std::future::Future;

use crate::domain::AnalyzeResponse;

pub use client::ApiClient;
pub use error::AnalysisError;

/// Anything that can turn an image into a list of intents
pub trait Analyzer {
    /// Analyze a plain base64 raster image (no data URI prefix)
    fn analyze(
        &self,
        image_base64: &str,
    ) -> impl Future<Output = Result<AnalyzeResponse, AnalysisError>> + Send;
}
