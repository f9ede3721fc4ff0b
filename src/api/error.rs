//! Error types for the analysis client

use thiserror::Error;

/// Errors that can occur while calling the analysis service
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The service answered with a non-success status
    #[error("API request failed: {status} {status_text}. {body}")]
    Status {
        status: u16,
        status_text: String,
        body: String,
    },

    /// Connection, TLS or timeout failure
    #[error("Could not reach analysis service at {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The body was not a valid analysis response
    #[error("Invalid analysis response: {0}")]
    Decode(String),

    /// The HTTP client could not be created
    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

impl AnalysisError {
    /// HTTP status of a rejected request, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            AnalysisError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
