//! HTTP client for the analysis endpoint

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{AnalysisError, Analyzer};
use crate::config::AppConfig;
use crate::domain::{AnalyzeRequest, AnalyzeResponse};

/// JSON-over-HTTP client for the analysis service
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Path of the analysis endpoint, relative to the base URL
    pub const ANALYZE_PATH: &'static str = "/api/v1/analyze";

    pub fn new(config: &AppConfig) -> Result<Self, AnalysisError> {
        Self::with_timeouts(
            &config.api_base_url,
            config.request_timeout(),
            config.connect_timeout(),
        )
    }

    pub fn with_timeouts(
        base_url: &str,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self, AnalysisError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|err| AnalysisError::Client(err.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST a JSON body and decode a JSON answer
    ///
    /// Non-success statuses carry the status code, reason and raw body text.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, AnalysisError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let network = |source| AnalysisError::Network {
            url: url.clone(),
            source,
        };

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(network)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::warn!("Analysis request to {} failed with {}", url, status);
            return Err(AnalysisError::Status {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                body,
            });
        }

        let bytes = response.bytes().await.map_err(network)?;
        serde_json::from_slice(&bytes).map_err(|err| AnalysisError::Decode(err.to_string()))
    }

    /// Submit an image for analysis
    pub async fn analyze_image(&self, image_base64: &str) -> Result<AnalyzeResponse, AnalysisError> {
        let request = AnalyzeRequest {
            image_base64: image_base64.to_string(),
        };
        log::info!(
            "Submitting {} bytes of base64 image for analysis",
            request.image_base64.len()
        );
        let response: AnalyzeResponse = self.post_json(Self::ANALYZE_PATH, &request).await?;
        log::info!("Analysis returned {} intents", response.intents.len());
        Ok(response)
    }
}

impl Analyzer for ApiClient {
    async fn analyze(&self, image_base64: &str) -> Result<AnalyzeResponse, AnalysisError> {
        self.analyze_image(image_base64).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::with_timeouts(
            "http://localhost:8000/",
            Duration::from_secs(5),
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(
            client.url(ApiClient::ANALYZE_PATH),
            "http://localhost:8000/api/v1/analyze"
        );
    }

    #[tokio::test]
    async fn test_unreachable_service_is_network_error() {
        let client = ApiClient::with_timeouts(
            "http://127.0.0.1:1",
            Duration::from_secs(2),
            Duration::from_secs(1),
        )
        .unwrap();
        let err = client.analyze_image("AAAA").await.unwrap_err();
        assert!(matches!(err, AnalysisError::Network { .. }));
    }
}
