//! HTTP client for the content service.
//!
//! One client implements all three boundary traits: the service exposes
//! preferences, generation and history saves under a single base URL.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use postlab_core::archive::{ContentArchive, ContentRecord};
use postlab_core::config::ApiConfig;
use postlab_core::error::{PostlabError, Result};
use postlab_core::generation::{GenerationBackend, GenerationRequest, PlatformResult};
use postlab_core::preference::{PreferenceRecord, PreferenceStore};

use crate::dto::{GenerateRequestBody, GenerateResponseBody, SaveContentBody};

/// Client for the content service REST API.
#[derive(Debug, Clone)]
pub struct ContentApiClient {
    client: Client,
    base_url: String,
}

impl ContentApiClient {
    /// Builds a client from endpoint settings.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| PostlabError::internal(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read_failure(response: reqwest::Response) -> PostlabError {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "failed to read error body".to_string());
        map_http_error(status, body)
    }
}

#[async_trait]
impl PreferenceStore for ContentApiClient {
    async fn load(&self) -> Result<Option<PreferenceRecord>> {
        let response = self
            .client
            .get(self.url("/preferences/"))
            .send()
            .await
            .map_err(map_transport_error)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::read_failure(response).await);
        }

        let record: PreferenceRecord =
            response
                .json()
                .await
                .map_err(|e| PostlabError::Serialization {
                    format: "JSON".to_string(),
                    message: format!("preference record: {e}"),
                })?;
        Ok(Some(record))
    }

    async fn save(&self, record: PreferenceRecord) -> Result<()> {
        let response = self
            .client
            .post(self.url("/preferences/"))
            .json(&record)
            .send()
            .await
            .map_err(map_transport_error)?;

        if !response.status().is_success() {
            return Err(Self::read_failure(response).await);
        }
        Ok(())
    }
}

#[async_trait]
impl GenerationBackend for ContentApiClient {
    async fn generate(&self, request: GenerationRequest) -> Result<Vec<PlatformResult>> {
        let body = GenerateRequestBody::from(request);
        tracing::debug!(platforms = body.platforms.len(), "submitting generation batch");

        let response = self
            .client
            .post(self.url("/content/generate"))
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        if !response.status().is_success() {
            return Err(Self::read_failure(response).await);
        }

        let parsed: GenerateResponseBody =
            response
                .json()
                .await
                .map_err(|e| PostlabError::Serialization {
                    format: "JSON".to_string(),
                    message: format!("generate response: {e}"),
                })?;

        if let (Some(ok), Some(failed)) = (parsed.success_count, parsed.failure_count) {
            tracing::debug!(ok, failed, "generation batch answered");
        }

        Ok(parsed
            .results
            .into_iter()
            .map(PlatformResult::from)
            .collect())
    }
}

#[async_trait]
impl ContentArchive for ContentApiClient {
    async fn save_content(&self, record: ContentRecord) -> Result<()> {
        let body = SaveContentBody::from(record);
        let response = self
            .client
            .post(self.url("/content/save"))
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        if !response.status().is_success() {
            return Err(Self::read_failure(response).await);
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
}

fn map_transport_error(err: reqwest::Error) -> PostlabError {
    let detail = if err.is_timeout() {
        "request timed out"
    } else if err.is_connect() {
        "connection failed"
    } else {
        "request failed"
    };
    PostlabError::transport(format!("{detail}: {err}"))
}

/// Folds a non-success response into a typed error. The service reports
/// errors as `{"detail": ...}`; anything else is carried verbatim.
fn map_http_error(status: StatusCode, body: String) -> PostlabError {
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|wrapper| wrapper.detail)
        .map(|detail| match detail {
            serde_json::Value::String(text) => text,
            other => other.to_string(),
        })
        .unwrap_or(body);
    PostlabError::api(status.as_u16(), message)
}
