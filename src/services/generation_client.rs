//! Generation Client for pwgen.
//!
//! Turns a settings snapshot into a form-encoded request against the external
//! generator and normalizes the JSON answer into a [`GenerationResult`].

use std::future::Future;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use crate::types::config::ClientConfig;
use crate::types::errors::GenerationError;
use crate::types::generation::{endpoint_url, GenerationRequest, GenerationResult, MAX_BATCH_SIZE};
use crate::types::settings::Settings;

/// Raw answer from the transport: status code plus body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// Sends a form-encoded POST and hands back the raw response.
pub trait GeneratorTransport: Send + Sync {
    fn post_form(
        &self,
        url: &str,
        form: Vec<(&'static str, String)>,
    ) -> impl Future<Output = Result<TransportResponse, GenerationError>> + Send;
}

/// HTTP transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GenerationError::Network(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

impl GeneratorTransport for HttpTransport {
    fn post_form(
        &self,
        url: &str,
        form: Vec<(&'static str, String)>,
    ) -> impl Future<Output = Result<TransportResponse, GenerationError>> + Send {
        let request = self.client.post(url).form(&form);
        async move {
            let response = request
                .send()
                .await
                .map_err(|e| GenerationError::Network(e.to_string()))?;
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(|e| GenerationError::Network(format!("Failed to read body: {}", e)))?;
            Ok(TransportResponse { status, body })
        }
    }
}

/// Interprets a response body.
///
/// A `passwords` array wins over a `password` string; only the first five
/// batch entries are consumed (and therefore validated).
pub fn parse_response(body: &str) -> Result<GenerationResult, GenerationError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| GenerationError::InvalidPayload(format!("body is not JSON: {}", e)))?;

    if let Some(entries) = value.get("passwords").and_then(Value::as_array) {
        let total = entries.len();
        let credentials = entries
            .iter()
            .take(MAX_BATCH_SIZE)
            .map(|entry| {
                entry.as_str().map(str::to_string).ok_or_else(|| {
                    GenerationError::InvalidPayload(format!(
                        "batch entry is not a string: {}",
                        entry
                    ))
                })
            })
            .collect::<Result<Vec<String>, GenerationError>>()?;
        if total > MAX_BATCH_SIZE {
            debug!(total, kept = MAX_BATCH_SIZE, "truncated batch response");
        }
        return Ok(GenerationResult::batch(credentials));
    }

    match value.get("password").and_then(Value::as_str) {
        Some(credential) => Ok(GenerationResult::Single {
            credential: credential.to_string(),
        }),
        None => Err(GenerationError::InvalidPayload(
            "response has neither `password` nor `passwords`".to_string(),
        )),
    }
}

/// Client for the external generator service.
///
/// Holds no per-call state: a failed call never affects the next one, and
/// concurrent calls are neither merged nor cancelled.
pub struct GenerationClient<T: GeneratorTransport> {
    transport: T,
    endpoint: String,
}

impl GenerationClient<HttpTransport> {
    /// HTTP client for the endpoint described by `config`.
    pub fn from_config(config: &ClientConfig) -> Result<Self, GenerationError> {
        let transport = HttpTransport::new(config.request_timeout)?;
        Ok(Self::new(transport, &config.base_path))
    }
}

impl<T: GeneratorTransport> GenerationClient<T> {
    pub fn new(transport: T, base_path: &str) -> Self {
        Self {
            transport,
            endpoint: endpoint_url(base_path),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Requests one credential (or a batch) for `settings`.
    pub async fn generate(&self, settings: &Settings) -> Result<GenerationResult, GenerationError> {
        let request = GenerationRequest::from_settings(settings);
        debug!(kind = %request.kind, endpoint = %self.endpoint, "requesting credential");

        let response = self
            .transport
            .post_form(&self.endpoint, request.to_form())
            .await?;

        if !(200..300).contains(&response.status) {
            warn!(status = response.status, "generator returned non-success status");
            return Err(GenerationError::Status(response.status));
        }

        parse_response(&response.body)
    }
}
