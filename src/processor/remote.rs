//! Remote OCR backend: multipart upload to an HTTP extraction service.
//!
//! The service receives the document as multipart field `file` (with an
//! optional bearer token) and answers with the [`Extraction`] JSON schema.
//! `processing_time` is optional in the response; when the service omits it
//! the measured round-trip time is reported instead.

use super::DocumentProcessor;
use crate::error::GatewayError;
use crate::semantic::{Extraction, LayoutDescriptor, SemanticMap};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Calls an external OCR service over HTTP.
#[derive(Debug, Clone)]
pub struct RemoteOcrProcessor {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    timeout_secs: u64,
}

/// Response body; `processing_time` is the only optional field.
#[derive(Debug, Deserialize)]
struct RemoteExtraction {
    semantic_map: SemanticMap,
    #[serde(default)]
    cleaned_text: String,
    #[serde(default)]
    layout_descriptor: LayoutDescriptor,
    processing_time: Option<f64>,
}

impl RemoteOcrProcessor {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self, GatewayError> {
        let endpoint = endpoint.into();
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| GatewayError::OcrRequestFailed {
                endpoint: endpoint.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            endpoint,
            api_key,
            timeout_secs,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn parse_response(&self, body: &[u8], elapsed: Duration) -> Result<Extraction, GatewayError> {
        let remote: RemoteExtraction =
            serde_json::from_slice(body).map_err(|e| GatewayError::OcrInvalidResponse {
                endpoint: self.endpoint.clone(),
                detail: e.to_string(),
            })?;

        Ok(Extraction {
            semantic_map: remote.semantic_map,
            cleaned_text: remote.cleaned_text,
            layout_descriptor: remote.layout_descriptor,
            processing_time: remote
                .processing_time
                .unwrap_or_else(|| elapsed.as_secs_f64()),
        })
    }

    fn request_failed(&self, reason: impl Into<String>) -> GatewayError {
        GatewayError::OcrRequestFailed {
            endpoint: self.endpoint.clone(),
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl DocumentProcessor for RemoteOcrProcessor {
    async fn extract(&self, path: &Path) -> Result<Extraction, GatewayError> {
        let start = Instant::now();
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                GatewayError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                GatewayError::Internal(format!("Failed to read staged document: {}", e))
            }
        })?;

        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());
        info!(
            "Sending {} ({} bytes) to OCR service {}",
            filename,
            bytes.len(),
            self.endpoint
        );

        let form = Form::new().part("file", Part::bytes(bytes).file_name(filename));
        let mut request = self.client.post(&self.endpoint).multipart(form);
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                GatewayError::OcrTimeout {
                    endpoint: self.endpoint.clone(),
                    secs: self.timeout_secs,
                }
            } else {
                self.request_failed(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!("OCR service {} answered HTTP {}", self.endpoint, status);
            return Err(self.request_failed(format!("HTTP {}", status)));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| self.request_failed(e.to_string()))?;

        self.parse_response(&body, start.elapsed())
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}
