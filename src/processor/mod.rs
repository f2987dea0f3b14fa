//! Document processors: file on disk → [`Extraction`].
//!
//! Extraction is the only asynchronous, potentially slow step of the whole
//! gateway, and the only one that talks to the outside world. It sits behind
//! the [`DocumentProcessor`] trait so the OCR backend can be swapped without
//! touching rendering or composition:
//!
//! * [`MockProcessor`]: fixed sample extraction, no network (default)
//! * [`RemoteOcrProcessor`]: multipart upload to an HTTP OCR service

mod mock;
mod remote;

pub use mock::{sample_extraction, MockProcessor};
pub use remote::RemoteOcrProcessor;

use crate::config::{GatewayConfig, OcrBackend};
use crate::error::GatewayError;
use crate::semantic::Extraction;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Turns a staged document into a semantic map plus cleaned text.
///
/// Implementations must be `Send + Sync`; the gateway shares one instance
/// across all requests.
#[async_trait]
pub trait DocumentProcessor: Send + Sync {
    /// Extract the structure of the document at `path`.
    ///
    /// `path` points at a readable file whose extension matches its content.
    async fn extract(&self, path: &Path) -> Result<Extraction, GatewayError>;

    /// Short backend name for logs.
    fn name(&self) -> &'static str;
}

/// Build the processor selected by `config.ocr_backend`.
pub fn from_config(config: &GatewayConfig) -> Result<Arc<dyn DocumentProcessor>, GatewayError> {
    let processor: Arc<dyn DocumentProcessor> = match config.ocr_backend {
        OcrBackend::Mock => {
            info!("Using mock OCR backend ({}ms latency)", config.mock_latency_ms);
            Arc::new(MockProcessor::new(Duration::from_millis(
                config.mock_latency_ms,
            )))
        }
        OcrBackend::Remote => {
            let remote = RemoteOcrProcessor::new(
                &config.ocr_api_url,
                config.ocr_api_key.clone(),
                config.ocr_timeout_secs,
            )?;
            info!(
                "Using remote OCR backend at {} (timeout {}s)",
                remote.endpoint(),
                config.ocr_timeout_secs
            );
            Arc::new(remote)
        }
    };
    Ok(processor)
}
