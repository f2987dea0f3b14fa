//! Configuration types for the structural gateway.
//!
//! All server behaviour is controlled through [`GatewayConfig`], built via
//! its [`GatewayConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share the config across handlers, log it at startup, and
//! construct a throwaway variant in tests.
//!
//! The small enums at the bottom ([`ProviderPolicy`], [`EnhancementLevel`],
//! [`OcrBackend`]) are request/runtime switches that the library API takes
//! directly, independent of the server.

use crate::error::GatewayError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

/// Configuration for the HTTP gateway.
///
/// Built via [`GatewayConfig::builder()`] or using
/// [`GatewayConfig::default()`].
///
/// # Example
/// ```rust
/// use symbion_gateway::{GatewayConfig, OcrBackend};
///
/// let config = GatewayConfig::builder()
///     .port(9000)
///     .ocr_backend(OcrBackend::Mock)
///     .max_file_size(5 * 1024 * 1024)
///     .build()
///     .unwrap();
/// assert_eq!(config.port, 9000);
/// ```
#[derive(Clone)]
pub struct GatewayConfig {
    /// Interface to bind. Default: 0.0.0.0.
    pub host: IpAddr,

    /// TCP port. Default: 8000.
    pub port: u16,

    /// Origins allowed by CORS (credentials enabled).
    /// Default: `http://localhost:3000`, `https://symbion.space`.
    pub allowed_origins: Vec<String>,

    /// Largest accepted upload in bytes. Default: 10 MiB.
    pub max_file_size: usize,

    /// Name reported by `GET /`. Default: "Symbion Structural Gateway".
    pub project_name: String,

    /// Version reported by `GET /`. Default: the crate version.
    pub project_version: String,

    /// Which document processor serves extraction requests. Default: mock.
    pub ocr_backend: OcrBackend,

    /// Endpoint of the remote OCR service.
    pub ocr_api_url: String,

    /// Bearer token for the remote OCR service.
    pub ocr_api_key: Option<String>,

    /// Per-request timeout for the remote OCR service in seconds. Default: 30.
    pub ocr_timeout_secs: u64,

    /// Simulated extraction latency of the mock backend in ms. Default: 100.
    pub mock_latency_ms: u64,

    /// What to do with unknown provider keys. Default: lenient fallback.
    pub provider_policy: ProviderPolicy,

    /// Directory for staged uploads. `None` uses the system temp dir.
    pub upload_dir: Option<PathBuf>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8000,
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "https://symbion.space".to_string(),
            ],
            max_file_size: 10 * 1024 * 1024,
            project_name: "Symbion Structural Gateway".to_string(),
            project_version: env!("CARGO_PKG_VERSION").to_string(),
            ocr_backend: OcrBackend::default(),
            ocr_api_url: "https://api.deepseek.com/v1/ocr".to_string(),
            ocr_api_key: None,
            ocr_timeout_secs: 30,
            mock_latency_ms: 100,
            provider_policy: ProviderPolicy::default(),
            upload_dir: None,
        }
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("allowed_origins", &self.allowed_origins)
            .field("max_file_size", &self.max_file_size)
            .field("project_name", &self.project_name)
            .field("project_version", &self.project_version)
            .field("ocr_backend", &self.ocr_backend)
            .field("ocr_api_url", &self.ocr_api_url)
            .field("ocr_api_key", &self.ocr_api_key.as_ref().map(|_| "<redacted>"))
            .field("ocr_timeout_secs", &self.ocr_timeout_secs)
            .field("mock_latency_ms", &self.mock_latency_ms)
            .field("provider_policy", &self.provider_policy)
            .field("upload_dir", &self.upload_dir)
            .finish()
    }
}

impl GatewayConfig {
    /// Create a new builder for `GatewayConfig`.
    pub fn builder() -> GatewayConfigBuilder {
        GatewayConfigBuilder {
            config: Self::default(),
        }
    }

    /// The socket address the server binds to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Builder for [`GatewayConfig`].
#[derive(Debug)]
pub struct GatewayConfigBuilder {
    config: GatewayConfig,
}

impl GatewayConfigBuilder {
    pub fn host(mut self, host: IpAddr) -> Self {
        self.config.host = host;
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    pub fn allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.config.allowed_origins = origins;
        self
    }

    pub fn max_file_size(mut self, bytes: usize) -> Self {
        self.config.max_file_size = bytes;
        self
    }

    pub fn project_name(mut self, name: impl Into<String>) -> Self {
        self.config.project_name = name.into();
        self
    }

    pub fn ocr_backend(mut self, backend: OcrBackend) -> Self {
        self.config.ocr_backend = backend;
        self
    }

    pub fn ocr_api_url(mut self, url: impl Into<String>) -> Self {
        self.config.ocr_api_url = url.into();
        self
    }

    pub fn ocr_api_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.config.ocr_api_key = if key.is_empty() { None } else { Some(key) };
        self
    }

    pub fn ocr_timeout_secs(mut self, secs: u64) -> Self {
        self.config.ocr_timeout_secs = secs;
        self
    }

    pub fn mock_latency_ms(mut self, ms: u64) -> Self {
        self.config.mock_latency_ms = ms;
        self
    }

    pub fn provider_policy(mut self, policy: ProviderPolicy) -> Self {
        self.config.provider_policy = policy;
        self
    }

    pub fn upload_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.upload_dir = Some(dir.into());
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<GatewayConfig, GatewayError> {
        let c = &self.config;
        if c.max_file_size == 0 {
            return Err(GatewayError::InvalidConfig(
                "max_file_size must be ≥ 1 byte".into(),
            ));
        }
        if c.ocr_timeout_secs == 0 {
            return Err(GatewayError::InvalidConfig(
                "OCR timeout must be ≥ 1 second".into(),
            ));
        }
        if c.ocr_backend == OcrBackend::Remote {
            let url = c.ocr_api_url.trim();
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(GatewayError::InvalidConfig(format!(
                    "Remote OCR backend needs an http(s) URL, got '{}'",
                    c.ocr_api_url
                )));
            }
        }
        if let Some(bad) = c
            .allowed_origins
            .iter()
            .find(|o| axum::http::HeaderValue::from_str(o).is_err())
        {
            return Err(GatewayError::InvalidConfig(format!(
                "CORS origin '{}' is not a valid header value",
                bad
            )));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// How the template registry treats a provider key it does not know.
///
/// | Policy | Unknown key |
/// |--------|-------------|
/// | `Lenient` | use the registry's default provider (default) |
/// | `Strict` | fail with [`crate::error::PromptError::UnknownProvider`] |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderPolicy {
    #[default]
    Lenient,
    Strict,
}

/// Requested enhancement depth.
///
/// Accepted and carried through the pipeline, but both levels currently
/// produce identical prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnhancementLevel {
    Basic,
    #[default]
    Full,
}

impl EnhancementLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnhancementLevel::Basic => "basic",
            EnhancementLevel::Full => "full",
        }
    }
}

impl FromStr for EnhancementLevel {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Ok(EnhancementLevel::Basic),
            "full" => Ok(EnhancementLevel::Full),
            _ => Err(GatewayError::InvalidEnhancementLevel {
                level: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for EnhancementLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which [`crate::processor::DocumentProcessor`] the gateway runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrBackend {
    /// Fixed sample extraction; no network.
    #[default]
    Mock,
    /// HTTP call to `ocr_api_url`.
    Remote,
}

impl FromStr for OcrBackend {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mock" => Ok(OcrBackend::Mock),
            "remote" => Ok(OcrBackend::Remote),
            other => Err(GatewayError::InvalidConfig(format!(
                "Unknown OCR backend '{}'. Use: mock, remote",
                other
            ))),
        }
    }
}
