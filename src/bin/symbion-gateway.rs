//! CLI binary for symbion-gateway.
//!
//! A thin shim over the library crate that maps flags and environment
//! variables to `GatewayConfig`, then either serves the HTTP gateway or
//! enhances a single local document.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use std::net::IpAddr;
use std::path::PathBuf;
use symbion_gateway::{
    enhance, gateway, processor, EnhancementLevel, GatewayConfig, OcrBackend, PromptComposer,
    ProviderPolicy,
};
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Serve on 0.0.0.0:8000 with the mock OCR backend
  symbion-gateway

  # Remote OCR backend, strict provider keys
  DEEPSEEK_API_KEY=sk-... symbion-gateway --ocr-backend remote --strict-providers

  # Enhance one local file without starting the server
  symbion-gateway --enhance paper.pdf --provider claude

ENDPOINTS:
  GET  /                          service banner
  GET  /health                    liveness probe
  GET  /api/v1/providers          registered prompt providers
  POST /api/v1/enhance            multipart 'file' → provider prompt
  POST /api/v1/analyze-structure  multipart 'file' → semantic map
  POST /api/v1/compose            JSON semantic map + text → provider prompt

A .env file in the working directory is loaded before flags are parsed.
RUST_LOG overrides --verbose / --quiet.
"#;

/// Structural document gateway for AI prompts.
#[derive(Parser, Debug)]
#[command(
    name = "symbion-gateway",
    version,
    about = "Structural document gateway: OCR → semantic map → provider prompt",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Interface to bind.
    #[arg(long, env = "SYMBION_HOST", default_value = "0.0.0.0")]
    host: IpAddr,

    /// TCP port.
    #[arg(short, long, env = "SYMBION_PORT", default_value_t = 8000)]
    port: u16,

    /// CORS origins, comma separated. Defaults to localhost:3000 and symbion.space.
    #[arg(long, env = "SYMBION_ALLOWED_ORIGINS", value_delimiter = ',')]
    allowed_origins: Vec<String>,

    /// Largest accepted upload in bytes.
    #[arg(long, env = "SYMBION_MAX_FILE_SIZE", default_value_t = 10 * 1024 * 1024)]
    max_file_size: usize,

    /// Name reported by `GET /`.
    #[arg(long, env = "SYMBION_PROJECT_NAME")]
    project_name: Option<String>,

    /// OCR backend: mock or remote.
    #[arg(long, env = "SYMBION_OCR_BACKEND", value_enum, default_value = "mock")]
    ocr_backend: BackendArg,

    /// Remote OCR endpoint.
    #[arg(long, env = "DEEPSEEK_API_URL")]
    ocr_api_url: Option<String>,

    /// Bearer token for the remote OCR endpoint.
    #[arg(long, env = "DEEPSEEK_API_KEY", hide_env_values = true)]
    ocr_api_key: Option<String>,

    /// Remote OCR request timeout in seconds.
    #[arg(long, env = "SYMBION_OCR_TIMEOUT", default_value_t = 30)]
    ocr_timeout: u64,

    /// Simulated latency of the mock backend in milliseconds.
    #[arg(long, env = "SYMBION_MOCK_LATENCY_MS", default_value_t = 100)]
    mock_latency_ms: u64,

    /// Reject unknown provider keys instead of falling back to chatgpt.
    #[arg(long, env = "SYMBION_STRICT_PROVIDERS")]
    strict_providers: bool,

    /// Directory for staged uploads (default: system temp dir).
    #[arg(long, env = "SYMBION_UPLOAD_DIR")]
    upload_dir: Option<PathBuf>,

    /// Enhance this local document and print the prompt instead of serving.
    #[arg(long, value_name = "FILE")]
    enhance: Option<PathBuf>,

    /// Provider template used with --enhance.
    #[arg(long, default_value = "chatgpt", requires = "enhance")]
    provider: String,

    /// Enhancement level used with --enhance: basic or full.
    #[arg(long, default_value = "full", requires = "enhance")]
    level: String,

    /// Print the full enhancement result as JSON (with --enhance).
    #[arg(long, requires = "enhance")]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "SYMBION_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "SYMBION_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum BackendArg {
    Mock,
    Remote,
}

impl From<BackendArg> for OcrBackend {
    fn from(v: BackendArg) -> Self {
        match v {
            BackendArg::Mock => OcrBackend::Mock,
            BackendArg::Remote => OcrBackend::Remote,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is the normal case.
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let config = build_config(&cli)?;
    let processor = processor::from_config(&config).context("Failed to initialise OCR backend")?;

    // ── One-shot mode ────────────────────────────────────────────────────
    if let Some(ref path) = cli.enhance {
        let level: EnhancementLevel = cli.level.parse()?;
        let composer = PromptComposer::default().with_policy(config.provider_policy);
        let doc = enhance(processor.as_ref(), &composer, path, &cli.provider, level)
            .await
            .with_context(|| format!("Failed to enhance {}", path.display()))?;

        let stdout = io::stdout();
        let mut handle = stdout.lock();
        if cli.json {
            let json = serde_json::to_string_pretty(&doc).context("Failed to serialise output")?;
            writeln!(handle, "{json}").context("Failed to write to stdout")?;
        } else {
            write_prompt(&mut handle, &doc.enhanced_prompt)?;
        }

        if !cli.quiet {
            eprintln!(
                "Enhanced {} for {} in {:.2}s",
                path.display(),
                doc.provider,
                doc.extraction.processing_time
            );
        }
        return Ok(());
    }

    // ── Serve ────────────────────────────────────────────────────────────
    gateway::serve(config, processor)
        .await
        .context("Gateway failed")?;
    Ok(())
}

/// Write `prompt` with a trailing newline, failing on any short write.
fn write_prompt(out: &mut impl Write, prompt: &str) -> Result<()> {
    out.write_all(prompt.as_bytes())
        .context("Failed to write to stdout")?;
    if !prompt.ends_with('\n') {
        out.write_all(b"\n").context("Failed to write to stdout")?;
    }
    Ok(())
}

/// Map CLI args to `GatewayConfig`.
fn build_config(cli: &Cli) -> Result<GatewayConfig> {
    let mut builder = GatewayConfig::builder()
        .host(cli.host)
        .port(cli.port)
        .max_file_size(cli.max_file_size)
        .ocr_backend(cli.ocr_backend.clone().into())
        .ocr_timeout_secs(cli.ocr_timeout)
        .mock_latency_ms(cli.mock_latency_ms)
        .provider_policy(if cli.strict_providers {
            ProviderPolicy::Strict
        } else {
            ProviderPolicy::Lenient
        });

    if !cli.allowed_origins.is_empty() {
        builder = builder.allowed_origins(cli.allowed_origins.clone());
    }
    if let Some(ref name) = cli.project_name {
        builder = builder.project_name(name.clone());
    }
    if let Some(ref url) = cli.ocr_api_url {
        builder = builder.ocr_api_url(url.clone());
    }
    if let Some(ref key) = cli.ocr_api_key {
        builder = builder.ocr_api_key(key.clone());
    }
    if let Some(ref dir) = cli.upload_dir {
        builder = builder.upload_dir(dir.clone());
    }

    builder.build().context("Invalid configuration")
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Accepts `limit` bytes, then fails.
    struct ShortWriter {
        written: Vec<u8>,
        limit: usize,
    }

    impl Write for ShortWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let room = self.limit - self.written.len();
            if room == 0 {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
            }
            let n = buf.len().min(room);
            self.written.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn prompt_gets_trailing_newline() {
        let mut out = Vec::new();
        write_prompt(&mut out, "prompt").unwrap();
        assert_eq!(out, b"prompt\n");

        let mut out = Vec::new();
        write_prompt(&mut out, "done\n").unwrap();
        assert_eq!(out, b"done\n");
    }

    #[test]
    fn failed_newline_write_is_reported() {
        let mut out = ShortWriter {
            written: Vec::new(),
            limit: 6,
        };
        let err = write_prompt(&mut out, "prompt").unwrap_err();
        assert!(err.to_string().contains("stdout"));
        assert_eq!(out.written, b"prompt");
    }
}
