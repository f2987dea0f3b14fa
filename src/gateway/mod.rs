//! HTTP surface of the gateway (axum).
//!
//! ```text
//! GET  /                          service banner
//! GET  /health                    liveness
//! GET  /api/v1/providers          registered prompt providers
//! POST /api/v1/enhance            upload → extraction → provider prompt
//! POST /api/v1/analyze-structure  upload → extraction only
//! POST /api/v1/compose            semantic map + text → provider prompt
//! ```
//!
//! Handlers are thin: they parse the request, stage the upload and hand off
//! to [`crate::enhance`]. All failures leave as [`error::ApiError`].

pub mod error;
pub mod handlers;
pub mod upload;

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::pipeline::compose::PromptComposer;
use crate::processor::DocumentProcessor;
use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Room for multipart boundaries and headers on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Shared, immutable per-server state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub processor: Arc<dyn DocumentProcessor>,
    pub composer: Arc<PromptComposer>,
}

impl AppState {
    /// State with the built-in templates and the config's provider policy.
    pub fn new(config: GatewayConfig, processor: Arc<dyn DocumentProcessor>) -> Self {
        let composer = PromptComposer::default().with_policy(config.provider_policy);
        Self {
            config: Arc::new(config),
            processor,
            composer: Arc::new(composer),
        }
    }
}

/// Build the router with CORS, tracing and the upload body limit applied.
pub fn router(state: AppState) -> Router {
    let body_limit = state.config.max_file_size.saturating_add(MULTIPART_OVERHEAD);
    let cors = cors_layer(&state.config.allowed_origins);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/api/v1/providers", get(handlers::providers))
        .route("/api/v1/enhance", post(handlers::enhance_document))
        .route("/api/v1/analyze-structure", post(handlers::analyze_structure))
        .route("/api/v1/compose", post(handlers::compose))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    // Invalid origins are rejected by `GatewayConfigBuilder::build`.
    let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}

/// Bind `config.socket_addr()` and serve until Ctrl+C or SIGTERM.
///
/// # Errors
/// [`GatewayError::Internal`] if the address cannot be bound or the server
/// fails while running.
pub async fn serve(
    config: GatewayConfig,
    processor: Arc<dyn DocumentProcessor>,
) -> Result<(), GatewayError> {
    let addr = config.socket_addr();
    info!(
        "{} v{} listening on {} ({} backend, {:?} providers)",
        config.project_name,
        config.project_version,
        addr,
        processor.name(),
        config.provider_policy
    );

    let app = router(AppState::new(config, processor));
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| GatewayError::Internal(format!("Failed to bind {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| GatewayError::Internal(format!("Server error: {}", e)))?;

    info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("Shutdown signal received, draining connections");
}
