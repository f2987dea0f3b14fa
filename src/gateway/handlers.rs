//! Route handlers.

use super::error::ApiError;
use super::upload::{stage_upload, StagedUpload};
use super::AppState;
use crate::config::{EnhancementLevel, ProviderPolicy};
use crate::enhance::{analyze, enhance};
use crate::error::GatewayError;
use crate::prompts::DEFAULT_PROVIDER;
use crate::semantic::{LayoutDescriptor, SemanticMap};
use axum::extract::{Multipart, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

const STATUS_SUCCESS: &str = "success";

// ── Service info ─────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
    pub version: String,
    pub status: String,
}

pub async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    Json(RootResponse {
        message: format!("{} API", state.config.project_name),
        version: state.config.project_version.clone(),
        status: "active".to_string(),
    })
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "structural-gateway".to_string(),
    })
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProvidersResponse {
    pub default_provider: String,
    pub policy: ProviderPolicy,
    pub providers: Vec<String>,
}

pub async fn providers(State(state): State<AppState>) -> Json<ProvidersResponse> {
    let registry = state.composer.registry();
    Json(ProvidersResponse {
        default_provider: registry.default_provider().to_string(),
        policy: state.composer.policy(),
        providers: registry.providers().map(str::to_string).collect(),
    })
}

// ── Document endpoints ───────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct EnhanceParams {
    pub provider: Option<String>,
    pub enhancement_level: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EnhanceResponse {
    pub status: String,
    pub enhanced_prompt: String,
    pub semantic_map: SemanticMap,
    pub original_structure: LayoutDescriptor,
    pub processing_time: f64,
    pub provider: String,
}

pub async fn enhance_document(
    State(state): State<AppState>,
    Query(params): Query<EnhanceParams>,
    multipart: Multipart,
) -> Result<Json<EnhanceResponse>, ApiError> {
    let provider = params
        .provider
        .unwrap_or_else(|| DEFAULT_PROVIDER.to_string());
    let level = parse_level(params.enhancement_level.as_deref())?;

    let staged = receive_upload(&state, multipart).await?;
    info!(
        "Enhancing {} upload for provider '{}' (level {})",
        staged.kind().label(),
        provider,
        level
    );

    let doc = enhance(
        state.processor.as_ref(),
        &state.composer,
        staged.path(),
        &provider,
        level,
    )
    .await?;

    let extraction = doc.extraction;
    Ok(Json(EnhanceResponse {
        status: STATUS_SUCCESS.to_string(),
        enhanced_prompt: doc.enhanced_prompt,
        semantic_map: extraction.semantic_map,
        original_structure: extraction.layout_descriptor,
        processing_time: extraction.processing_time,
        provider: doc.provider,
    }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub status: String,
    pub semantic_map: SemanticMap,
    pub layout_descriptor: LayoutDescriptor,
    pub cleaned_text: String,
}

pub async fn analyze_structure(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let staged = receive_upload(&state, multipart).await?;
    let extraction = analyze(state.processor.as_ref(), staged.path()).await?;

    Ok(Json(AnalyzeResponse {
        status: STATUS_SUCCESS.to_string(),
        semantic_map: extraction.semantic_map,
        layout_descriptor: extraction.layout_descriptor,
        cleaned_text: extraction.cleaned_text,
    }))
}

// ── Composition without extraction ───────────────────────────────────────

/// Body of `POST /api/v1/compose`. `semantic_map` is taken as raw JSON so
/// that a malformed map still yields a prompt (with a diagnostic).
#[derive(Debug, Deserialize)]
pub struct ComposeRequest {
    #[serde(default)]
    pub semantic_map: Value,
    #[serde(default)]
    pub document_text: String,
    pub provider: Option<String>,
    pub enhancement_level: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ComposeResponse {
    pub status: String,
    pub enhanced_prompt: String,
    pub provider: String,
}

pub async fn compose(
    State(state): State<AppState>,
    Json(request): Json<ComposeRequest>,
) -> Result<Json<ComposeResponse>, ApiError> {
    let provider = request
        .provider
        .unwrap_or_else(|| DEFAULT_PROVIDER.to_string());
    let level = parse_level(request.enhancement_level.as_deref())?;

    let enhanced_prompt = state
        .composer
        .try_compose_value(&request.semantic_map, &request.document_text, &provider, level)
        .map_err(GatewayError::from)?;

    Ok(Json(ComposeResponse {
        status: STATUS_SUCCESS.to_string(),
        enhanced_prompt,
        provider,
    }))
}

// ── Helpers ──────────────────────────────────────────────────────────────

fn parse_level(level: Option<&str>) -> Result<EnhancementLevel, GatewayError> {
    level.map_or(Ok(EnhancementLevel::default()), str::parse)
}

/// Pull the `file` field out of the form and stage it on disk.
async fn receive_upload(
    state: &AppState,
    mut multipart: Multipart,
) -> Result<StagedUpload, ApiError> {
    let limit = state.config.max_file_size;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::from_multipart(e, limit))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::from_multipart(e, limit))?;

        let staged =
            stage_upload(&filename, &bytes, limit, state.config.upload_dir.as_deref()).await?;
        return Ok(staged);
    }

    Err(GatewayError::MissingUpload.into())
}
