//! Integration tests for the HTTP gateway.
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot`; no
//! socket is bound and the mock OCR backend runs with zero latency, so these
//! tests need no network and no API key.
//!
//! Run with:
//!   cargo test --test gateway

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use symbion_gateway::gateway::{router, AppState};
use symbion_gateway::{GatewayConfig, MockProcessor, ProviderPolicy};
use tower::ServiceExt;

// ── Test helpers ─────────────────────────────────────────────────────────────

const BOUNDARY: &str = "symbion-test-boundary";
const PDF: &[u8] = b"%PDF-1.4\n1 0 obj\n<< /Type /Catalog >>\nendobj\n%%EOF\n";
const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13];

fn app_with(config: GatewayConfig) -> Router {
    let processor = Arc::new(MockProcessor::new(Duration::ZERO));
    router(AppState::new(config, processor))
}

fn app() -> Router {
    app_with(GatewayConfig::default())
}

/// Hand-built `multipart/form-data` body with a single file field.
fn multipart_body(field: &str, filename: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload(uri: &str, filename: &str, content: &[u8]) -> Request<Body> {
    Request::post(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body("file", filename, content)))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

// ── Service info ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn root_reports_name_and_version() {
    let (status, body) = send(app(), get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Symbion Structural Gateway API");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["status"], "active");
}

#[tokio::test]
async fn health_check() {
    let (status, body) = send(app(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"status": "healthy", "service": "structural-gateway"})
    );
}

#[tokio::test]
async fn providers_are_listed_sorted() {
    let (status, body) = send(app(), get("/api/v1/providers")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["default_provider"], "chatgpt");
    assert_eq!(body["policy"], "lenient");
    assert_eq!(body["providers"], json!(["chatgpt", "claude", "gemini"]));
}

// ── /api/v1/enhance ──────────────────────────────────────────────────────────

#[tokio::test]
async fn enhance_pdf_for_claude() {
    let req = upload("/api/v1/enhance?provider=claude", "paper.pdf", PDF);
    let (status, body) = send(app(), req).await;

    assert_eq!(status, StatusCode::OK, "body: {body}");
    assert_eq!(body["status"], "success");
    assert_eq!(body["provider"], "claude");

    let prompt = body["enhanced_prompt"].as_str().unwrap();
    assert!(prompt.contains("<document_analysis>"));
    assert!(prompt.contains("Hierarchy:\n- title: Sample Document\n"));
    assert!(prompt.contains("- list: [Method 1, Method 2]"));
    assert!(prompt.contains("Content Blocks:\n"));

    assert_eq!(body["semantic_map"]["hierarchy"].as_array().unwrap().len(), 5);
    assert_eq!(body["original_structure"]["type"], "academic_paper");
    assert!(body["processing_time"].as_f64().unwrap() >= 0.0);
}

#[tokio::test]
async fn enhance_defaults_to_chatgpt() {
    let (status, body) = send(app(), upload("/api/v1/enhance", "scan.png", PNG)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["provider"], "chatgpt");
    assert!(body["enhanced_prompt"]
        .as_str()
        .unwrap()
        .contains("ANALYZE THIS DOCUMENT WITH STRUCTURAL CONTEXT"));
}

#[tokio::test]
async fn enhance_unknown_provider_falls_back_leniently() {
    let req = upload("/api/v1/enhance?provider=mistral", "paper.pdf", PDF);
    let (status, body) = send(app(), req).await;
    assert_eq!(status, StatusCode::OK);
    // Provider is echoed as requested; the prompt is the default template.
    assert_eq!(body["provider"], "mistral");
    assert!(body["enhanced_prompt"]
        .as_str()
        .unwrap()
        .contains("RESPONSE FORMAT:"));
}

#[tokio::test]
async fn enhance_unknown_provider_rejected_when_strict() {
    let config = GatewayConfig::builder()
        .provider_policy(ProviderPolicy::Strict)
        .build()
        .unwrap();
    let req = upload("/api/v1/enhance?provider=mistral", "paper.pdf", PDF);
    let (status, body) = send(app_with(config), req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
    let message = body["error"]["message"].as_str().unwrap();
    assert!(message.contains("mistral"));
    assert!(message.contains("chatgpt, claude, gemini"));
}

#[tokio::test]
async fn enhance_rejects_unsupported_extension() {
    let req = upload("/api/v1/enhance", "notes.docx", b"PK\x03\x04");
    let (status, body) = send(app(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"].as_str().unwrap().contains(".docx"));
}

#[tokio::test]
async fn enhance_rejects_disguised_file() {
    let req = upload("/api/v1/enhance", "paper.pdf", PNG);
    let (status, body) = send(app(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("not a valid PDF"));
}

#[tokio::test]
async fn enhance_rejects_unknown_level() {
    let req = upload("/api/v1/enhance?enhancement_level=extreme", "paper.pdf", PDF);
    let (status, body) = send(app(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"].as_str().unwrap().contains("extreme"));
}

#[tokio::test]
async fn enhancement_levels_produce_the_same_prompt() {
    let basic = upload("/api/v1/enhance?provider=gemini&enhancement_level=basic", "a.pdf", PDF);
    let full = upload("/api/v1/enhance?provider=gemini&enhancement_level=full", "a.pdf", PDF);
    let (_, basic) = send(app(), basic).await;
    let (_, full) = send(app(), full).await;
    assert_eq!(basic["enhanced_prompt"], full["enhanced_prompt"]);
}

#[tokio::test]
async fn enhance_rejects_oversized_upload() {
    let config = GatewayConfig::builder().max_file_size(16).build().unwrap();
    let req = upload("/api/v1/enhance", "paper.pdf", PDF);
    let (status, body) = send(app_with(config), req).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["error"]["code"], "FILE_TOO_LARGE");
}

#[tokio::test]
async fn enhance_without_file_field() {
    let req = Request::post("/api/v1/enhance")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body("attachment", "paper.pdf", PDF)))
        .unwrap();
    let (status, body) = send(app(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"].as_str().unwrap().contains("'file'"));
}

#[tokio::test]
async fn staged_uploads_are_cleaned_up() {
    let dir = tempfile::tempdir().unwrap();
    let config = GatewayConfig::builder()
        .upload_dir(dir.path())
        .build()
        .unwrap();

    let (status, _) = send(
        app_with(config),
        upload("/api/v1/enhance", "paper.pdf", PDF),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

// ── /api/v1/analyze-structure ────────────────────────────────────────────────

#[tokio::test]
async fn analyze_structure_returns_extraction() {
    let req = upload("/api/v1/analyze-structure", "scan.JPG", &[0xFF, 0xD8, 0xFF, 0xE0]);
    let (status, body) = send(app(), req).await;

    assert_eq!(status, StatusCode::OK, "body: {body}");
    assert_eq!(body["status"], "success");
    assert_eq!(body["semantic_map"]["blocks"].as_array().unwrap().len(), 3);
    assert_eq!(body["semantic_map"]["relations"][0]["type"], "contains");
    assert_eq!(body["layout_descriptor"]["confidence"], 0.95);
    assert!(body["cleaned_text"]
        .as_str()
        .unwrap()
        .starts_with("Sample Document"));
    assert!(body.get("enhanced_prompt").is_none());
}

// ── /api/v1/compose ──────────────────────────────────────────────────────────

#[tokio::test]
async fn compose_from_semantic_map() {
    let req = post_json(
        "/api/v1/compose",
        json!({
            "semantic_map": {
                "hierarchy": [{"type": "title", "content": "Q3 {draft}", "level": 1}],
                "blocks": [{"id": "b1", "type": "paragraph", "content": "Revenue up",
                            "position": {"x": 0.0, "y": 0.0}}]
            },
            "document_text": "Q3 {draft}\nRevenue up",
            "provider": "gemini"
        }),
    );
    let (status, body) = send(app(), req).await;

    assert_eq!(status, StatusCode::OK, "body: {body}");
    assert_eq!(body["provider"], "gemini");
    let prompt = body["enhanced_prompt"].as_str().unwrap();
    assert!(prompt.contains("```text\nHierarchy:\n- title: Q3 {draft}\n"));
    assert!(prompt.contains("- paragraph: Revenue up\n"));
    assert!(prompt.contains("Q3 {draft}\nRevenue up"));
}

#[tokio::test]
async fn compose_malformed_map_yields_diagnostic() {
    let req = post_json(
        "/api/v1/compose",
        json!({"semantic_map": {"hierarchy": "not a list"}, "document_text": "body"}),
    );
    let (status, body) = send(app(), req).await;

    assert_eq!(status, StatusCode::OK);
    let prompt = body["enhanced_prompt"].as_str().unwrap();
    assert!(prompt.contains("Structure parsing error: "));
    assert!(prompt.contains("body"));
}

#[tokio::test]
async fn compose_strict_unknown_provider() {
    let config = GatewayConfig::builder()
        .provider_policy(ProviderPolicy::Strict)
        .build()
        .unwrap();
    let req = post_json(
        "/api/v1/compose",
        json!({"semantic_map": {}, "document_text": "", "provider": "llama"}),
    );
    let (status, body) = send(app_with(config), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"].as_str().unwrap().contains("llama"));
}

// ── CORS ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn cors_allows_configured_origin() {
    let req = Request::get("/health")
        .header(header::ORIGIN, "https://symbion.space")
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(req).await.unwrap();
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://symbion.space"
    );
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS],
        "true"
    );
}

#[tokio::test]
async fn cors_ignores_unknown_origin() {
    let req = Request::get("/health")
        .header(header::ORIGIN, "https://evil.example")
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(req).await.unwrap();
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}
