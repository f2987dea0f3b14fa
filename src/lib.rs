//! # symbion-gateway
//!
//! Structural document gateway: OCR a document into a semantic map and turn
//! that map into a prompt tailored to a specific LLM provider.
//!
//! ## Why this crate?
//!
//! Pasting raw OCR text into a chat model throws away everything the layout
//! said: which line was the title, which paragraph sits under which heading,
//! what the list items were. This crate keeps that structure as a
//! [`SemanticMap`], renders it into a compact outline, and wraps outline and
//! text in a provider-specific template (ChatGPT, Claude, Gemini) so the
//! model sees the document the way a reader would.
//!
//! ## Pipeline Overview
//!
//! ```text
//! upload
//!  │
//!  ├─ 1. Stage     validate extension + magic bytes, write temp file
//!  ├─ 2. Extract   DocumentProcessor (mock or remote OCR) → Extraction
//!  ├─ 3. Render    hierarchy + blocks → "Hierarchy: / Content Blocks:" outline
//!  ├─ 4. Compose   provider template, {semantic_map} + {document_text} filled
//!  └─ 5. Respond   enhanced prompt + semantic map + layout + timing
//! ```
//!
//! Steps 3 and 4 are pure and synchronous; step 2 is the only one that
//! awaits.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use symbion_gateway::{EnhancementLevel, PromptComposer, SemanticMap};
//!
//! let map: SemanticMap = serde_json::from_str(
//!     r#"{"hierarchy": [{"type": "title", "content": "Q3 Report", "level": 1}]}"#,
//! ).unwrap();
//! let composer = PromptComposer::default();
//! let prompt = composer.compose(&map, "Q3 Report\n...", "claude", EnhancementLevel::Full);
//! println!("{prompt}");
//! ```
//!
//! Running the HTTP gateway:
//!
//! ```rust,no_run
//! use symbion_gateway::{gateway, processor, GatewayConfig};
//!
//! # async fn run() -> Result<(), symbion_gateway::GatewayError> {
//! let config = GatewayConfig::builder().port(8000).build()?;
//! let processor = processor::from_config(&config)?;
//! gateway::serve(config, processor).await
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `symbion-gateway` binary (clap + anyhow + tracing-subscriber + dotenvy) |
//!
//! Disable `cli` when embedding the library:
//! ```toml
//! symbion-gateway = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod enhance;
pub mod error;
pub mod gateway;
pub mod pipeline;
pub mod processor;
pub mod prompts;
pub mod semantic;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    EnhancementLevel, GatewayConfig, GatewayConfigBuilder, OcrBackend, ProviderPolicy,
};
pub use enhance::{analyze, enhance, EnhancedDocument};
pub use error::{GatewayError, PromptError};
pub use pipeline::compose::PromptComposer;
pub use pipeline::render::{render_structure, render_structure_value};
pub use pipeline::template::{PromptTemplate, TemplateRegistry};
pub use processor::{DocumentProcessor, MockProcessor, RemoteOcrProcessor};
pub use semantic::{
    Block, Content, Extraction, HierarchyItem, LayoutDescriptor, Position, Relation, SemanticMap,
};
