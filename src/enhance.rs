//! Whole-document entry points: staged file → extraction → prompt.
//!
//! These functions are what the HTTP handlers call, and what a library user
//! calls to run the same flow without the server:
//!
//! ```rust,no_run
//! use symbion_gateway::{enhance, EnhancementLevel, MockProcessor, PromptComposer};
//!
//! # async fn run() -> Result<(), symbion_gateway::GatewayError> {
//! let processor = MockProcessor::default();
//! let composer = PromptComposer::default();
//! let doc = enhance(&processor, &composer, "paper.pdf", "claude", EnhancementLevel::Full).await?;
//! println!("{}", doc.enhanced_prompt);
//! # Ok(())
//! # }
//! ```

use crate::config::EnhancementLevel;
use crate::error::GatewayError;
use crate::pipeline::compose::PromptComposer;
use crate::processor::DocumentProcessor;
use crate::semantic::Extraction;
use serde::Serialize;
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// Result of [`enhance`]: the composed prompt plus the extraction it came from.
#[derive(Debug, Clone, Serialize)]
pub struct EnhancedDocument {
    pub enhanced_prompt: String,
    pub extraction: Extraction,
    /// Provider key as requested (before any lenient fallback).
    pub provider: String,
    pub level: EnhancementLevel,
}

/// Extract the structure of a document without composing a prompt.
///
/// # Errors
/// Whatever the processor reports (missing file, OCR failure).
pub async fn analyze(
    processor: &dyn DocumentProcessor,
    path: impl AsRef<Path>,
) -> Result<Extraction, GatewayError> {
    let path = path.as_ref();
    let start = Instant::now();
    info!("Analyzing {} with {} backend", path.display(), processor.name());

    let extraction = processor.extract(path).await?;
    info!(
        "Extracted {} hierarchy items, {} blocks in {}ms",
        extraction.semantic_map.hierarchy.len(),
        extraction.semantic_map.blocks.len(),
        start.elapsed().as_millis()
    );
    Ok(extraction)
}

/// Extract a document and compose a prompt for `provider`.
///
/// # Errors
/// - Any error from [`analyze`]
/// - [`GatewayError::Prompt`] when the composer rejects the provider
///   (strict policy only)
pub async fn enhance(
    processor: &dyn DocumentProcessor,
    composer: &PromptComposer,
    path: impl AsRef<Path>,
    provider: &str,
    level: EnhancementLevel,
) -> Result<EnhancedDocument, GatewayError> {
    // Reject a bad provider before paying for extraction.
    composer.registry().resolve(provider, composer.policy())?;

    let extraction = analyze(processor, path).await?;
    let enhanced_prompt = composer.try_compose(
        &extraction.semantic_map,
        &extraction.cleaned_text,
        provider,
        level,
    )?;

    Ok(EnhancedDocument {
        enhanced_prompt,
        extraction,
        provider: provider.to_string(),
        level,
    })
}
