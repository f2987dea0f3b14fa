//! Error types for the symbion-gateway library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`GatewayError`] is **fatal for one request**. The document cannot be
//!   turned into a prompt at all (unsupported upload, OCR backend down, bad
//!   configuration). Returned as `Err(GatewayError)` from
//!   [`crate::enhance::enhance`] and friends and mapped to an HTTP status by
//!   the gateway.
//!
//! * [`PromptError`] is **recoverable**. Something is wrong with a template or
//!   a provider key. The string-valued [`crate::pipeline::compose::PromptComposer::compose`]
//!   downgrades these to a labelled diagnostic instead of failing, while
//!   [`crate::pipeline::compose::PromptComposer::try_compose`] hands them back
//!   typed so callers can decide for themselves.

use std::path::PathBuf;
use thiserror::Error;

/// All request-fatal errors returned by the symbion-gateway library.
#[derive(Debug, Error)]
pub enum GatewayError {
    // ── Upload errors ─────────────────────────────────────────────────────
    /// The staged document vanished before the processor could read it.
    #[error("Document not found: '{path}'")]
    FileNotFound { path: PathBuf },

    /// The multipart request had no `file` field.
    #[error("No document uploaded.\nSend the file as multipart field 'file'.")]
    MissingUpload,

    /// The uploaded file had zero bytes.
    #[error("Uploaded document '{filename}' is empty")]
    EmptyUpload { filename: String },

    /// The file extension is not one the gateway accepts.
    #[error("File type '{extension}' not supported. Use: .pdf, .jpg, .jpeg, .png")]
    UnsupportedFileType { extension: String },

    /// Extension and content disagree (e.g. a `.pdf` that is really a PNG).
    #[error("Document '{filename}' is not a valid {expected} file\nFirst bytes: {magic:?}")]
    ContentMismatch {
        filename: String,
        expected: &'static str,
        magic: Vec<u8>,
    },

    /// The upload exceeds the configured size cap.
    #[error("Document is {size} bytes; the limit is {limit} bytes")]
    FileTooLarge { size: usize, limit: usize },

    /// The request body hit the size cap before the upload was fully read.
    #[error("Request body exceeds the {limit} byte upload limit")]
    BodyTooLarge { limit: usize },

    /// The multipart body itself could not be read.
    #[error("Invalid upload: {reason}")]
    InvalidUpload { reason: String },

    // ── OCR backend errors ────────────────────────────────────────────────
    /// The OCR service could not be reached or answered with an error status.
    #[error("OCR request to '{endpoint}' failed: {reason}")]
    OcrRequestFailed { endpoint: String, reason: String },

    /// The OCR service did not answer within the configured timeout.
    #[error("OCR request to '{endpoint}' timed out after {secs}s\nIncrease --ocr-timeout.")]
    OcrTimeout { endpoint: String, secs: u64 },

    /// The OCR service answered, but not with the expected extraction schema.
    #[error("OCR response from '{endpoint}' is not a valid extraction: {detail}")]
    OcrInvalidResponse { endpoint: String, detail: String },

    // ── Request errors ────────────────────────────────────────────────────
    /// `enhancement_level` was neither `basic` nor `full`.
    #[error("Unsupported enhancement level '{level}'. Use: basic, full")]
    InvalidEnhancementLevel { level: String },

    /// Prompt composition failed (strict provider policy, bad template).
    #[error(transparent)]
    Prompt(#[from] PromptError),

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A recoverable prompt-composition error.
///
/// Template variants are raised when a [`crate::pipeline::template::PromptTemplate`]
/// is constructed, so a registry that built successfully can never fail
/// during substitution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromptError {
    /// Provider key not in the registry and the policy is strict.
    #[error("Unknown provider '{provider}'. Available: {available}")]
    UnknownProvider { provider: String, available: String },

    /// A `{` or `}` that is neither doubled nor part of a slot.
    #[error("Unbalanced '{brace}' at byte {offset} in template")]
    UnbalancedBrace { brace: char, offset: usize },

    /// A `{name}` slot other than `semantic_map` / `document_text`.
    #[error("Unknown placeholder '{{{name}}}' in template")]
    UnknownPlaceholder { name: String },

    /// A bare `{}` slot; only named slots are supported.
    #[error("Positional placeholder '{{}}' at byte {offset} in template; use a named slot")]
    PositionalPlaceholder { offset: usize },

    /// A required slot never appears in the template.
    #[error("Template is missing the '{{{name}}}' placeholder")]
    MissingPlaceholder { name: &'static str },

    /// The registry's default provider has no template.
    #[error("Default provider '{provider}' has no template")]
    MissingDefaultProvider { provider: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_file_type_lists_allowed() {
        let e = GatewayError::UnsupportedFileType {
            extension: ".docx".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains(".docx"), "got: {msg}");
        assert!(msg.contains(".png"), "got: {msg}");
    }

    #[test]
    fn file_too_large_display() {
        let e = GatewayError::FileTooLarge {
            size: 2048,
            limit: 1024,
        };
        assert!(e.to_string().contains("2048 bytes"));
        assert!(e.to_string().contains("1024 bytes"));
    }

    #[test]
    fn ocr_timeout_display() {
        let e = GatewayError::OcrTimeout {
            endpoint: "https://ocr.local".into(),
            secs: 30,
        };
        assert!(e.to_string().contains("30s"));
        assert!(e.to_string().contains("https://ocr.local"));
    }

    #[test]
    fn prompt_error_is_transparent() {
        let e: GatewayError = PromptError::UnknownProvider {
            provider: "llama".into(),
            available: "chatgpt, claude".into(),
        }
        .into();
        assert_eq!(
            e.to_string(),
            "Unknown provider 'llama'. Available: chatgpt, claude"
        );
    }

    #[test]
    fn placeholder_errors_show_braces() {
        let e = PromptError::UnknownPlaceholder {
            name: "author".into(),
        };
        assert_eq!(e.to_string(), "Unknown placeholder '{author}' in template");

        let e = PromptError::MissingPlaceholder {
            name: "document_text",
        };
        assert_eq!(
            e.to_string(),
            "Template is missing the '{document_text}' placeholder"
        );
    }
}
