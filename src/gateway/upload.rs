//! Upload validation and staging.
//!
//! ## Why stage to a temp file?
//!
//! Document processors take a file-system path, the same contract a real OCR
//! client needs to stream a large file. Writing the upload into a
//! [`NamedTempFile`] gives us that path while guaranteeing the file is
//! removed when the [`StagedUpload`] is dropped, on success and on every
//! early return alike. Content is checked against the declared extension's
//! magic bytes before it is written, so processors never see a `.pdf` that
//! is really something else.

use crate::error::GatewayError;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Accepted document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Jpeg,
    Png,
}

impl DocumentKind {
    /// Classify by file extension (case-insensitive).
    pub fn from_filename(filename: &str) -> Result<Self, GatewayError> {
        let extension = Path::new(filename)
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => Ok(DocumentKind::Pdf),
            "jpg" | "jpeg" => Ok(DocumentKind::Jpeg),
            "png" => Ok(DocumentKind::Png),
            _ => Err(GatewayError::UnsupportedFileType {
                extension: if extension.is_empty() {
                    "(none)".to_string()
                } else {
                    format!(".{extension}")
                },
            }),
        }
    }

    /// Extension used for the staged file.
    pub fn extension(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "pdf",
            DocumentKind::Jpeg => "jpg",
            DocumentKind::Png => "png",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "PDF",
            DocumentKind::Jpeg => "JPEG",
            DocumentKind::Png => "PNG",
        }
    }

    fn magic(&self) -> &'static [u8] {
        match self {
            DocumentKind::Pdf => b"%PDF",
            DocumentKind::Jpeg => &[0xFF, 0xD8, 0xFF],
            DocumentKind::Png => &[0x89, b'P', b'N', b'G'],
        }
    }

    /// Whether `bytes` start with this format's signature.
    pub fn matches(&self, bytes: &[u8]) -> bool {
        bytes.starts_with(self.magic())
    }
}

/// An upload written to disk. The file is deleted on drop.
#[derive(Debug)]
pub struct StagedUpload {
    file: NamedTempFile,
    kind: DocumentKind,
}

impl StagedUpload {
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }
}

/// Validate an upload and write it to a temp file.
///
/// Checks, in order: extension, emptiness, size cap, magic bytes.
///
/// # Errors
/// [`GatewayError::UnsupportedFileType`], [`GatewayError::EmptyUpload`],
/// [`GatewayError::FileTooLarge`], [`GatewayError::ContentMismatch`], or
/// [`GatewayError::Internal`] if the temp file cannot be written.
pub async fn stage_upload(
    filename: &str,
    bytes: &[u8],
    max_size: usize,
    dir: Option<&Path>,
) -> Result<StagedUpload, GatewayError> {
    let kind = DocumentKind::from_filename(filename)?;

    if bytes.is_empty() {
        return Err(GatewayError::EmptyUpload {
            filename: filename.to_string(),
        });
    }
    if bytes.len() > max_size {
        return Err(GatewayError::FileTooLarge {
            size: bytes.len(),
            limit: max_size,
        });
    }
    if !kind.matches(bytes) {
        return Err(GatewayError::ContentMismatch {
            filename: filename.to_string(),
            expected: kind.label(),
            magic: bytes.iter().take(4).copied().collect(),
        });
    }

    let suffix = format!(".{}", kind.extension());
    let mut builder = tempfile::Builder::new();
    builder.prefix("upload-").suffix(&suffix);
    let file = match dir {
        Some(d) => builder.tempfile_in(d),
        None => builder.tempfile(),
    }
    .map_err(|e| GatewayError::Internal(format!("Failed to create temp file: {}", e)))?;

    tokio::fs::write(file.path(), bytes)
        .await
        .map_err(|e| GatewayError::Internal(format!("Failed to write temp file: {}", e)))?;

    debug!(
        "Staged {} ({} bytes) at {}",
        filename,
        bytes.len(),
        file.path().display()
    );
    Ok(StagedUpload { file, kind })
}
