//! HTTP mapping for [`GatewayError`].
//!
//! Every failed request answers with the same body shape:
//!
//! ```json
//! {"error": {"code": "BAD_REQUEST", "message": "File type '.docx' not supported. ..."}}
//! ```

use crate::error::GatewayError;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{error, warn};

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// A [`GatewayError`] on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub GatewayError);

impl ApiError {
    /// Status and machine-readable code for the wrapped error.
    pub fn status(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            GatewayError::MissingUpload
            | GatewayError::EmptyUpload { .. }
            | GatewayError::UnsupportedFileType { .. }
            | GatewayError::ContentMismatch { .. }
            | GatewayError::InvalidUpload { .. }
            | GatewayError::InvalidEnhancementLevel { .. }
            | GatewayError::Prompt(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            GatewayError::FileTooLarge { .. } | GatewayError::BodyTooLarge { .. } => {
                (StatusCode::PAYLOAD_TOO_LARGE, "FILE_TOO_LARGE")
            }
            GatewayError::OcrRequestFailed { .. } | GatewayError::OcrInvalidResponse { .. } => {
                (StatusCode::BAD_GATEWAY, "UPSTREAM")
            }
            GatewayError::OcrTimeout { .. } => (StatusCode::GATEWAY_TIMEOUT, "TIMEOUT"),
            GatewayError::FileNotFound { .. }
            | GatewayError::InvalidConfig(_)
            | GatewayError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL"),
        }
    }
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    /// Map a multipart read failure. axum reports a body-limit hit as a
    /// 413 from the multipart stream; that becomes [`GatewayError::BodyTooLarge`].
    pub fn from_multipart(err: MultipartError, limit: usize) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError(GatewayError::BodyTooLarge { limit })
        } else {
            ApiError(GatewayError::InvalidUpload {
                reason: err.body_text(),
            })
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(detail = %self.0, "Gateway internal error");
            "An internal error occurred".to_string()
        } else {
            warn!(status = status.as_u16(), "Request rejected: {}", self.0);
            self.0.to_string()
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}
