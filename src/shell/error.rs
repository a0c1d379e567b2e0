//! Error type for the web shell.

use crate::error::Pdf2WordError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Errors a shell request can end in.
#[derive(Error, Debug)]
pub enum ShellError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Unsupported file '{0}': only .pdf uploads are accepted")]
    UnsupportedFile(String),

    #[error("Upload exceeds the configured size limit")]
    PayloadTooLarge,

    #[error(transparent)]
    Conversion(#[from] Pdf2WordError),
}

impl ShellError {
    pub fn status(&self) -> StatusCode {
        match self {
            ShellError::InvalidRequest(_) | ShellError::UnsupportedFile(_) => {
                StatusCode::BAD_REQUEST
            }
            ShellError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ShellError::Conversion(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ShellError::InvalidRequest(_) => "INVALID_REQUEST",
            ShellError::UnsupportedFile(_) => "UNSUPPORTED_FILE",
            ShellError::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            ShellError::Conversion(_) => "CONVERSION_FAILED",
        }
    }
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    code: String,
}

impl IntoResponse for ShellError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            success: false,
            error: self.to_string(),
            code: self.code().to_string(),
        };

        (self.status(), Json(body)).into_response()
    }
}
