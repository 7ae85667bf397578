//! # Application Error
//!
//! Maps gate and storage failures to structured HTTP responses. Integrity
//! rejections, missing files and load failures get distinct status codes so a
//! client can tell "tampered" apart from "not there" and "broken".

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use modelgate_core::{GateError, StoreError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// Upload content failed the integrity check.
    #[error("{0}")]
    BadContent(String),

    /// Referenced model does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Request is missing parts or names an unusable file.
    #[error("validation error: {0}")]
    Validation(String),

    /// Upload exceeds the configured body limit.
    #[error("upload too large: {0}")]
    TooLarge(String),

    /// I/O, unreadable artifact, or model load failure.
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadContent(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::TooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AppError::BadContent(_) => "integrity",
            AppError::NotFound(_) => "not_found",
            AppError::Validation(_) => "validation",
            AppError::TooLarge(_) => "too_large",
            AppError::Internal(_) => "internal",
        }
    }

    /// Integrity rejection, as returned when an artifact's digest does not match.
    pub fn tampered() -> Self {
        AppError::BadContent(
            "Model integrity check failed! Possible tampering detected.".to_string(),
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = serde_json::json!({
            "error": {
                "code": status.as_u16(),
                "kind": self.kind(),
                "message": self.to_string(),
            }
        });
        (status, axum::Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::InvalidName(_) => AppError::Validation(e.to_string()),
            StoreError::Io { .. } => AppError::Internal(e.to_string()),
        }
    }
}

impl From<GateError> for AppError {
    fn from(e: GateError) -> Self {
        match e {
            GateError::Mismatched { .. } => AppError::tampered(),
            GateError::Unreadable(ref d) if d.is_not_found() => {
                AppError::NotFound("Model file not found.".to_string())
            }
            GateError::Unreadable(_) => AppError::Internal(e.to_string()),
            GateError::Loader(ref l) => AppError::Internal(format!("Failed to load model: {l}")),
        }
    }
}

impl From<MultipartError> for AppError {
    fn from(e: MultipartError) -> Self {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::TooLarge(e.body_text())
        } else {
            AppError::Validation(e.body_text())
        }
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(e: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("blocking task failed: {e}"))
    }
}
