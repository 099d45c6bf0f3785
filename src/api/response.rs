//! Response types for the report browsing API.
//!
//! This module defines the listing bodies, the error response structure and
//! the mapping from engine errors to HTTP statuses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// One PDF in a run folder, paired with that run's narrative log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    /// PDF file name.
    pub file: String,
    /// Narrative log file name for the run, if it exists.
    pub log: Option<String>,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A file or folder name that could escape the served directory.
    pub fn invalid_name(name: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: ApiError::with_details(
                "INVALID_NAME",
                format!("Invalid name: {}", name),
                "Names must not contain path separators or '..'",
            ),
        }
    }

    /// The requested file or folder does not exist.
    pub fn not_found(name: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            error: ApiError::new("NOT_FOUND", format!("Not found: {}", name)),
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::Io { path, source } if source.kind() == std::io::ErrorKind::NotFound => {
                ApiErrorResponse::not_found(&path.display().to_string())
            }
            EngineError::Io { path, source } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "IO_ERROR",
                    "Failed to read output files",
                    format!("{}: {}", path.display(), source),
                ),
            },
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
                ApiErrorResponse {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    error: ApiError::with_details(
                        "CONFIG_ERROR",
                        "Configuration error",
                        error.to_string(),
                    ),
                }
            }
            EngineError::Device { .. } | EngineError::Http(_) => ApiErrorResponse {
                status: StatusCode::BAD_GATEWAY,
                error: ApiError::with_details(
                    "DEVICE_ERROR",
                    "Access-control device error",
                    error.to_string(),
                ),
            },
            EngineError::InvalidData { .. }
            | EngineError::NegativeDuration { .. }
            | EngineError::Report { .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "PROCESSING_ERROR",
                    "Processing failed",
                    error.to_string(),
                ),
            },
        }
    }
}
