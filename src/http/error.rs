//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }
}

/// Application error type for HTTP handlers (§7).
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Internal(String),
    Store(crate::db::StoreError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", msg)),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg)),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, ApiError::new("INTERNAL_ERROR", msg)),
            AppError::Store(e) if e.is_not_found() => (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", e.to_string())),
            AppError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, ApiError::new("STORE_ERROR", e.to_string())),
        };
        (status, Json(error)).into_response()
    }
}

impl From<crate::db::StoreError> for AppError {
    fn from(err: crate::db::StoreError) -> Self {
        AppError::Store(err)
    }
}

impl From<crate::error::SchedulerError> for AppError {
    fn from(err: crate::error::SchedulerError) -> Self {
        match err {
            crate::error::SchedulerError::InvalidTimeFormat(msg) => AppError::BadRequest(msg),
            crate::error::SchedulerError::EmptyPopulation => {
                AppError::BadRequest("no proposal is schedulable within the requested horizon".into())
            }
            other => AppError::Internal(other.to_string()),
        }
    }
}
