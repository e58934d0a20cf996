// Error type returned by API handlers

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::models::ValidationError;
use crate::record::Record;
use crate::reorder::ReorderError;

/// Failure outcome of an API call.
///
/// Validation failures never reach the store. Not-found is an expected outcome for
/// id-addressed calls and is kept apart from unexpected faults.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed body or a field rule violation.
    #[error("{0}")]
    Validation(String),

    /// The addressed record does not exist.
    #[error("{kind} not found")]
    NotFound { kind: &'static str, id: String },

    /// The request raced with a change to the data it was based on.
    #[error("{0}")]
    Conflict(String),

    /// Unexpected fault.
    #[error("operation failed")]
    Internal(eyre::Report),
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl ApiError {
    pub fn not_found<T: Record>(id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: T::kind(),
            id: id.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Internal(report) => tracing::error!(error = ?report, "request failed"),
            ApiError::NotFound { kind, id } => tracing::debug!(kind, id = %id, "not found"),
            other => tracing::warn!(error = %other, "request rejected"),
        }

        let body = ErrorBody {
            message: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(err: JsonRejection) -> Self {
        Self::Validation(err.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(err: QueryRejection) -> Self {
        Self::Validation(err.body_text())
    }
}

impl From<ReorderError> for ApiError {
    fn from(err: ReorderError) -> Self {
        match err {
            ReorderError::Stale { .. } => Self::Conflict(err.to_string()),
            _ => Self::Validation(err.to_string()),
        }
    }
}

impl From<eyre::Report> for ApiError {
    fn from(report: eyre::Report) -> Self {
        Self::Internal(report)
    }
}
