//! HTTP error mapping.
//!
//! Every stage error converts into [`ApiError`], which renders the uniform
//! `{"status": "error", "message": ...}` body.

use crate::analysis::AnalysisError;
use crate::extract::ExtractError;
use crate::intake::IntakeError;
use crate::threads::ThreadsError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Intake(#[from] IntakeError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("Threads integration is not configured.")]
    ThreadsDisabled,

    #[error("Not authenticated with Threads.")]
    ThreadsUnauthenticated,

    #[error("Authorization code is required.")]
    MissingAuthCode,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Threads request failed: {0}")]
    Threads(#[from] ThreadsError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Intake(IntakeError::TooLarge) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Intake(_) => StatusCode::BAD_REQUEST,
            ApiError::Extract(ExtractError::ReadFailed(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Extract(_) => StatusCode::BAD_REQUEST,
            ApiError::Analysis(AnalysisError::EmptyText) => StatusCode::BAD_REQUEST,
            ApiError::Analysis(AnalysisError::MissingCredential)
            | ApiError::Analysis(AnalysisError::EmptyResponse) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Analysis(AnalysisError::Upstream(_)) => StatusCode::BAD_GATEWAY,
            ApiError::ThreadsDisabled => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::ThreadsUnauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::MissingAuthCode | ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Threads(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        if status.is_server_error() {
            error!("Request failed ({}): {}", status, message);
        }

        let body = Json(json!({
            "status": "error",
            "message": message,
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
