//! Admin API error taxonomy.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Errors surfaced by the admin API. None of them touch the routing table.
#[derive(Debug, Error)]
pub enum AdminError {
    /// The JSON payload failed to decode.
    #[error("payload unintelligible: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Known endpoint, wrong HTTP method.
    #[error("method not allowed: {0}")]
    MethodNotAllowed(String),

    /// Path outside the known endpoints.
    #[error("resource not found: {0}")]
    NotFound(String),

    /// Missing or wrong bearer token.
    #[error("unauthorized")]
    Unauthorized,
}

impl AdminError {
    pub fn status(&self) -> StatusCode {
        match self {
            AdminError::Malformed(_) => StatusCode::BAD_REQUEST,
            AdminError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            AdminError::NotFound(_) => StatusCode::NOT_FOUND,
            AdminError::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::debug!(status = %status, error = %self, "Admin request rejected");
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
