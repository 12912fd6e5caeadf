//! API error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    /// Provider-side rejection on an auth flow; the provider's own message is
    /// the only upstream detail we surface.
    #[error("{0}")]
    Provider(String),

    #[error("Authentication required. Please login.")]
    NotAuthenticated,

    #[error("Invalid or expired token. Please login again.")]
    InvalidToken,

    #[error("Invalid email or password.")]
    InvalidCredentials,

    #[error("No token to refresh.")]
    NoTokenToRefresh,

    #[error("Access denied. Administrator role required.")]
    AdminRequired,

    #[error("{0}")]
    NotFound(&'static str),

    #[error("Service temporarily unavailable.")]
    Unavailable,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Provider(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::NotAuthenticated | ApiError::InvalidToken | ApiError::InvalidCredentials | ApiError::NoTokenToRefresh => {
                (StatusCode::UNAUTHORIZED, self.to_string())
            }
            ApiError::AdminRequired => (StatusCode::FORBIDDEN, self.to_string()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, (*msg).to_string()),
            ApiError::Unavailable => {
                tracing::warn!("upstream provider unavailable");
                (StatusCode::SERVICE_UNAVAILABLE, self.to_string())
            }
            ApiError::Internal(detail) => {
                tracing::error!("internal error: {}", detail);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = json!({ "success": false, "message": message });
        (status, axum::Json(body)).into_response()
    }
}
