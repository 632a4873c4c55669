//! Error rendering for the HTTP API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::twitch::ApiError;

/// Body returned for anything unexpected; detail stays in the log
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error.";

/// Server error type
#[derive(Debug, Error)]
pub enum ServerError {
    /// `id` query parameter absent, blank or unparseable
    #[error("Invalid or missing 'id' parameter.")]
    InvalidUserId,

    /// Helix returned no user for the requested ID
    #[error("User not found.")]
    UserNotFound,

    /// No route matched
    #[error("Not found.")]
    RouteNotFound,

    /// A handler panicked
    #[error("Internal server error.")]
    Panic,

    /// Failure reported by the Twitch client
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Result type for handlers
pub type Result<T> = std::result::Result<T, ServerError>;

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
}

impl ServerError {
    /// Status code and client-facing message
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ServerError::InvalidUserId => (StatusCode::BAD_REQUEST, self.to_string()),
            ServerError::UserNotFound | ServerError::RouteNotFound => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            ServerError::Panic => (
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_ERROR_MESSAGE.to_string(),
            ),
            ServerError::Api(err) => match err {
                ApiError::Authentication(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
                ApiError::NotFound => (StatusCode::NOT_FOUND, err.to_string()),
                ApiError::Upstream { status } => (upstream_status(*status), err.to_string()),
                ApiError::Other(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MESSAGE.to_string(),
                ),
            },
        }
    }
}

/// Passes upstream 4xx/5xx through; anything else becomes 502
fn upstream_status(status: u16) -> StatusCode {
    StatusCode::from_u16(status)
        .ok()
        .filter(|s| s.is_client_error() || s.is_server_error())
        .unwrap_or(StatusCode::BAD_GATEWAY)
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        match &self {
            ServerError::Api(ApiError::Other(err)) => {
                tracing::error!(status = %status, "Internal error: {:#}", err);
            }
            ServerError::Panic => {
                tracing::error!(status = %status, "Handler panicked");
            }
            _ if status.is_server_error() => {
                tracing::error!(status = %status, error = %message, "Server error");
            }
            _ => {
                tracing::warn!(status = %status, error = %message, "Client error");
            }
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
