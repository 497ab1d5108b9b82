//! Request-level error types.
//!
//! Every variant renders as `{"error": <message>}` with the matching status.
//! Provider send failures are not represented here: they are aggregated into
//! the contact response instead of failing the request.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Message returned to callers when the contact flow fails unexpectedly.
pub const INTERNAL_ERROR_MESSAGE: &str = "Erro interno ao enviar e-mail";

/// Errors that short-circuit request handling.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The `Origin` header is not in the configured allowlist.
    #[error("Not allowed by CORS")]
    OriginNotAllowed(String),

    /// The caller address could not be determined.
    #[error("Access denied (unknown IP)")]
    UnknownIp,

    /// The caller address is not in the configured allowlist.
    #[error("Access denied from IP {0}")]
    IpNotAllowed(String),

    /// One of `name`, `email`, `message` is absent or empty.
    #[error("Missing required fields: name, email, message")]
    MissingFields,

    /// The request body is not valid JSON.
    #[error("Invalid JSON payload")]
    InvalidPayload(String),

    /// The provider credential or the operator address is not configured.
    #[error("Email service not configured")]
    NotConfigured,

    /// Anything else. The detail is logged, never returned.
    #[error("Erro interno ao enviar e-mail")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::OriginNotAllowed(_) | ApiError::UnknownIp | ApiError::IpNotAllowed(_) => {
                StatusCode::FORBIDDEN
            }
            ApiError::MissingFields | ApiError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            ApiError::NotConfigured | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({"error": self.to_string()}))).into_response()
    }
}
