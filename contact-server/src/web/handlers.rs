//! Endpoint handlers.
//!
//! The contact handler only validates, composes and fans out. Provider
//! failures are reported per recipient in the response body; they never
//! turn into a request-level error.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, State},
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::contact::{ContactForm, ContactResponse};
use crate::error::ApiError;
use crate::mail::{compose_messages, deliver_all, Mailer};
use crate::Config;

/// Version reported by `/health`.
pub const VERSION: &str = match option_env!("CARGO_PKG_VERSION") {
    Some(v) => v,
    None => "unknown",
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub mailer: Arc<dyn Mailer>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: Config, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            config: Arc::new(config),
            mailer,
            started_at: Instant::now(),
        }
    }
}

// =============================================================================
// Status
// =============================================================================

/// Liveness response.
#[derive(Serialize)]
pub struct RootResponse {
    pub ok: bool,
    pub message: &'static str,
}

/// Liveness endpoint.
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        ok: true,
        message: "Server ativo",
    })
}

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    /// Seconds since the server state was created
    pub uptime: f64,
    pub version: &'static str,
    /// RFC 3339, UTC, millisecond precision
    pub timestamp: String,
}

/// Health check endpoint.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        uptime: state.started_at.elapsed().as_secs_f64(),
        version: VERSION,
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

// =============================================================================
// Contact
// =============================================================================

/// Contact form endpoint.
///
/// 1. Validates the body (400 on missing fields)
/// 2. Checks the mail route is configured (500 otherwise)
/// 3. Sends the operator notification and the acknowledgment concurrently
/// 4. Returns 200 if both were accepted, 500 with per-recipient errors otherwise
pub async fn contact(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let form = parse_form(&headers, &body).map_err(|rejection| {
        warn!(error = %rejection.body_text(), "contact_invalid_payload");
        ApiError::InvalidPayload(rejection.body_text())
    })?;

    let request = form.validate().map_err(|e| {
        warn!("contact_missing_fields");
        e
    })?;

    let (operator, sender) = state.config.mail_route().ok_or_else(|| {
        error!(
            sendgrid_api_key_set = state.config.sendgrid_api_key.is_some(),
            to_email_set = state.config.to_email.is_some(),
            "contact_mail_not_configured"
        );
        ApiError::NotConfigured
    })?;

    info!(
        email = %request.email,
        name_length = request.name.len(),
        message_length = request.message.len(),
        "contact_received"
    );

    let messages = compose_messages(&request, operator, sender);
    let outcomes = deliver_all(state.mailer.as_ref(), &messages).await;
    let response = ContactResponse::from_outcomes(&outcomes);

    let status = if response.ok {
        info!(sent_to = ?response.sent_to, "contact_relayed");
        StatusCode::OK
    } else {
        error!(
            sent_to = ?response.sent_to,
            failed = response.errors.len(),
            "contact_relay_failed"
        );
        StatusCode::INTERNAL_SERVER_ERROR
    };

    Ok((status, Json(response)).into_response())
}

/// Read the contact body. Bodies that are empty or not declared as JSON are
/// read as an empty form, leaving the verdict to field validation.
fn parse_form(headers: &HeaderMap, body: &[u8]) -> Result<ContactForm, JsonRejection> {
    if !is_json(headers) || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ContactForm::default());
    }
    Json::<ContactForm>::from_bytes(body).map(|Json(form)| form)
}

fn is_json(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let essence = content_type.split(';').next().unwrap_or_default().trim();
    essence.eq_ignore_ascii_case("application/json")
        || (essence.len() > 5
            && essence.starts_with("application/")
            && essence[essence.len() - 5..].eq_ignore_ascii_case("+json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn json_headers(content_type: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        headers
    }

    #[test]
    fn test_is_json() {
        assert!(is_json(&json_headers("application/json")));
        assert!(is_json(&json_headers("application/json; charset=utf-8")));
        assert!(is_json(&json_headers("application/vnd.api+json")));
        assert!(!is_json(&json_headers("text/plain")));
        assert!(!is_json(&HeaderMap::new()));
    }

    #[test]
    fn test_parse_form_empty_json_body_is_empty_form() {
        let form = parse_form(&json_headers("application/json"), b"").unwrap();
        assert!(form.name.is_none() && form.email.is_none() && form.message.is_none());
        assert!(parse_form(&json_headers("application/json"), b"  \n").is_ok());
    }

    #[test]
    fn test_parse_form_non_json_body_is_empty_form() {
        let form = parse_form(&json_headers("text/plain"), b"hello").unwrap();
        assert!(form.name.is_none());
    }

    #[test]
    fn test_parse_form_rejects_malformed_json() {
        assert!(parse_form(&json_headers("application/json"), b"{\"name\": ").is_err());
    }

    #[test]
    fn test_parse_form_reads_fields() {
        let body = br#"{"name":"Ana","email":"ana@example.com","message":"hi"}"#;
        let form = parse_form(&json_headers("application/json"), body).unwrap();
        assert_eq!(form.name.as_deref(), Some("Ana"));
    }
}
