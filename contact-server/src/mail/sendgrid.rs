//! SendGrid v3 `mail/send` client.
//! Reference: https://www.twilio.com/docs/sendgrid/api-reference/mail-send/mail-send

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::types::{EmailMessage, MailError};
use super::Mailer;

/// Path of the send endpoint relative to the API base URL.
pub const SEND_PATH: &str = "/v3/mail/send";

/// Mailer backed by the SendGrid HTTP API.
#[derive(Clone)]
pub struct SendGridClient {
    client: Client,
    api_key: Option<String>,
    endpoint: String,
}

#[derive(Serialize)]
struct SendRequest<'a> {
    personalizations: [Personalization<'a>; 1],
    from: Address<'a>,
    subject: &'a str,
    content: [Content<'a>; 2],
}

#[derive(Serialize)]
struct Personalization<'a> {
    to: [Address<'a>; 1],
}

#[derive(Serialize)]
struct Address<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    value: &'a str,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<ErrorItem>,
}

#[derive(Deserialize)]
struct ErrorItem {
    #[serde(default)]
    message: String,
}

impl<'a> From<&'a EmailMessage> for SendRequest<'a> {
    fn from(message: &'a EmailMessage) -> Self {
        SendRequest {
            personalizations: [Personalization {
                to: [Address { email: &message.to }],
            }],
            from: Address {
                email: &message.from,
            },
            subject: &message.subject,
            // SendGrid requires text/plain before text/html.
            content: [
                Content {
                    kind: "text/plain",
                    value: &message.text,
                },
                Content {
                    kind: "text/html",
                    value: &message.html,
                },
            ],
        }
    }
}

impl SendGridClient {
    /// Create a client for the API rooted at `base_url`.
    pub fn new(api_key: Option<String>, base_url: &str) -> Result<Self, MailError> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            api_key,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), SEND_PATH),
        })
    }

    /// Full URL of the send endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Mailer for SendGridClient {
    async fn send(&self, message: &EmailMessage) -> Result<u16, MailError> {
        let api_key = self.api_key.as_deref().ok_or(MailError::MissingApiKey)?;

        info!(
            to = %message.to,
            subject_length = message.subject.len(),
            html_length = message.html.len(),
            "sendgrid_send_starting"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&SendRequest::from(message))
            .send()
            .await
            .map_err(|e| {
                error!(to = %message.to, error = %e, "sendgrid_request_error");
                MailError::Http(e)
            })?;

        let status = response.status();
        if status.is_success() {
            info!(to = %message.to, status_code = status.as_u16(), "sendgrid_send_complete");
            return Ok(status.as_u16());
        }

        let body = response.text().await.unwrap_or_default();
        let detail = error_detail(&body);
        error!(
            to = %message.to,
            status_code = status.as_u16(),
            detail = %detail,
            "sendgrid_send_rejected"
        );

        Err(MailError::Status { status, detail })
    }
}

/// Flatten SendGrid's `{"errors":[{"message":...}]}` body into one line,
/// falling back to the raw body.
fn error_detail(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) if !parsed.errors.is_empty() => parsed
            .errors
            .into_iter()
            .map(|e| e.message)
            .filter(|m| !m.is_empty())
            .collect::<Vec<_>>()
            .join("; "),
        _ => body.trim().to_string(),
    }
}
