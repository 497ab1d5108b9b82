//! Message and outcome types for outbound mail.

use reqwest::StatusCode;
use serde::Serialize;

/// A fully composed outbound email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailMessage {
    pub to: String,
    pub from: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Result of handing one message to the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// The provider accepted the message.
    Delivered { recipient: String, status_code: u16 },
    /// The provider rejected the message or could not be reached.
    Failed { recipient: String, error: String },
}

impl SendOutcome {
    pub fn recipient(&self) -> &str {
        match self {
            SendOutcome::Delivered { recipient, .. } | SendOutcome::Failed { recipient, .. } => {
                recipient
            }
        }
    }

    pub fn is_delivered(&self) -> bool {
        matches!(self, SendOutcome::Delivered { .. })
    }
}

/// Errors raised while sending a single message.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// No API key was configured for the provider.
    #[error("provider API key is not configured")]
    MissingApiKey,

    /// The request never produced a response.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("provider returned {status}: {detail}")]
    Status { status: StatusCode, detail: String },
}
