//! Contact submission payloads and the aggregated delivery response.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::mail::SendOutcome;

/// Raw JSON body of `POST /contact`. Every field is optional here so that
/// absence and emptiness are reported the same way by [`ContactForm::validate`].
#[derive(Debug, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A validated contact submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactForm {
    /// Require all three fields to be present and non-empty.
    pub fn validate(self) -> Result<ContactRequest, ApiError> {
        let present = |v: Option<String>| v.filter(|s| !s.is_empty());

        match (present(self.name), present(self.email), present(self.message)) {
            (Some(name), Some(email), Some(message)) => Ok(ContactRequest {
                name,
                email,
                message,
            }),
            _ => Err(ApiError::MissingFields),
        }
    }
}

/// One failed recipient in a [`ContactResponse`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryError {
    pub to: String,
    pub error: String,
}

/// Body returned by `POST /contact` once delivery was attempted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    pub ok: bool,
    pub sent_to: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<DeliveryError>,
}

impl ContactResponse {
    /// Aggregate per-message outcomes. `ok` holds iff nothing failed.
    pub fn from_outcomes(outcomes: &[SendOutcome]) -> Self {
        let mut sent_to = Vec::new();
        let mut errors = Vec::new();

        for outcome in outcomes {
            match outcome {
                SendOutcome::Delivered { recipient, .. } => sent_to.push(recipient.clone()),
                SendOutcome::Failed { recipient, error } => errors.push(DeliveryError {
                    to: recipient.clone(),
                    error: error.clone(),
                }),
            }
        }

        ContactResponse {
            ok: errors.is_empty(),
            sent_to,
            errors,
        }
    }
}
