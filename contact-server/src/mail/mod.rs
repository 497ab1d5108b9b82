//! Outbound mail: composition, the provider seam, and settle-all delivery.
//!
//! ## Delivery Flow
//!
//! ```text
//! ContactRequest → compose_messages() → [admin, user] → deliver_all() → Vec<SendOutcome>
//! ```

pub mod compose;
pub mod sendgrid;
pub mod types;

use async_trait::async_trait;
use futures::future::join_all;
use tracing::{info, warn};

pub use compose::{admin_notification, compose_messages, sender_acknowledgment};
pub use sendgrid::SendGridClient;
pub use types::{EmailMessage, MailError, SendOutcome};

/// A transactional email provider.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send one message, returning the provider status code on success.
    async fn send(&self, message: &EmailMessage) -> Result<u16, MailError>;
}

/// Send every message concurrently and collect each outcome.
///
/// A failing send never cancels the others; outcomes come back in the same
/// order as `messages`.
pub async fn deliver_all(mailer: &dyn Mailer, messages: &[EmailMessage]) -> Vec<SendOutcome> {
    let sends = messages.iter().map(|message| async move {
        match mailer.send(message).await {
            Ok(status_code) => SendOutcome::Delivered {
                recipient: message.to.clone(),
                status_code,
            },
            Err(e) => {
                warn!(to = %message.to, error = %e, "mail_delivery_failed");
                SendOutcome::Failed {
                    recipient: message.to.clone(),
                    error: e.to_string(),
                }
            }
        }
    });

    let outcomes = join_all(sends).await;

    info!(
        attempted = outcomes.len(),
        delivered = outcomes.iter().filter(|o| o.is_delivered()).count(),
        "mail_delivery_complete"
    );

    outcomes
}
