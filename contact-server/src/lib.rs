//! Contact Relay - contact-form backend that forwards submissions by email.
//!
//! Each valid `POST /contact` produces two messages sent through SendGrid:
//! a notification to the operator and an acknowledgment to the submitter.
//!
//! ## Architecture
//!
//! ```text
//! Request → Origin gate → IP gate → Contact handler → [admin, user] → SendGrid
//! ```

pub mod config;
pub mod contact;
pub mod error;
pub mod gate;
pub mod mail;
pub mod web;

// Re-export commonly used types
pub use config::{Allowlist, Config};
pub use contact::{ContactForm, ContactRequest, ContactResponse};
pub use error::ApiError;
pub use mail::{EmailMessage, MailError, Mailer, SendGridClient, SendOutcome};
pub use web::{router, ApiDocs, AppState};
