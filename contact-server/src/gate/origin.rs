//! Origin allowlisting for browser callers.

use tracing::warn;

use crate::config::Allowlist;
use crate::error::ApiError;

/// Decide whether a request with the given `Origin` header may proceed.
///
/// Requests without an origin (curl, server-to-server) are always allowed.
/// An empty header counts as no origin.
pub fn check_origin(origin: Option<&str>, allowed: &Allowlist) -> Result<(), ApiError> {
    let origin = match origin.filter(|o| !o.is_empty()) {
        Some(o) => o,
        None => return Ok(()),
    };

    if allowed.permits(origin) {
        return Ok(());
    }

    warn!(origin = %origin, "origin_rejected");
    Err(ApiError::OriginNotAllowed(origin.to_string()))
}
