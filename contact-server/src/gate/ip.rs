//! Caller address resolution and IP allowlisting.

use std::net::IpAddr;

use tracing::warn;

use crate::config::Allowlist;
use crate::error::ApiError;

/// Path prefixes that are never subject to the IP allowlist.
pub const BYPASS_PREFIXES: &[&str] = &["/docs", "/swagger.yaml", "/health"];

/// Whether `path` is exempt from the IP gate.
pub fn is_bypassed(path: &str) -> bool {
    BYPASS_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

/// Strip the IPv4-in-IPv6 wrapper and map the IPv6 loopback to `127.0.0.1`.
pub fn normalize_ip(ip: &str) -> String {
    if let Some(v4) = ip.strip_prefix("::ffff:") {
        return v4.to_string();
    }
    if ip == "::1" {
        return "127.0.0.1".to_string();
    }
    ip.to_string()
}

/// Resolve the caller address for a request.
///
/// The first entry of `X-Forwarded-For` wins; when the header is absent or
/// empty the transport peer is used. Returns an empty string when nothing
/// is known.
pub fn resolve_caller(forwarded_for: Option<&str>, peer: Option<IpAddr>) -> String {
    let forwarded = forwarded_for
        .and_then(|header| header.split(',').next())
        .map(str::trim)
        .filter(|first| !first.is_empty());

    match (forwarded, peer) {
        (Some(first), _) => normalize_ip(first),
        (None, Some(addr)) => normalize_ip(&addr.to_string()),
        (None, None) => String::new(),
    }
}

/// Decide whether a caller may reach `path`.
///
/// The caller address is only resolved when the allowlist is actually
/// enforced for this path.
pub fn check_ip<F>(path: &str, allowed: &Allowlist, caller: F) -> Result<(), ApiError>
where
    F: FnOnce() -> String,
{
    if is_bypassed(path) || allowed.is_empty() {
        return Ok(());
    }
    if let Allowlist::Any = allowed {
        return Ok(());
    }

    let ip = caller();
    if ip.is_empty() {
        warn!(path = %path, "ip_unknown_rejected");
        return Err(ApiError::UnknownIp);
    }

    if allowed.permits(&ip) {
        Ok(())
    } else {
        warn!(ip = %ip, path = %path, "ip_rejected");
        Err(ApiError::IpNotAllowed(ip))
    }
}
