//! Access gates applied to every request before handler dispatch.
//!
//! ```text
//! request → origin gate → CORS → IP gate (bypass for docs/health) → handler
//! ```

pub mod ip;
pub mod origin;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::header::ORIGIN,
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;
use crate::Config;

pub use ip::{check_ip, is_bypassed, normalize_ip, resolve_caller, BYPASS_PREFIXES};
pub use origin::check_origin;

/// Header carrying the proxy chain of client addresses.
pub const FORWARDED_FOR: &str = "x-forwarded-for";

/// Reject requests whose `Origin` is not allowed.
pub async fn origin_gate(
    State(config): State<Arc<Config>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // Non UTF-8 origins are kept (lossily) so they still fail the allowlist.
    let origin = request
        .headers()
        .get(ORIGIN)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());

    check_origin(origin.as_deref(), &config.allowed_origins)?;

    Ok(next.run(request).await)
}

/// Reject requests from callers outside the IP allowlist.
pub async fn ip_gate(
    State(config): State<Arc<Config>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    check_ip(request.uri().path(), &config.allowed_ips, || {
        let forwarded = request
            .headers()
            .get(FORWARDED_FOR)
            .and_then(|v| v.to_str().ok());
        let peer = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());
        resolve_caller(forwarded, peer)
    })?;

    Ok(next.run(request).await)
}
