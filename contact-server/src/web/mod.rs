//! Web server module.
//!
//! Request pipeline, outermost first:
//! - Tracing and panic capture
//! - Origin gate, then CORS response headers
//! - IP gate (docs and health are exempt)
//! - Route handlers

pub mod docs;
pub mod handlers;

use std::any::Any;

use axum::{
    http::{HeaderValue, Method},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowHeaders, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, warn};

use crate::config::Allowlist;
use crate::error::ApiError;
use crate::gate::{ip_gate, origin_gate};

pub use docs::ApiDocs;
pub use handlers::{contact, health, root, AppState, HealthResponse, RootResponse, VERSION};

/// Build the application router.
///
/// Documentation routes are only registered when `docs` is available.
pub fn router(state: AppState, docs: Option<ApiDocs>) -> Router {
    let config = state.config.clone();

    let mut app = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/contact", post(contact))
        .with_state(state);

    if let Some(docs) = docs {
        app = app.merge(docs::routes(docs));
    }

    app.layer(middleware::from_fn_with_state(config.clone(), ip_gate))
        .layer(cors_layer(&config.allowed_origins))
        .layer(middleware::from_fn_with_state(config, origin_gate))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
}

/// CORS headers for origins that made it through the origin gate.
fn cors_layer(origins: &Allowlist) -> CorsLayer {
    let allow_origin = match origins {
        Allowlist::Any => AllowOrigin::any(),
        Allowlist::Only(list) => AllowOrigin::list(list.iter().filter_map(|origin| {
            HeaderValue::from_str(origin)
                .map_err(|_| warn!(origin = %origin, "cors_origin_invalid"))
                .ok()
        })),
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::HEAD, Method::POST])
        .allow_headers(AllowHeaders::mirror_request())
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    error!(detail = %detail, "request_panicked");
    ApiError::Internal(detail).into_response()
}
