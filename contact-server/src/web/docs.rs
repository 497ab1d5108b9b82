//! API documentation: the raw OpenAPI file and a Swagger UI viewer.

use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::State,
    http::header::CONTENT_TYPE,
    response::{Html, IntoResponse},
    routing::get,
    Router,
};
use tracing::{info, warn};

const VIEWER_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>Contact API</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
  <script>
    window.onload = () => {
      window.ui = SwaggerUIBundle({ url: "/swagger.yaml", dom_id: "#swagger-ui" });
    };
  </script>
</body>
</html>
"##;

/// OpenAPI document compiled into the binary.
const BUNDLED_SPEC: &str = include_str!("../../swagger.yaml");

/// The loaded OpenAPI document.
#[derive(Clone)]
pub struct ApiDocs {
    spec: Arc<str>,
}

impl ApiDocs {
    pub fn from_yaml(spec: impl Into<Arc<str>>) -> Self {
        Self { spec: spec.into() }
    }

    /// The document shipped with the crate.
    pub fn bundled() -> Self {
        Self::from_yaml(BUNDLED_SPEC)
    }

    /// Use the file at `path` when one is configured, the bundled document
    /// otherwise. A configured file that cannot be read disables the docs.
    pub fn resolve(path: Option<&Path>) -> Option<Self> {
        match path {
            Some(path) => Self::load_or_warn(path),
            None => Some(Self::bundled()),
        }
    }

    /// Read the document from disk.
    pub fn load(path: &Path) -> std::io::Result<Self> {
        std::fs::read_to_string(path).map(Self::from_yaml)
    }

    /// Read the document, logging a warning and returning `None` on failure.
    pub fn load_or_warn(path: &Path) -> Option<Self> {
        match Self::load(path) {
            Ok(docs) => {
                info!(path = %path.display(), "docs_spec_loaded");
                Some(docs)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "docs_spec_load_failed");
                None
            }
        }
    }
}

/// Routes serving `/swagger.yaml` and `/docs`.
pub fn routes(docs: ApiDocs) -> Router {
    Router::new()
        .route("/swagger.yaml", get(spec))
        .route("/docs", get(viewer))
        .with_state(docs)
}

async fn spec(State(docs): State<ApiDocs>) -> impl IntoResponse {
    ([(CONTENT_TYPE, "application/yaml")], docs.spec.to_string())
}

async fn viewer() -> Html<&'static str> {
    Html(VIEWER_HTML)
}
