//! HTTP viewer for the generated diagram.
//!
//! `source` and `regenerate` return a status code and a JSON body; `router`
//! mounts them, plus an HTML page that renders the diagram in the browser.
//!
//! Routes:
//! - `GET  /erd`            viewer page
//! - `GET  /erd/source`     stored diagram as `{"mermaid": ...}`
//! - `POST /erd/regenerate` re-introspect and rewrite the artifact

use std::path::Path;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect},
    routing::{get, post},
    Json, Router,
};
use log::error;
use serde_json::{json, Value};

use crate::{config::AppConfig, models::connections::Filter, output};

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: Value,
}

impl Response {
    fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }
}

impl IntoResponse for Response {
    fn into_response(self) -> axum::response::Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.body)).into_response()
    }
}

/// The stored diagram without its fence lines.
pub fn source(path: &Path) -> Response {
    match output::read_diagram(path) {
        Ok(Some(diagram)) => Response::new(200, json!({ "mermaid": diagram })),
        Ok(None) => Response::new(404, json!({ "mermaid": null })),
        Err(e) => {
            error!("Failed to read {}: {}", path.display(), e);
            Response::new(500, json!({ "mermaid": null, "error": e.to_string() }))
        }
    }
}

/// Re-introspects everything and rewrites the artifact.
///
/// The pipeline runs on its own task so a slow catalog does not hold up the
/// caller's executor thread.
pub async fn regenerate(config: &AppConfig) -> Response {
    let config = config.clone();
    let task = tokio::spawn(async move { crate::regenerate(&config, &Filter::default()).await });

    match task.await {
        Ok(Ok(summary)) => Response::new(
            200,
            json!({
                "ok": true,
                "tables": summary.tables,
                "relationships": summary.relationships,
            }),
        ),
        Ok(Err(e)) => {
            error!("Regeneration failed: {}", e);
            Response::new(500, json!({ "ok": false, "error": e.to_string() }))
        }
        Err(e) => {
            error!("Regeneration task failed: {}", e);
            Response::new(500, json!({ "ok": false, "error": e.to_string() }))
        }
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Viewer page. Without a diagram it shows a prompt to regenerate.
pub fn page(diagram: Option<&str>) -> String {
    let body = match diagram {
        Some(diagram) => format!("<pre class=\"mermaid\">{}</pre>", escape_html(diagram)),
        None => "<p>No diagram has been generated yet.</p>".to_string(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>ERD</title>
  <script type="module">
    import mermaid from "https://cdn.jsdelivr.net/npm/mermaid@11/dist/mermaid.esm.min.mjs";
    mermaid.initialize({{ startOnLoad: true }});
  </script>
</head>
<body>
  <button id="regenerate">Regenerate</button>
  <span id="status"></span>
  {}
  <script>
    document.getElementById("regenerate").addEventListener("click", async () => {{
      const status = document.getElementById("status");
      status.textContent = "Regenerating...";
      const res = await fetch("/erd/regenerate", {{ method: "POST" }});
      const data = await res.json();
      if (data.ok) {{
        location.reload();
      }} else {{
        status.textContent = "Failed: " + data.error;
      }}
    }});
  </script>
</body>
</html>
"#,
        body
    )
}

async fn page_handler(State(config): State<AppConfig>) -> Html<String> {
    let diagram = match output::read_diagram(&config.output_path) {
        Ok(diagram) => diagram,
        Err(e) => {
            error!("Failed to read {}: {}", config.output_path.display(), e);
            None
        }
    };
    Html(page(diagram.as_deref()))
}

async fn source_handler(State(config): State<AppConfig>) -> Response {
    source(&config.output_path)
}

async fn regenerate_handler(State(config): State<AppConfig>) -> Response {
    regenerate(&config).await
}

pub fn router(config: AppConfig) -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::to("/erd") }))
        .route("/erd", get(page_handler))
        .route("/erd/", get(page_handler))
        .route("/erd/source", get(source_handler))
        .route("/erd/regenerate", post(regenerate_handler))
        .with_state(config)
}
