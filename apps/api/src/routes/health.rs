use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::markup::ContentPolicy;
use crate::state::AppState;

/// GET /health
/// Reports service version and the markup content policy in effect.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "resume-adapter-api",
        "markup": {
            "escapeHtml": state.render_options.content == ContentPolicy::EscapeHtml
        }
    }))
}
