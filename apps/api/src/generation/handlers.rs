//! Axum route handlers for the Adaptation API.

use axum::{extract::State, Json};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::models::{AdaptRequest, AdaptResponse, RenderRequest, RenderResponse};
use crate::generation::validation::validate_submission;
use crate::markup::render_with;
use crate::state::AppState;

/// POST /api/v1/adapt
///
/// Validates the vacancy/resume pair, asks the generation service for an
/// adapted resume, and returns every field both raw and rendered.
pub async fn handle_adapt(
    State(state): State<AppState>,
    Json(request): Json<AdaptRequest>,
) -> Result<Json<AdaptResponse>, AppError> {
    validate_submission(&request)?;

    let request_id = Uuid::new_v4();
    let options = state.render_options.with_mode(request.mode());
    info!(
        "Adapting resume for request {request_id} (mode: {:?})",
        options.mode
    );

    let output = state.generator.generate(&request.into_input()).await?;
    let response = AdaptResponse::render(request_id, output, options);

    info!(
        "Request {request_id} adapted with {} annotated changes",
        response.changes.total()
    );

    Ok(Json(response))
}

/// POST /api/v1/render
///
/// Re-renders annotated text in another mode, e.g. when the user flips the
/// "show changes" toggle. Never fails on malformed annotations.
pub async fn handle_render(
    State(state): State<AppState>,
    Json(request): Json<RenderRequest>,
) -> Json<RenderResponse> {
    let text = request.text.unwrap_or_default();
    let html = render_with(&text, state.render_options.with_mode(request.mode));
    Json(RenderResponse { html })
}
