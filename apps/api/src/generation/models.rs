use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::markup::{render_with, summarize, ChangeSummary, RenderMode, RenderOptions};

// ────────────────────────────────────────────────────────────────────────────
// Generation service payloads
// ────────────────────────────────────────────────────────────────────────────

/// Body sent to the generation service.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationInput {
    pub vacancy: String,
    pub resume: String,
}

/// The three text fields the generation service produces.
/// A field the service leaves out is an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationOutput {
    pub adapted_resume: String,
    pub recommendations: String,
    /// Fit-score narrative. Opaque text, never parsed.
    pub chances: String,
}

// ────────────────────────────────────────────────────────────────────────────
// API request / response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdaptRequest {
    #[serde(default)]
    pub vacancy: String,
    #[serde(default)]
    pub resume: String,
    /// Diff view when absent.
    pub show_changes: Option<bool>,
}

impl AdaptRequest {
    pub fn mode(&self) -> RenderMode {
        self.show_changes.map(RenderMode::from).unwrap_or_default()
    }

    pub fn into_input(self) -> GenerationInput {
        GenerationInput {
            vacancy: self.vacancy,
            resume: self.resume,
        }
    }
}

/// Raw annotated text next to its rendered fragment.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedText {
    pub text: String,
    pub html: String,
}

impl RenderedText {
    fn new(text: String, options: RenderOptions) -> Self {
        let html = render_with(&text, options);
        Self { text, html }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdaptResponse {
    pub request_id: Uuid,
    pub generated_at: DateTime<Utc>,
    /// Mode the adapted resume was rendered in.
    pub mode: RenderMode,
    pub adapted_resume: RenderedText,
    pub recommendations: RenderedText,
    pub chances: String,
    /// Annotation counts for the adapted resume.
    pub changes: ChangeSummary,
}

impl AdaptResponse {
    /// Renders the generated fields. Recommendations are always shown in diff
    /// mode; only the adapted resume follows the caller's toggle.
    pub fn render(request_id: Uuid, output: GenerationOutput, options: RenderOptions) -> Self {
        let changes = summarize(&output.adapted_resume);
        Self {
            request_id,
            generated_at: Utc::now(),
            mode: options.mode,
            adapted_resume: RenderedText::new(output.adapted_resume, options),
            recommendations: RenderedText::new(
                output.recommendations,
                options.with_mode(RenderMode::Diff),
            ),
            chances: output.chances,
            changes,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderRequest {
    /// Absent or `null` renders as an empty fragment.
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub mode: RenderMode,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderResponse {
    pub html: String,
}
