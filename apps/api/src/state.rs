use std::sync::Arc;

use crate::generation::client::GenerationService;
use crate::markup::RenderOptions;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable generation backend. Default: HttpGenerationService.
    pub generator: Arc<dyn GenerationService>,
    /// Base render options; handlers override only the mode per request.
    pub render_options: RenderOptions,
}
