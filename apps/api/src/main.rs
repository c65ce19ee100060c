mod config;
mod errors;
mod generation;
mod markup;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::{header::CONTENT_TYPE, HeaderValue, Method};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::generation::client::HttpGenerationService;
use crate::markup::RenderOptions;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Adapter API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize generation client
    let generator = HttpGenerationService::new(
        config.generation_service_url.clone(),
        config.generation_timeout,
    )?
    .with_retry_delay(config.generation_retry_delay);
    info!(
        "Generation client initialized (endpoint: {}, timeout: {}s)",
        generator.endpoint(),
        config.generation_timeout.as_secs()
    );

    let render_options = RenderOptions {
        content: config.content_policy(),
        ..RenderOptions::default()
    };
    info!("Markup content policy: {:?}", render_options.content);

    let state = AppState {
        generator: Arc::new(generator),
        render_options,
    };

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(&config)?),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Restricts CORS to `CORS_ALLOW_ORIGIN` when set, otherwise allows any origin.
fn cors_layer(config: &Config) -> Result<CorsLayer> {
    let Some(origin) = &config.cors_allow_origin else {
        return Ok(CorsLayer::permissive());
    };

    let origin = origin
        .parse::<HeaderValue>()
        .with_context(|| format!("CORS_ALLOW_ORIGIN is not a valid origin: {origin}"))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]))
}
