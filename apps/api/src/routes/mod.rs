pub mod health;

use axum::{
    http::Uri,
    routing::{get, post},
    Router,
};

use crate::errors::AppError;
use crate::generation::handlers;
use crate::state::AppState;

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {uri}"))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Adaptation API
        .route("/api/v1/adapt", post(handlers::handle_adapt))
        .route("/api/v1/render", post(handlers::handle_render))
        .fallback(not_found)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header::CONTENT_TYPE, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::generation::client::{GenerationError, GenerationService};
    use crate::generation::models::{GenerationInput, GenerationOutput};
    use crate::markup::{ContentPolicy, RenderOptions};

    enum StubReply {
        Output(GenerationOutput),
        Rejected(&'static str),
    }

    struct StubGenerator {
        reply: StubReply,
        calls: AtomicU32,
    }

    #[async_trait]
    impl GenerationService for StubGenerator {
        async fn generate(
            &self,
            _input: &GenerationInput,
        ) -> Result<GenerationOutput, GenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                StubReply::Output(output) => Ok(output.clone()),
                StubReply::Rejected(message) => Err(GenerationError::Service {
                    status: 422,
                    message: message.to_string(),
                }),
            }
        }
    }

    fn stub(reply: StubReply) -> Arc<StubGenerator> {
        Arc::new(StubGenerator {
            reply,
            calls: AtomicU32::new(0),
        })
    }

    fn generated() -> StubReply {
        StubReply::Output(GenerationOutput {
            adapted_resume: "[[~Java→Rust]] developer\n[[+Tokio]], [[^Team lead]]".to_string(),
            recommendations: "Prepare to discuss [[+ownership]]".to_string(),
            chances: "Match improved from 45% to 80%".to_string(),
        })
    }

    fn app(generator: Arc<StubGenerator>, content: ContentPolicy) -> Router {
        build_router(AppState {
            generator,
            render_options: RenderOptions {
                content,
                ..RenderOptions::default()
            },
        })
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        send(app, request).await
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(app(stub(generated()), ContentPolicy::Verbatim), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["markup"]["escapeHtml"], false);
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let request = Request::builder().uri("/api/v1/missing").body(Body::empty()).unwrap();
        let (status, body) = send(app(stub(generated()), ContentPolicy::Verbatim), request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_adapt_renders_diff_by_default() {
        let generator = stub(generated());
        let (status, body) = post_json(
            app(generator.clone(), ContentPolicy::Verbatim),
            "/api/v1/adapt",
            json!({"vacancy": "Rust developer", "resume": "Java developer"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
        assert_eq!(body["mode"], "diff");
        assert_eq!(
            body["adaptedResume"]["html"],
            "<del>Java</del> → <ins>Rust</ins> developer<br />\
             <mark class=\"added\">Tokio</mark>, <span class=\"moved\">Team lead</span>"
        );
        assert_eq!(
            body["recommendations"]["html"],
            "Prepare to discuss <mark class=\"added\">ownership</mark>"
        );
        assert_eq!(body["chances"], "Match improved from 45% to 80%");
        assert_eq!(body["changes"]["additions"], 1);
        assert_eq!(body["changes"]["replacements"], 1);
        assert_eq!(body["changes"]["moves"], 1);
        assert!(body["requestId"].is_string());
    }

    #[tokio::test]
    async fn test_adapt_clean_view() {
        let (status, body) = post_json(
            app(stub(generated()), ContentPolicy::Verbatim),
            "/api/v1/adapt",
            json!({"vacancy": "v", "resume": "r", "showChanges": false}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["mode"], "clean");
        assert_eq!(
            body["adaptedResume"]["html"],
            "Rust developer<br />Tokio, Team lead"
        );
        assert_eq!(
            body["adaptedResume"]["text"],
            "[[~Java→Rust]] developer\n[[+Tokio]], [[^Team lead]]"
        );
    }

    #[tokio::test]
    async fn test_adapt_blank_fields_skip_generation() {
        let generator = stub(generated());
        let (status, body) = post_json(
            app(generator.clone(), ContentPolicy::Verbatim),
            "/api/v1/adapt",
            json!({"vacancy": "   ", "resume": "Java developer"}),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_adapt_missing_fields_are_a_validation_error() {
        let (status, _) = post_json(
            app(stub(generated()), ContentPolicy::Verbatim),
            "/api/v1/adapt",
            json!({}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_adapt_surfaces_generation_error() {
        let (status, body) = post_json(
            app(stub(StubReply::Rejected("Resume is too short")), ContentPolicy::Verbatim),
            "/api/v1/adapt",
            json!({"vacancy": "v", "resume": "r"}),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "GENERATION_ERROR");
        assert_eq!(body["error"]["message"], "Resume is too short");
    }

    #[tokio::test]
    async fn test_adapt_empty_generation_fields() {
        let (status, body) = post_json(
            app(
                stub(StubReply::Output(GenerationOutput::default())),
                ContentPolicy::Verbatim,
            ),
            "/api/v1/adapt",
            json!({"vacancy": "v", "resume": "r"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["adaptedResume"]["html"], "");
        assert_eq!(body["recommendations"]["html"], "");
        assert_eq!(body["chances"], "");
        assert_eq!(body["changes"]["additions"], 0);
    }

    #[tokio::test]
    async fn test_render_defaults_to_diff() {
        let (status, body) = post_json(
            app(stub(generated()), ContentPolicy::Verbatim),
            "/api/v1/render",
            json!({"text": "[[+New Skill]] added"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["html"], "<mark class=\"added\">New Skill</mark> added");
    }

    #[tokio::test]
    async fn test_render_clean_mode() {
        let (_, body) = post_json(
            app(stub(generated()), ContentPolicy::Verbatim),
            "/api/v1/render",
            json!({"text": "[[~Java→Python]] developer", "mode": "clean"}),
        )
        .await;
        assert_eq!(body["html"], "Python developer");
    }

    #[tokio::test]
    async fn test_render_null_text_is_empty() {
        let (status, body) = post_json(
            app(stub(generated()), ContentPolicy::Verbatim),
            "/api/v1/render",
            json!({"text": null, "mode": "clean"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["html"], "");
    }

    #[tokio::test]
    async fn test_render_uses_configured_escape_policy() {
        let (_, body) = post_json(
            app(stub(generated()), ContentPolicy::EscapeHtml),
            "/api/v1/render",
            json!({"text": "<script>x</script>[[+a&b]]"}),
        )
        .await;
        assert_eq!(
            body["html"],
            "&lt;script&gt;x&lt;/script&gt;<mark class=\"added\">a&amp;b</mark>"
        );
    }
}
