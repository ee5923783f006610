//! Axum app: shared state, router, and middleware.
//!
//! `POST /llm/{summarize,improve,translate,six-hats}` run the pipeline; `GET /health` is a
//! liveness probe. CORS, request tracing and a body-size limit wrap every route; axum's own
//! 2 MiB extractor limit is disabled so `max_body_bytes` is the only cap.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::request::Parts;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use quill::{ImproveBody, Pipeline, SixHatsBody, SummarizeBody, TranslateBody};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::routes::{health, run_operation};
use crate::settings::ServeSettings;

/// Shared state for all handlers.
pub(crate) struct AppState {
    pub(crate) pipeline: Pipeline,
}

/// Credentialed CORS for the configured origins; methods and headers are mirrored.
/// Origins match case-insensitively, since browsers send the host lowercased.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<String> = origins
        .iter()
        .map(|o| o.trim().trim_end_matches('/').to_ascii_lowercase())
        .filter(|o| !o.is_empty())
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _: &Parts| match origin.to_str() {
                Ok(o) => allowed.iter().any(|a| a.eq_ignore_ascii_case(o)),
                Err(_) => false,
            },
        ))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

/// Builds the router for `pipeline` with the given settings.
pub fn router(pipeline: Pipeline, settings: &ServeSettings) -> Router {
    let state = Arc::new(AppState { pipeline });
    Router::new()
        .route("/health", get(health))
        .route("/llm/summarize", post(run_operation::<SummarizeBody>))
        .route("/llm/improve", post(run_operation::<ImproveBody>))
        .route("/llm/translate", post(run_operation::<TranslateBody>))
        .route("/llm/six-hats", post(run_operation::<SixHatsBody>))
        .with_state(state)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(settings.max_body_bytes))
        .layer(cors_layer(&settings.cors_origins))
        .layer(TraceLayer::new_for_http())
}
