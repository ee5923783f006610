//! Handlers for the operation routes and `/health`.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use quill::{ResponseEnvelope, TextRequest};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiError;

/// `GET /health`.
pub(crate) async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

/// `POST /llm/<operation>`: body `B` is converted into a [`TextRequest`] and run through the
/// pipeline. Every envelope, refusals included, is a 200.
pub(crate) async fn run_operation<B>(
    State(state): State<Arc<AppState>>,
    body: Result<Json<B>, JsonRejection>,
) -> Result<Json<ResponseEnvelope>, ApiError>
where
    B: DeserializeOwned + Into<TextRequest> + Send + 'static,
{
    let Json(body) = body.map_err(|e| {
        tracing::info!(error = %e, "rejected request body");
        ApiError::from(e)
    })?;
    let req: TextRequest = body.into();
    match state.pipeline.run(&req).await {
        Ok(envelope) => Ok(Json(envelope)),
        Err(e) => {
            let e = ApiError::from(e);
            if e.status().is_server_error() {
                tracing::error!(operation = %req.operation(), error = %e, "request failed");
            }
            Err(e)
        }
    }
}
