//! Shared helpers for e2e tests.

use std::sync::Arc;

use quill::{LlmClient, MockLlm, ModelInvoker, Pipeline, PromptBuilder};
use serve::ServeSettings;
use tokio::net::TcpListener;

pub const SUCCESS_REPLY: &str = "```json\n{\"outcome\":{\"status\":\"success\",\"code\":\"OK\",\"violation_category\":null},\"data\":{\"rewritten_text\":\"Il gatto dorme.\",\"detected_language\":\"it\"}}\n```";

pub fn pipeline_with(clients: Vec<Arc<dyn LlmClient>>) -> Pipeline {
    Pipeline::new(PromptBuilder::default(), ModelInvoker::new(clients))
}

/// A single mock provider that always answers `reply`.
pub fn mock_pipeline(reply: &str) -> (Pipeline, Arc<MockLlm>) {
    let llm = Arc::new(MockLlm::replying("primary", reply));
    (pipeline_with(vec![llm.clone()]), llm)
}

/// Binds a random port and serves `pipeline` with default settings. Returns the base URL.
pub async fn spawn_server(pipeline: Pipeline) -> String {
    spawn_server_with(pipeline, ServeSettings::default()).await
}

pub async fn spawn_server_with(pipeline: Pipeline, settings: ServeSettings) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = serve::run_serve_with_settings(listener, pipeline, &settings).await;
    });
    format!("http://{}", addr)
}
