use serde_json::{json, Value};

use super::common;

#[tokio::test]
async fn health_returns_ok() {
    let (pipeline, llm) = common::mock_pipeline(common::SUCCESS_REPLY);
    let base = common::spawn_server(pipeline).await;

    let resp = reqwest::get(format!("{}/health", base)).await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({"status": "ok"}));
    assert_eq!(llm.calls(), 0);
}

#[tokio::test]
async fn unknown_route_is_404() {
    let (pipeline, _) = common::mock_pipeline(common::SUCCESS_REPLY);
    let base = common::spawn_server(pipeline).await;

    let resp = reqwest::Client::new()
        .post(format!("{}/llm/rewrite", base))
        .json(&json!({"text": "x"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}
