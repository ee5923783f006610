use std::sync::Arc;

use quill::MockLlm;
use serde_json::{json, Value};
use serve::ServeSettings;

use super::common;

async fn post_raw(base: &str, route: &str, body: String) -> (u16, Value) {
    let resp = reqwest::Client::new()
        .post(format!("{}{}", base, route))
        .header("content-type", "application/json")
        .body(body)
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    let body = resp.json().await.unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn unknown_hat_is_400_without_model_call() {
    let (pipeline, llm) = common::mock_pipeline(common::SUCCESS_REPLY);
    let base = common::spawn_server(pipeline).await;

    let (status, body) = post_raw(
        &base,
        "/llm/six-hats",
        json!({"text": "testo", "hat": "purple"}).to_string(),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "unsupported_option");
    assert!(body["message"].as_str().unwrap().contains("purple"));
    assert_eq!(llm.calls(), 0);
}

#[tokio::test]
async fn malformed_json_is_400() {
    let (pipeline, llm) = common::mock_pipeline(common::SUCCESS_REPLY);
    let base = common::spawn_server(pipeline).await;

    let (status, body) = post_raw(&base, "/llm/summarize", "not valid json".into()).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "invalid_request");
    assert_eq!(llm.calls(), 0);
}

#[tokio::test]
async fn missing_field_is_400() {
    let (pipeline, _) = common::mock_pipeline(common::SUCCESS_REPLY);
    let base = common::spawn_server(pipeline).await;

    let (status, body) = post_raw(
        &base,
        "/llm/translate",
        json!({"text": "ciao", "target_language": "en"}).to_string(),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "invalid_request");
}

#[tokio::test]
async fn negative_percentage_is_400() {
    let (pipeline, _) = common::mock_pipeline(common::SUCCESS_REPLY);
    let base = common::spawn_server(pipeline).await;

    let (status, _) = post_raw(
        &base,
        "/llm/summarize",
        json!({"text": "ciao", "percentage": -5}).to_string(),
    )
    .await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn all_providers_down_is_502() {
    let pipeline = common::pipeline_with(vec![
        Arc::new(MockLlm::failing("primary")),
        Arc::new(MockLlm::failing("fallback")),
    ]);
    let base = common::spawn_server(pipeline).await;

    let (status, body) = post_raw(
        &base,
        "/llm/improve",
        json!({"text": "testo", "criterion": "formale"}).to_string(),
    )
    .await;
    assert_eq!(status, 502);
    assert_eq!(body["error"], "upstream_error");
}

#[tokio::test]
async fn prose_reply_is_500_extraction_error() {
    let (pipeline, _) = common::mock_pipeline("Mi dispiace, non posso aiutarti.");
    let base = common::spawn_server(pipeline).await;

    let (status, body) = post_raw(
        &base,
        "/llm/summarize",
        json!({"text": "testo", "percentage": 50}).to_string(),
    )
    .await;
    assert_eq!(status, 500);
    assert_eq!(body["error"], "extraction_error");
}

#[tokio::test]
async fn wrong_envelope_shape_is_500_schema_error() {
    let (pipeline, _) = common::mock_pipeline(r#"{"outcome":"success"}"#);
    let base = common::spawn_server(pipeline).await;

    let (status, body) = post_raw(
        &base,
        "/llm/summarize",
        json!({"text": "testo", "percentage": 50}).to_string(),
    )
    .await;
    assert_eq!(status, 500);
    assert_eq!(body["error"], "schema_error");
    assert!(body["message"].as_str().unwrap().contains("outcome"));
}

#[tokio::test]
async fn oversized_body_is_413() {
    let (pipeline, llm) = common::mock_pipeline(common::SUCCESS_REPLY);
    let settings = ServeSettings {
        max_body_bytes: 64,
        ..ServeSettings::default()
    };
    let base = common::spawn_server_with(pipeline, settings).await;

    let text = "a".repeat(500);
    let (status, _) = post_raw(
        &base,
        "/llm/summarize",
        json!({"text": text, "percentage": 50}).to_string(),
    )
    .await;
    assert_eq!(status, 413);
    assert_eq!(llm.calls(), 0);
}

#[tokio::test]
async fn configured_limit_above_two_mib_is_honoured() {
    let (pipeline, llm) = common::mock_pipeline(common::SUCCESS_REPLY);
    let settings = ServeSettings {
        max_body_bytes: 8 * 1024 * 1024,
        ..ServeSettings::default()
    };
    let base = common::spawn_server_with(pipeline, settings).await;

    let text = "a".repeat(3 * 1024 * 1024);
    let (status, _) = post_raw(
        &base,
        "/llm/summarize",
        json!({"text": text, "percentage": 50}).to_string(),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(llm.calls(), 1);
}
