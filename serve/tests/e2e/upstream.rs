//! Full stack: HTTP route → pipeline → chat-completions client → fake provider.

use std::time::Duration;

use quill::{LlmSettings, Pipeline, Provider};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::common;

fn provider(name: &str, url: String) -> Provider {
    Provider {
        name: name.into(),
        url,
        model: "test-model".into(),
        api_key: "sk-test".into(),
    }
}

#[tokio::test]
async fn primary_failure_falls_back_through_http() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/primary"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&upstream)
        .await;
    Mock::given(method("POST"))
        .and(path("/fallback"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": common::SUCCESS_REPLY}}]
        })))
        .expect(1)
        .mount(&upstream)
        .await;

    let settings = LlmSettings {
        providers: vec![
            provider("primary", format!("{}/primary", upstream.uri())),
            provider("fallback", format!("{}/fallback", upstream.uri())),
        ],
        timeout: Duration::from_secs(5),
        temperature: 0.1,
    };
    let base = common::spawn_server(Pipeline::from_settings(&settings).unwrap()).await;

    let resp = reqwest::Client::new()
        .post(format!("{}/llm/summarize", base))
        .json(&json!({"text": "Il gatto nero dorme.", "percentage": 50}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["detected_language"], "it");
}
