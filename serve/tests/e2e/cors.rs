use reqwest::Method;
use serve::ServeSettings;

use super::common;

async fn preflight(base: &str, origin: &str) -> reqwest::Response {
    reqwest::Client::new()
        .request(Method::OPTIONS, format!("{}/llm/summarize", base))
        .header("Origin", origin)
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn default_origin_is_allowed_with_credentials() {
    let (pipeline, _) = common::mock_pipeline(common::SUCCESS_REPLY);
    let base = common::spawn_server(pipeline).await;

    let resp = preflight(&base, "http://localhost:5173").await;
    assert!(resp.status().is_success());
    let h = resp.headers();
    assert_eq!(
        h.get("access-control-allow-origin").unwrap(),
        "http://localhost:5173"
    );
    assert_eq!(h.get("access-control-allow-credentials").unwrap(), "true");
}

#[tokio::test]
async fn unknown_origin_gets_no_allow_header() {
    let (pipeline, _) = common::mock_pipeline(common::SUCCESS_REPLY);
    let base = common::spawn_server(pipeline).await;

    let resp = preflight(&base, "https://evil.example").await;
    assert!(resp.headers().get("access-control-allow-origin").is_none());
}

#[tokio::test]
async fn configured_origins_replace_defaults() {
    let (pipeline, _) = common::mock_pipeline(common::SUCCESS_REPLY);
    let settings = ServeSettings {
        cors_origins: vec!["https://editor.example".into()],
        ..ServeSettings::default()
    };
    let base = common::spawn_server_with(pipeline, settings).await;

    let resp = preflight(&base, "https://editor.example").await;
    assert_eq!(
        resp.headers().get("access-control-allow-origin").unwrap(),
        "https://editor.example"
    );
    let resp = preflight(&base, "http://localhost:5173").await;
    assert!(resp.headers().get("access-control-allow-origin").is_none());
}

#[tokio::test]
async fn pages_origin_matches_as_browsers_send_it() {
    let (pipeline, _) = common::mock_pipeline(common::SUCCESS_REPLY);
    let base = common::spawn_server(pipeline).await;

    let resp = preflight(&base, "https://gammardx.github.io").await;
    assert_eq!(
        resp.headers().get("access-control-allow-origin").unwrap(),
        "https://gammardx.github.io"
    );
}

#[tokio::test]
async fn configured_origin_case_is_ignored() {
    let (pipeline, _) = common::mock_pipeline(common::SUCCESS_REPLY);
    let settings = ServeSettings {
        cors_origins: vec!["https://Editor.Example/".into()],
        ..ServeSettings::default()
    };
    let base = common::spawn_server_with(pipeline, settings).await;

    let resp = preflight(&base, "https://editor.example").await;
    assert_eq!(
        resp.headers().get("access-control-allow-origin").unwrap(),
        "https://editor.example"
    );
}
