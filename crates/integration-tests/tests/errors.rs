mod harness;

use std::time::Duration;

use axum::http::StatusCode;
use conduit_config::ProviderKind;
use harness::chat_body;
use harness::config::ConfigBuilder;
use harness::mock_upstream::{MockBehavior, MockUpstream};
use harness::server::TestServer;
use serde_json::{Value, json};

async fn error_of(resp: reqwest::Response) -> (u16, Value) {
    let status = resp.status().as_u16();
    let body: Value = resp.json().await.unwrap();
    (status, body["error"].clone())
}

#[tokio::test]
async fn missing_model_or_messages_never_reaches_upstream() {
    let mock = MockUpstream::start().await.unwrap();
    let config = ConfigBuilder::new()
        .with_provider(ProviderKind::Openai, &mock.base_url(ProviderKind::Openai))
        .build();
    let server = TestServer::start(config).await.unwrap();

    let (status, error) = error_of(server.chat(&json!({"messages": [{"role": "user", "content": "hi"}]})).await).await;
    assert_eq!(status, 400);
    assert_eq!(error["code"], "missing_parameter");
    assert_eq!(error["param"], "model");
    assert_eq!(error["type"], "invalid_request_error");

    let (status, error) = error_of(server.chat(&json!({"model": "gpt-4o", "messages": []})).await).await;
    assert_eq!(status, 400);
    assert_eq!(error["param"], "messages");

    assert_eq!(mock.total(), 0);
}

#[tokio::test]
async fn unsupported_model_echoes_model() {
    let mock = MockUpstream::start().await.unwrap();
    let server = TestServer::start(ConfigBuilder::new().build()).await.unwrap();

    let (status, error) = error_of(server.chat(&chat_body("llama-3-70b")).await).await;
    assert_eq!(status, 400);
    assert_eq!(error["code"], "model_not_supported");
    assert_eq!(error["param"], "llama-3-70b");
    assert!(error["message"].as_str().unwrap().contains("llama-3-70b"));
    assert_eq!(mock.total(), 0);
}

#[tokio::test]
async fn missing_credential_is_server_error() {
    let mock = MockUpstream::start().await.unwrap();
    let config = ConfigBuilder::new()
        .with_keyless_provider(ProviderKind::Anthropic, &mock.base_url(ProviderKind::Anthropic))
        .build();
    let server = TestServer::start(config).await.unwrap();

    let (status, error) = error_of(server.chat(&chat_body("claude-3-5-sonnet-20241022")).await).await;
    assert_eq!(status, 500);
    assert_eq!(error["code"], "api_key_not_configured");
    assert_eq!(error["type"], "server_error");
    assert_eq!(mock.total(), 0);
}

#[tokio::test]
async fn malformed_body_is_invalid_json() {
    let server = TestServer::start(ConfigBuilder::new().build()).await.unwrap();

    let resp = server
        .client()
        .post(server.url("/v1/chat/completions"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    let (status, error) = error_of(resp).await;
    assert_eq!(status, 400);
    assert_eq!(error["code"], "invalid_json");
}

#[tokio::test]
async fn upstream_status_propagates() {
    let mock = MockUpstream::start_with(MockBehavior::Status(
        StatusCode::TOO_MANY_REQUESTS,
        json!({"error": {"message": "Rate limit reached", "type": "requests"}}),
    ))
    .await
    .unwrap();
    let config = ConfigBuilder::new()
        .with_provider(ProviderKind::Openai, &mock.base_url(ProviderKind::Openai))
        .build();
    let server = TestServer::start(config).await.unwrap();

    let (status, error) = error_of(server.chat(&chat_body("gpt-4o")).await).await;
    assert_eq!(status, 429);
    assert_eq!(error["code"], "upstream_error");
    assert!(error["message"].as_str().unwrap().contains("Rate limit reached"));
    assert_eq!(mock.count(ProviderKind::Openai), 1);
}

#[tokio::test]
async fn upstream_server_error_is_not_retried() {
    let mock = MockUpstream::start_with(MockBehavior::Status(
        StatusCode::SERVICE_UNAVAILABLE,
        json!({"type": "error", "error": {"type": "overloaded_error", "message": "Overloaded"}}),
    ))
    .await
    .unwrap();
    let config = ConfigBuilder::new()
        .with_provider(ProviderKind::Anthropic, &mock.base_url(ProviderKind::Anthropic))
        .build();
    let server = TestServer::start(config).await.unwrap();

    let (status, error) = error_of(server.chat(&chat_body("claude-3-haiku-20240307")).await).await;
    assert_eq!(status, 503);
    assert_eq!(error["type"], "server_error");
    assert_eq!(error["message"], "Upstream provider error: Overloaded");
    assert_eq!(mock.count(ProviderKind::Anthropic), 1);
}

#[tokio::test]
async fn unreachable_upstream_is_forwarding_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let config = ConfigBuilder::new()
        .with_provider(ProviderKind::Google, &format!("http://127.0.0.1:{port}/v1beta"))
        .build();
    let server = TestServer::start(config).await.unwrap();

    let (status, error) = error_of(server.chat(&chat_body("gemini-1.5-flash")).await).await;
    assert_eq!(status, 500);
    assert_eq!(error["code"], "forwarding_error");
    assert!(!error["message"].as_str().unwrap().contains("google-test-key"));
}

#[tokio::test]
async fn undecodable_upstream_body_is_forwarding_error() {
    let mock = MockUpstream::start_with(MockBehavior::InvalidJson).await.unwrap();
    let config = ConfigBuilder::new()
        .with_provider(ProviderKind::Xai, &mock.base_url(ProviderKind::Xai))
        .build();
    let server = TestServer::start(config).await.unwrap();

    let (status, error) = error_of(server.chat(&chat_body("grok-2")).await).await;
    assert_eq!(status, 500);
    assert_eq!(error["code"], "forwarding_error");
    assert_eq!(mock.count(ProviderKind::Xai), 1);
}

#[tokio::test]
async fn slow_upstream_hits_request_timeout() {
    let mock = MockUpstream::start_with(MockBehavior::Delay(Duration::from_secs(5))).await.unwrap();
    let config = ConfigBuilder::new()
        .with_provider(ProviderKind::Openai, &mock.base_url(ProviderKind::Openai))
        .with_request_timeout("200ms")
        .build();
    let server = TestServer::start(config).await.unwrap();

    let (status, error) = error_of(server.chat(&chat_body("gpt-4o-mini")).await).await;
    assert_eq!(status, 500);
    assert_eq!(error["code"], "forwarding_error");
}
