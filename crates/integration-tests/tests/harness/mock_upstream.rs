//! Mock upstream speaking all four provider wire formats
//!
//! Each provider lives under its own path prefix (`/openai/v1`,
//! `/anthropic/v1`, `/google/v1beta`, `/xai/v1`) so one mock can serve a
//! whole gateway config. Every request is counted and recorded.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::extract::{Path, RawQuery, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Router, routing};
use conduit_config::ProviderKind;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

/// Chunks sent for a streamed `OpenAI`/xAI response
pub const OPENAI_STREAM: &[&str] = &[
    "data: {\"id\":\"chatcmpl-mock\",\"object\":\"chat.completion.chunk\",\"choices\":[{\"index\":0,\"delta\":{\"role\":\"assistant\",\"content\":\"Hel\"}}]}\n\n",
    "data: {\"id\":\"chatcmpl-mock\",\"object\":\"chat.completion.chunk\",\"choices\":[{\"index\":0,\"delta\":{\"content\":\"lo\"},\"finish_reason\":\"stop\"}]}\n\n",
    "data: [DONE]\n\n",
];

/// Chunks sent for a streamed Anthropic response
pub const ANTHROPIC_STREAM: &[&str] = &[
    "event: message_start\ndata: {\"type\":\"message_start\",\"message\":{\"id\":\"msg_mock\"}}\n\n",
    "event: content_block_delta\ndata: {\"type\":\"content_block_delta\",\"index\":0,\"delta\":{\"type\":\"text_delta\",\"text\":\"Hello\"}}\n\n",
    "event: message_stop\ndata: {\"type\":\"message_stop\"}\n\n",
];

/// Chunks sent for a streamed Google response
pub const GOOGLE_STREAM: &[&str] = &[
    "data: {\"candidates\":[{\"content\":{\"role\":\"model\",\"parts\":[{\"text\":\"Hel\"}]}}]}\r\n\r\n",
    "data: {\"candidates\":[{\"content\":{\"role\":\"model\",\"parts\":[{\"text\":\"lo\"}]},\"finishReason\":\"STOP\"}]}\r\n\r\n",
];

/// How the mock answers
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Canned success responses
    Normal,
    /// Fixed status and JSON body for every request
    Status(StatusCode, Value),
    /// `200` with a body that is not JSON
    InvalidJson,
    /// Wait before answering normally
    Delay(Duration),
}

/// A request as seen by the mock
#[derive(Debug, Clone)]
pub struct Recorded {
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Value,
}

struct MockState {
    behavior: MockBehavior,
    counts: [AtomicU32; 4],
    requests: Mutex<Vec<Recorded>>,
}

/// Mock upstream provider server
pub struct MockUpstream {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

impl MockUpstream {
    /// Start a mock that answers every provider successfully
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_with(MockBehavior::Normal).await
    }

    /// Start a mock with the given behavior
    pub async fn start_with(behavior: MockBehavior) -> anyhow::Result<Self> {
        let state = Arc::new(MockState {
            behavior,
            counts: Default::default(),
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/openai/v1/chat/completions", routing::post(handle_openai))
            .route("/xai/v1/chat/completions", routing::post(handle_xai))
            .route("/anthropic/v1/messages", routing::post(handle_anthropic))
            .route("/google/v1beta/models/{action}", routing::post(handle_google))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL to configure for a provider
    pub fn base_url(&self, kind: ProviderKind) -> String {
        let suffix = match kind {
            ProviderKind::Google => "v1beta",
            _ => "v1",
        };
        format!("http://{}/{kind}/{suffix}", self.addr)
    }

    /// Requests received for one provider
    pub fn count(&self, kind: ProviderKind) -> u32 {
        self.state.counts[slot(kind)].load(Ordering::Relaxed)
    }

    /// Requests received across all providers
    pub fn total(&self) -> u32 {
        ProviderKind::ALL.into_iter().map(|kind| self.count(kind)).sum()
    }

    /// Most recent request received
    pub fn last_request(&self) -> Option<Recorded> {
        self.state.requests.lock().ok()?.last().cloned()
    }
}

impl Drop for MockUpstream {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

const fn slot(kind: ProviderKind) -> usize {
    match kind {
        ProviderKind::Openai => 0,
        ProviderKind::Anthropic => 1,
        ProviderKind::Google => 2,
        ProviderKind::Xai => 3,
    }
}

type Shared = State<Arc<MockState>>;

async fn handle_openai(State(state): Shared, query: RawQuery, headers: HeaderMap, body: Bytes) -> Response {
    handle(&state, ProviderKind::Openai, "/openai/v1/chat/completions".to_owned(), query, headers, body).await
}

async fn handle_xai(State(state): Shared, query: RawQuery, headers: HeaderMap, body: Bytes) -> Response {
    handle(&state, ProviderKind::Xai, "/xai/v1/chat/completions".to_owned(), query, headers, body).await
}

async fn handle_anthropic(State(state): Shared, query: RawQuery, headers: HeaderMap, body: Bytes) -> Response {
    handle(&state, ProviderKind::Anthropic, "/anthropic/v1/messages".to_owned(), query, headers, body).await
}

async fn handle_google(
    State(state): Shared,
    Path(action): Path<String>,
    query: RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = format!("/google/v1beta/models/{action}");
    handle(&state, ProviderKind::Google, path, query, headers, body).await
}

async fn handle(
    state: &MockState,
    kind: ProviderKind,
    path: String,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    state.counts[slot(kind)].fetch_add(1, Ordering::Relaxed);
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    let streaming = match kind {
        ProviderKind::Google => path.ends_with(":streamGenerateContent"),
        _ => body["stream"] == Value::Bool(true),
    };
    let model = body["model"].as_str().unwrap_or("unknown").to_owned();

    state.requests.lock().expect("mock lock").push(Recorded {
        path: path.clone(),
        query,
        headers,
        body,
    });

    match &state.behavior {
        MockBehavior::Status(status, error) => return (*status, axum::Json(error.clone())).into_response(),
        MockBehavior::InvalidJson => {
            return ([(header::CONTENT_TYPE, "application/json")], "this is not json").into_response();
        }
        MockBehavior::Delay(delay) => tokio::time::sleep(*delay).await,
        MockBehavior::Normal => {}
    }

    if streaming {
        return stream_response(kind);
    }

    let response = match kind {
        ProviderKind::Openai | ProviderKind::Xai => json!({
            "id": "chatcmpl-mock",
            "object": "chat.completion",
            "created": 1_700_000_000,
            "model": model,
            "system_fingerprint": "fp_mock",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": format!("Hello from {kind}")},
                "logprobs": null,
                "finish_reason": "stop"
            }],
            "usage": {
                "prompt_tokens": 9,
                "completion_tokens": 3,
                "total_tokens": 12,
                "prompt_tokens_details": {"cached_tokens": 2}
            }
        }),
        ProviderKind::Anthropic => json!({
            "id": "msg_mock",
            "type": "message",
            "role": "assistant",
            "model": "claude-3-5-sonnet-20241022",
            "content": [{"type": "text", "text": "Hello from anthropic"}],
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 11, "output_tokens": 4}
        }),
        ProviderKind::Google => json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Hello from google"}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 5, "candidatesTokenCount": 3}
        }),
    };

    axum::Json(response).into_response()
}

/// Stream the canned chunks one by one
fn stream_response(kind: ProviderKind) -> Response {
    let chunks = match kind {
        ProviderKind::Openai | ProviderKind::Xai => OPENAI_STREAM,
        ProviderKind::Anthropic => ANTHROPIC_STREAM,
        ProviderKind::Google => GOOGLE_STREAM,
    };

    let stream = futures::stream::iter(
        chunks
            .iter()
            .copied()
            .map(|chunk| Ok::<_, std::io::Error>(Bytes::from_static(chunk.as_bytes()))),
    );

    (
        [(header::CONTENT_TYPE, "text/event-stream; charset=utf-8")],
        Body::from_stream(stream),
    )
        .into_response()
}
