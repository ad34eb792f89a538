//! Axum route handler for the chat completions endpoint

use axum::body::Body;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderValue, header};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use conduit_core::HttpError;

use crate::dispatch::Dispatched;
use crate::error::LlmError;
use crate::relay::RelayStream;
use crate::state::LlmState;
use crate::types::ChatRequest;

/// Content type used when the upstream does not declare one
const DEFAULT_STREAM_CONTENT_TYPE: &str = "text/event-stream";

/// Build the LLM router
pub fn llm_router(state: LlmState) -> Router {
    Router::new()
        .route("/v1/chat/completions", routing::post(chat_completions))
        .with_state(state)
}

/// Handle `POST /v1/chat/completions`
async fn chat_completions(
    State(state): State<LlmState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return error_response(&LlmError::InvalidJson(rejection.body_text())),
    };

    match state.dispatcher().dispatch(&request).await {
        Ok(Dispatched::Complete(response)) => Json(response).into_response(),
        Ok(Dispatched::Stream(relay)) => stream_response(relay),
        Err(e) => error_response(&e),
    }
}

/// Relay the upstream stream with its own content type
fn stream_response(relay: RelayStream) -> Response {
    let content_type = relay
        .content_type()
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_STREAM_CONTENT_TYPE));

    (
        [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, HeaderValue::from_static("no-cache")),
        ],
        Body::from_stream(relay),
    )
        .into_response()
}

/// Render a domain error as the canonical JSON error body
pub fn error_response<E: HttpError>(error: &E) -> Response {
    let status = error.status_code();
    if status.is_server_error() {
        tracing::warn!(status = %status, code = error.code(), error = %error, "request failed");
    } else {
        tracing::debug!(status = %status, code = error.code(), "request rejected");
    }

    (status, Json(error.to_envelope())).into_response()
}
