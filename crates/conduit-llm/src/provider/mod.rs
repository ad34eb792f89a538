//! Provider adapters
//!
//! An adapter is the pure half of talking to an upstream: it knows the
//! endpoint, the auth headers and the payload shapes. Sending the request
//! is left to the [`Dispatcher`](crate::Dispatcher).

pub mod anthropic;
pub mod google;
pub mod openai;

use std::sync::Arc;

use conduit_config::ProviderKind;
use http::header::{HeaderMap, HeaderValue};
use http::StatusCode;
use secrecy::SecretString;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::error::LlmError;
use crate::types::{ChatRequest, ChatResponse};

pub use anthropic::AnthropicAdapter;
pub use google::GoogleAdapter;
pub use openai::OpenAiAdapter;

/// Longest upstream error text echoed back to the caller
const MAX_UPSTREAM_MESSAGE_CHARS: usize = 512;

/// Translation rules for one upstream provider
pub trait ProviderAdapter: Send + Sync {
    /// Provider family served by this adapter
    fn kind(&self) -> ProviderKind;

    /// Upstream URL for this request
    ///
    /// Some providers carry the credential in the URL, so it is passed here
    /// as well as to [`headers`](Self::headers).
    fn endpoint(&self, request: &ChatRequest, credential: &SecretString) -> Result<Url, LlmError>;

    /// Authentication and protocol headers
    fn headers(&self, credential: &SecretString) -> Result<HeaderMap, LlmError>;

    /// Translate the canonical request into the upstream payload
    fn build_request(&self, request: &ChatRequest) -> Result<Value, LlmError>;

    /// Translate a successful upstream body into the canonical response
    ///
    /// Missing fields degrade to empty values; a body that carries an
    /// error object is reported as [`LlmError::Upstream`].
    fn parse_response(&self, body: Value, request: &ChatRequest) -> Result<ChatResponse, LlmError>;
}

/// Create the adapter for a provider family
pub fn adapter_for(kind: ProviderKind, base_url: Option<&Url>) -> Result<Arc<dyn ProviderAdapter>, LlmError> {
    Ok(match kind {
        ProviderKind::Openai => Arc::new(OpenAiAdapter::openai(base_url)?),
        ProviderKind::Xai => Arc::new(OpenAiAdapter::xai(base_url)?),
        ProviderKind::Anthropic => Arc::new(AnthropicAdapter::new(base_url)?),
        ProviderKind::Google => Arc::new(GoogleAdapter::new(base_url)?),
    })
}

/// Use the configured base URL or parse the built-in default
fn resolve_base_url(configured: Option<&Url>, default: &str) -> Result<Url, LlmError> {
    match configured {
        Some(url) => Ok(url.clone()),
        None => Url::parse(default).map_err(|e| LlmError::Internal(anyhow::anyhow!("invalid default URL {default}: {e}"))),
    }
}

/// Append a path to a base URL, tolerating a trailing slash on the base
fn join_endpoint(base: &Url, path: &str) -> Result<Url, LlmError> {
    let base = base.as_str().trim_end_matches('/');
    Url::parse(&format!("{base}/{path}")).map_err(|e| LlmError::Forwarding(format!("invalid upstream URL: {e}")))
}

/// Header value that is redacted from debug output
fn secret_header(value: &str) -> Result<HeaderValue, LlmError> {
    let mut header = HeaderValue::from_str(value)
        .map_err(|_| LlmError::Internal(anyhow::anyhow!("credential is not a valid header value")))?;
    header.set_sensitive(true);
    Ok(header)
}

fn to_payload<T: Serialize>(wire: &T) -> Result<Value, LlmError> {
    serde_json::to_value(wire).map_err(|e| LlmError::Forwarding(format!("failed to encode upstream request: {e}")))
}

/// Error message carried in an upstream JSON body, if any
///
/// Covers the `{"error": {"message": ...}}` shape all supported providers
/// use, and a bare `{"error": "..."}`.
pub fn embedded_error(body: &Value) -> Option<String> {
    match body.get("error")? {
        Value::String(message) => Some(message.clone()),
        Value::Object(error) => Some(
            error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown upstream error")
                .to_owned(),
        ),
        _ => None,
    }
}

/// Fail if a successful upstream body actually encodes an error
fn reject_embedded_error(body: &Value) -> Result<(), LlmError> {
    match embedded_error(body) {
        Some(message) => Err(LlmError::Upstream {
            status: StatusCode::BAD_GATEWAY,
            message,
        }),
        None => Ok(()),
    }
}

/// Caller-facing message for a non-2xx upstream response
pub fn upstream_error_message(status: StatusCode, body: &[u8]) -> String {
    if let Ok(value) = serde_json::from_slice::<Value>(body)
        && let Some(message) = embedded_error(&value)
    {
        return message;
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        return format!("upstream returned {status}");
    }
    text.chars().take(MAX_UPSTREAM_MESSAGE_CHARS).collect()
}
