//! Anthropic Messages API adapter

use conduit_config::ProviderKind;
use http::header::{HeaderMap, HeaderName, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use url::Url;

use super::ProviderAdapter;
use crate::error::LlmError;
use crate::protocol::anthropic::{AnthropicRequest, AnthropicResponse};
use crate::types::{ChatRequest, ChatResponse};

/// Default Anthropic API base URL
const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";

/// Anthropic API version header value
const ANTHROPIC_VERSION: &str = "2023-06-01";

static X_API_KEY: HeaderName = HeaderName::from_static("x-api-key");
static ANTHROPIC_VERSION_HEADER: HeaderName = HeaderName::from_static("anthropic-version");

/// Anthropic Messages API adapter
#[derive(Debug, Clone)]
pub struct AnthropicAdapter {
    base_url: Url,
}

impl AnthropicAdapter {
    pub fn new(base_url: Option<&Url>) -> Result<Self, LlmError> {
        Ok(Self {
            base_url: super::resolve_base_url(base_url, DEFAULT_BASE_URL)?,
        })
    }
}

impl ProviderAdapter for AnthropicAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Anthropic
    }

    fn endpoint(&self, _request: &ChatRequest, _credential: &SecretString) -> Result<Url, LlmError> {
        super::join_endpoint(&self.base_url, "messages")
    }

    fn headers(&self, credential: &SecretString) -> Result<HeaderMap, LlmError> {
        let mut headers = HeaderMap::new();
        headers.insert(X_API_KEY.clone(), super::secret_header(credential.expose_secret())?);
        headers.insert(
            ANTHROPIC_VERSION_HEADER.clone(),
            HeaderValue::from_static(ANTHROPIC_VERSION),
        );
        Ok(headers)
    }

    fn build_request(&self, request: &ChatRequest) -> Result<Value, LlmError> {
        super::to_payload(&AnthropicRequest::from(request))
    }

    fn parse_response(&self, body: Value, request: &ChatRequest) -> Result<ChatResponse, LlmError> {
        super::reject_embedded_error(&body)?;

        let wire = serde_json::from_value::<AnthropicResponse>(body).unwrap_or_else(|e| {
            tracing::debug!(provider = %self.kind(), error = %e, "unexpected response shape, returning empty completion");
            AnthropicResponse::default()
        });
        Ok(wire.into_chat_response(&request.model))
    }
}
