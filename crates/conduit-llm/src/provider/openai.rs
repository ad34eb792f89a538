//! `OpenAI`-compatible adapter, used for `OpenAI` and xAI
//!
//! The canonical schema is the `OpenAI` schema, so requests and responses
//! pass through unchanged.

use conduit_config::ProviderKind;
use http::header::{AUTHORIZATION, HeaderMap};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use url::Url;

use super::ProviderAdapter;
use crate::error::LlmError;
use crate::types::{ChatRequest, ChatResponse, Usage};

/// Default `OpenAI` API base URL
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Default xAI API base URL
const XAI_BASE_URL: &str = "https://api.x.ai/v1";

/// Adapter for upstreams that accept the canonical schema as-is
#[derive(Debug, Clone)]
pub struct OpenAiAdapter {
    kind: ProviderKind,
    base_url: Url,
}

impl OpenAiAdapter {
    /// Adapter for `OpenAI`
    pub fn openai(base_url: Option<&Url>) -> Result<Self, LlmError> {
        Ok(Self {
            kind: ProviderKind::Openai,
            base_url: super::resolve_base_url(base_url, OPENAI_BASE_URL)?,
        })
    }

    /// Adapter for xAI, which speaks the `OpenAI` schema
    pub fn xai(base_url: Option<&Url>) -> Result<Self, LlmError> {
        Ok(Self {
            kind: ProviderKind::Xai,
            base_url: super::resolve_base_url(base_url, XAI_BASE_URL)?,
        })
    }
}

impl ProviderAdapter for OpenAiAdapter {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn endpoint(&self, _request: &ChatRequest, _credential: &SecretString) -> Result<Url, LlmError> {
        super::join_endpoint(&self.base_url, "chat/completions")
    }

    fn headers(&self, credential: &SecretString) -> Result<HeaderMap, LlmError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            super::secret_header(&format!("Bearer {}", credential.expose_secret()))?,
        );
        Ok(headers)
    }

    fn build_request(&self, request: &ChatRequest) -> Result<Value, LlmError> {
        super::to_payload(request)
    }

    fn parse_response(&self, body: Value, request: &ChatRequest) -> Result<ChatResponse, LlmError> {
        super::reject_embedded_error(&body)?;

        let mut response = serde_json::from_value::<ChatResponse>(body).unwrap_or_else(|e| {
            tracing::debug!(provider = %self.kind, error = %e, "unexpected response shape, returning empty completion");
            ChatResponse::single(&request.model, "", "", Usage::default())
        });
        if response.model.is_empty() {
            response.model.clone_from(&request.model);
        }
        Ok(response)
    }
}
