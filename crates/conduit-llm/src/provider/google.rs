//! Google Generative Language API adapter

use conduit_config::ProviderKind;
use http::header::HeaderMap;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use url::Url;

use super::ProviderAdapter;
use crate::error::LlmError;
use crate::protocol::google::{GoogleRequest, GoogleResponse};
use crate::types::{ChatRequest, ChatResponse};

/// Default Google Generative Language API base URL
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Google adapter; the credential travels as the `key` query parameter
#[derive(Debug, Clone)]
pub struct GoogleAdapter {
    base_url: Url,
}

impl GoogleAdapter {
    pub fn new(base_url: Option<&Url>) -> Result<Self, LlmError> {
        Ok(Self {
            base_url: super::resolve_base_url(base_url, DEFAULT_BASE_URL)?,
        })
    }
}

impl ProviderAdapter for GoogleAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Google
    }

    fn endpoint(&self, request: &ChatRequest, credential: &SecretString) -> Result<Url, LlmError> {
        let method = if request.stream {
            "streamGenerateContent"
        } else {
            "generateContent"
        };
        let mut url = super::join_endpoint(&self.base_url, "models")?;
        // Push encodes the model id as a single segment
        url.path_segments_mut()
            .map_err(|()| LlmError::Forwarding(format!("invalid upstream URL: {}", self.base_url)))?
            .push(&format!("{}:{method}", request.model));

        {
            let mut query = url.query_pairs_mut();
            if request.stream {
                query.append_pair("alt", "sse");
            }
            query.append_pair("key", credential.expose_secret());
        }

        Ok(url)
    }

    fn headers(&self, _credential: &SecretString) -> Result<HeaderMap, LlmError> {
        Ok(HeaderMap::new())
    }

    fn build_request(&self, request: &ChatRequest) -> Result<Value, LlmError> {
        super::to_payload(&GoogleRequest::from(request))
    }

    fn parse_response(&self, body: Value, request: &ChatRequest) -> Result<ChatResponse, LlmError> {
        super::reject_embedded_error(&body)?;

        let wire = serde_json::from_value::<GoogleResponse>(body).unwrap_or_else(|e| {
            tracing::debug!(provider = %self.kind(), error = %e, "unexpected response shape, returning empty completion");
            GoogleResponse::default()
        });
        Ok(wire.into_chat_response(&request.model))
    }
}
