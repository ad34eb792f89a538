//! Request dispatch
//!
//! Validates a canonical request, routes it by model prefix, performs
//! exactly one upstream call and translates the outcome. There are no
//! retries and no fallback to another provider.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use conduit_config::{LlmConfig, ProviderKind};
use http::header::CONTENT_TYPE;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

use crate::error::LlmError;
use crate::provider::{self, ProviderAdapter};
use crate::relay::RelayStream;
use crate::routing::ModelRouter;
use crate::types::{ChatRequest, ChatResponse};

/// Outcome of a successful dispatch
pub enum Dispatched {
    /// Buffered response translated to the canonical schema
    Complete(ChatResponse),
    /// Upstream stream to relay unchanged
    Stream(RelayStream),
}

/// Routes canonical requests to upstream providers
pub struct Dispatcher {
    client: Client,
    router: ModelRouter,
    adapters: HashMap<ProviderKind, Arc<dyn ProviderAdapter>>,
    credentials: HashMap<ProviderKind, SecretString>,
    request_timeout: Duration,
}

impl Dispatcher {
    /// Build a dispatcher from upstream configuration
    ///
    /// Providers without an `api_key`, or with an empty one, stay routable;
    /// their requests fail with [`LlmError::ApiKeyNotConfigured`].
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let timeouts = config.timeouts()?;

        let client = Client::builder()
            .connect_timeout(timeouts.connect)
            .read_timeout(timeouts.read)
            .build()
            .map_err(|e| LlmError::Internal(anyhow::anyhow!("failed to build HTTP client: {e}")))?;

        let mut adapters = HashMap::new();
        let mut credentials = HashMap::new();

        for kind in ProviderKind::ALL {
            let provider_config = config.providers.get(kind);
            let base_url = provider_config.and_then(|p| p.base_url.as_ref());
            adapters.insert(kind, provider::adapter_for(kind, base_url)?);

            match provider_config
                .and_then(|p| p.api_key.clone())
                .filter(|key| !key.expose_secret().is_empty())
            {
                Some(key) => {
                    credentials.insert(kind, key);
                }
                None => tracing::debug!(provider = %kind, "no API key configured"),
            }
        }

        let router = ModelRouter::from_config(&config.providers);

        tracing::info!(
            configured = credentials.len(),
            rules = router.rules().len(),
            "LLM dispatcher initialized"
        );

        Ok(Self {
            client,
            router,
            adapters,
            credentials,
            request_timeout: timeouts.request,
        })
    }

    /// Check the request and resolve its adapter and credential
    ///
    /// Performs no I/O. Checks run in a fixed order: model present,
    /// messages present, model routable, credential configured.
    pub fn prepare(&self, request: &ChatRequest) -> Result<(&dyn ProviderAdapter, &SecretString), LlmError> {
        if request.model.is_empty() {
            return Err(LlmError::MissingParameter { param: "model" });
        }
        if request.messages.is_empty() {
            return Err(LlmError::MissingParameter { param: "messages" });
        }

        let kind = self.router.route(&request.model)?;
        let credential = self
            .credentials
            .get(&kind)
            .ok_or(LlmError::ApiKeyNotConfigured { provider: kind })?;
        let adapter = self
            .adapters
            .get(&kind)
            .ok_or_else(|| LlmError::Internal(anyhow::anyhow!("no adapter registered for {kind}")))?;

        Ok((adapter.as_ref(), credential))
    }

    /// Serve one request with a single upstream call
    pub async fn dispatch(&self, request: &ChatRequest) -> Result<Dispatched, LlmError> {
        let (adapter, credential) = self.prepare(request)?;
        let kind = adapter.kind();

        let url = adapter.endpoint(request, credential)?;
        let headers = adapter.headers(credential)?;
        let payload = adapter.build_request(request)?;

        tracing::debug!(provider = %kind, model = %request.model, stream = request.stream, "forwarding request");

        let mut builder = self.client.post(url).headers(headers).json(&payload);
        // Streams are bounded by the read timeout only
        if !request.stream {
            builder = builder.timeout(self.request_timeout);
        }

        let response = builder.send().await.map_err(|e| {
            // The URL may carry a credential
            let e = e.without_url();
            tracing::error!(provider = %kind, error = %e, "upstream request failed");
            LlmError::Forwarding(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            let message = provider::upstream_error_message(status, &body);
            tracing::warn!(provider = %kind, status = %status, error = %message, "upstream returned error");
            return Err(LlmError::Upstream { status, message });
        }

        if request.stream {
            let content_type = response.headers().get(CONTENT_TYPE).cloned();
            return Ok(Dispatched::Stream(RelayStream::new(
                kind,
                content_type,
                response.bytes_stream(),
            )));
        }

        let body = response.bytes().await.map_err(|e| {
            let e = e.without_url();
            tracing::error!(provider = %kind, error = %e, "failed to read upstream response");
            LlmError::Forwarding(e.to_string())
        })?;
        let body: Value = serde_json::from_slice(&body).map_err(|e| {
            tracing::error!(provider = %kind, error = %e, "upstream returned invalid JSON");
            LlmError::Forwarding(format!("invalid JSON from upstream: {e}"))
        })?;

        adapter.parse_response(body, request).map(Dispatched::Complete)
    }
}
