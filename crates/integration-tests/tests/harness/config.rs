//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;

use conduit_config::{Config, GatewayAuthConfig, ProviderConfig, ProviderKind};
use secrecy::SecretString;

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with no providers configured
    pub fn new() -> Self {
        let mut config = Config::default();
        config.server.listen_address = Some(SocketAddr::from(([127, 0, 0, 1], 0)));
        Self { config }
    }

    /// Point a provider at a base URL with a test credential
    pub fn with_provider(self, kind: ProviderKind, base_url: &str) -> Self {
        self.with_provider_key(kind, base_url, &format!("{kind}-test-key"))
    }

    /// Point a provider at a base URL with the given credential
    pub fn with_provider_key(mut self, kind: ProviderKind, base_url: &str, api_key: &str) -> Self {
        *self.config.llm.providers.slot_mut(kind) = Some(ProviderConfig {
            api_key: Some(SecretString::from(api_key.to_owned())),
            base_url: Some(base_url.parse().expect("valid URL")),
            prefixes: None,
        });
        self
    }

    /// Configure a provider's base URL but leave it without a credential
    pub fn with_keyless_provider(mut self, kind: ProviderKind, base_url: &str) -> Self {
        *self.config.llm.providers.slot_mut(kind) = Some(ProviderConfig {
            api_key: None,
            base_url: Some(base_url.parse().expect("valid URL")),
            prefixes: None,
        });
        self
    }

    /// Require `Authorization: Bearer <key>` on non-public routes
    pub fn with_gateway_key(mut self, key: &str) -> Self {
        self.config.server.auth = Some(GatewayAuthConfig {
            enabled: true,
            api_key: SecretString::from(key.to_owned()),
            public_paths: Vec::new(),
        });
        self
    }

    /// Override the buffered request timeout
    pub fn with_request_timeout(mut self, timeout: &str) -> Self {
        timeout.clone_into(&mut self.config.llm.request_timeout);
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
