use std::fmt;
use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Top-level upstream configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LlmConfig {
    /// Maximum time to establish an upstream connection (e.g. "10s")
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: String,
    /// Maximum time for a whole buffered upstream call
    #[serde(default = "default_request_timeout")]
    pub request_timeout: String,
    /// Maximum gap between two reads of an upstream body
    #[serde(default = "default_read_timeout")]
    pub read_timeout: String,
    /// Per-provider settings
    #[serde(default)]
    pub providers: ProvidersConfig,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            connect_timeout: default_connect_timeout(),
            request_timeout: default_request_timeout(),
            read_timeout: default_read_timeout(),
            providers: ProvidersConfig::default(),
        }
    }
}

/// Parsed upstream timeouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpstreamTimeouts {
    pub connect: Duration,
    pub request: Duration,
    pub read: Duration,
}

impl LlmConfig {
    /// Parse the configured timeout strings
    ///
    /// # Errors
    ///
    /// Returns an error if a value is not a valid duration or is zero
    pub fn timeouts(&self) -> anyhow::Result<UpstreamTimeouts> {
        Ok(UpstreamTimeouts {
            connect: parse_timeout("connect_timeout", &self.connect_timeout)?,
            request: parse_timeout("request_timeout", &self.request_timeout)?,
            read: parse_timeout("read_timeout", &self.read_timeout)?,
        })
    }
}

fn parse_timeout(field: &str, value: &str) -> anyhow::Result<Duration> {
    let duration =
        duration_str::parse(value).map_err(|e| anyhow::anyhow!("invalid llm.{field} '{value}': {e}"))?;
    if duration.is_zero() {
        anyhow::bail!("llm.{field} must be greater than zero");
    }
    Ok(duration)
}

/// Upstream provider families the gateway can translate to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// `OpenAI` chat completions
    Openai,
    /// Anthropic Messages API
    Anthropic,
    /// Google Generative Language API
    Google,
    /// xAI (OpenAI-compatible schema)
    Xai,
}

impl ProviderKind {
    /// Every provider, in routing order
    pub const ALL: [Self; 4] = [Self::Openai, Self::Anthropic, Self::Google, Self::Xai];

    /// Stable lowercase name, also the config table name
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Openai => "openai",
            Self::Anthropic => "anthropic",
            Self::Google => "google",
            Self::Xai => "xai",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings for each provider family
///
/// A missing table leaves the provider routable but without a credential,
/// so requests for its models fail with `api_key_not_configured`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub openai: Option<ProviderConfig>,
    #[serde(default)]
    pub anthropic: Option<ProviderConfig>,
    #[serde(default)]
    pub google: Option<ProviderConfig>,
    #[serde(default)]
    pub xai: Option<ProviderConfig>,
}

impl ProvidersConfig {
    /// Settings for one provider, if configured
    pub const fn get(&self, kind: ProviderKind) -> Option<&ProviderConfig> {
        match kind {
            ProviderKind::Openai => self.openai.as_ref(),
            ProviderKind::Anthropic => self.anthropic.as_ref(),
            ProviderKind::Google => self.google.as_ref(),
            ProviderKind::Xai => self.xai.as_ref(),
        }
    }

    /// Mutable slot for one provider
    pub const fn slot_mut(&mut self, kind: ProviderKind) -> &mut Option<ProviderConfig> {
        match kind {
            ProviderKind::Openai => &mut self.openai,
            ProviderKind::Anthropic => &mut self.anthropic,
            ProviderKind::Google => &mut self.google,
            ProviderKind::Xai => &mut self.xai,
        }
    }
}

/// Configuration for a single provider
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    /// Credential sent upstream
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Base URL override
    #[serde(default)]
    pub base_url: Option<Url>,
    /// Model prefixes routed to this provider, replacing the defaults
    #[serde(default)]
    pub prefixes: Option<Vec<String>>,
}

fn default_connect_timeout() -> String {
    "10s".to_owned()
}

fn default_request_timeout() -> String {
    "120s".to_owned()
}

fn default_read_timeout() -> String {
    "60s".to_owned()
}
