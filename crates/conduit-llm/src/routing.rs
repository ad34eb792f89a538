//! Model-prefix routing
//!
//! A model id is routed by literal prefix. Rules are checked in a fixed
//! provider order (`openai`, `anthropic`, `google`, `xai`) and the first
//! match wins; there is no fallback provider.

use conduit_config::{ProviderKind, ProvidersConfig};

use crate::error::LlmError;

/// Built-in prefixes per provider
pub const fn default_prefixes(kind: ProviderKind) -> &'static [&'static str] {
    match kind {
        ProviderKind::Openai => &["gpt-", "o1-"],
        ProviderKind::Anthropic => &["claude-"],
        ProviderKind::Google => &["gemini-"],
        ProviderKind::Xai => &["grok-"],
    }
}

/// Ordered prefix table mapping model ids to providers
#[derive(Debug, Clone)]
pub struct ModelRouter {
    rules: Vec<(String, ProviderKind)>,
}

impl Default for ModelRouter {
    fn default() -> Self {
        Self::from_config(&ProvidersConfig::default())
    }
}

impl ModelRouter {
    /// Create a router from an explicit, ordered rule list
    pub const fn new(rules: Vec<(String, ProviderKind)>) -> Self {
        Self { rules }
    }

    /// Build the rule table, letting config replace a provider's prefixes
    pub fn from_config(providers: &ProvidersConfig) -> Self {
        let mut rules = Vec::new();

        for kind in ProviderKind::ALL {
            match providers.get(kind).and_then(|p| p.prefixes.as_ref()) {
                Some(custom) => rules.extend(custom.iter().map(|prefix| (prefix.clone(), kind))),
                None => rules.extend(default_prefixes(kind).iter().map(|prefix| ((*prefix).to_owned(), kind))),
            }
        }

        Self { rules }
    }

    /// Resolve the provider for a model id
    ///
    /// Matching is a case-sensitive `starts_with`; a prefix appearing
    /// elsewhere in the id does not count.
    pub fn route(&self, model: &str) -> Result<ProviderKind, LlmError> {
        self.rules
            .iter()
            .find(|(prefix, _)| model.starts_with(prefix.as_str()))
            .map(|(_, kind)| *kind)
            .ok_or_else(|| LlmError::ModelNotSupported {
                model: model.to_owned(),
            })
    }

    /// Rules in match order
    pub fn rules(&self) -> &[(String, ProviderKind)] {
        &self.rules
    }
}
