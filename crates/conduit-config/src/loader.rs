use std::path::Path;

use secrecy::ExposeSecret;

use crate::{Config, ProviderKind};

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, expansion or parsing
    /// fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::parse(&raw)
    }

    /// Parse and validate configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing or validation fails
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if timeouts, prefixes or the gateway key are invalid
    pub fn validate(&self) -> anyhow::Result<()> {
        self.llm.timeouts()?;
        self.validate_prefixes()?;
        self.validate_auth_config()?;
        Ok(())
    }

    fn validate_prefixes(&self) -> anyhow::Result<()> {
        for kind in ProviderKind::ALL {
            let Some(prefixes) = self.llm.providers.get(kind).and_then(|p| p.prefixes.as_ref()) else {
                continue;
            };

            if prefixes.is_empty() {
                anyhow::bail!("llm.providers.{kind}.prefixes must not be empty when set");
            }
            if prefixes.iter().any(String::is_empty) {
                anyhow::bail!("llm.providers.{kind}.prefixes must not contain an empty prefix");
            }
        }

        Ok(())
    }

    fn validate_auth_config(&self) -> anyhow::Result<()> {
        let Some(ref auth) = self.server.auth else {
            return Ok(());
        };

        if auth.enabled && auth.api_key.expose_secret().is_empty() {
            anyhow::bail!("server.auth.api_key must not be empty when auth is enabled");
        }

        Ok(())
    }
}
