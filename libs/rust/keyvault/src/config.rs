//! Key Vault client configuration.

use crate::error::{KeyVaultError, KeyVaultResult};
use std::time::Duration;
use url::Url;

/// Key Vault REST API version used for secret reads.
pub const API_VERSION: &str = "7.3";

/// Key Vault client configuration.
#[derive(Debug, Clone)]
pub struct KeyVaultConfig {
    /// Base URL of the vault, e.g. `https://my-vault.vault.azure.net`
    pub vault_url: Url,
    /// REST API version appended to every request
    pub api_version: String,
    /// Request timeout
    pub timeout: Duration,
}

impl KeyVaultConfig {
    /// Create a configuration for a vault by name (without scheme or
    /// `.vault.azure.net` suffix).
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the name is empty or contains characters
    /// outside `[A-Za-z0-9-]`.
    pub fn for_vault(name: &str) -> KeyVaultResult<Self> {
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(KeyVaultError::invalid_config(format!(
                "invalid vault name: {name:?}"
            )));
        }
        Self::from_url(&format!("https://{name}.vault.azure.net"))
    }

    /// Create a configuration from a full vault base URL.
    ///
    /// Mainly for tests and sovereign-cloud vault suffixes.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the URL does not parse.
    pub fn from_url(url: &str) -> KeyVaultResult<Self> {
        let vault_url = Url::parse(url).map_err(|e| {
            KeyVaultError::invalid_config(format!("invalid vault URL {url:?}: {e}"))
        })?;
        Ok(Self {
            vault_url,
            api_version: API_VERSION.to_string(),
            timeout: Duration::from_secs(30),
        })
    }

    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// URL for reading the current version of the named secret.
    pub(crate) fn secret_url(&self, name: &str) -> String {
        format!(
            "{}/secrets/{}?api-version={}",
            self.vault_url.as_str().trim_end_matches('/'),
            name,
            self.api_version
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_vault_builds_url() {
        let config = KeyVaultConfig::for_vault("kv-lab-3").unwrap();
        assert_eq!(
            config.vault_url.as_str(),
            "https://kv-lab-3.vault.azure.net/"
        );
        assert_eq!(config.api_version, "7.3");
    }

    #[test]
    fn test_for_vault_rejects_bad_names() {
        assert!(KeyVaultConfig::for_vault("").is_err());
        assert!(KeyVaultConfig::for_vault("kv lab").is_err());
        assert!(KeyVaultConfig::for_vault("kv/../lab").is_err());
        assert!(KeyVaultConfig::for_vault("kv.vault.azure.net").is_err());
    }

    #[test]
    fn test_secret_url() {
        let config = KeyVaultConfig::for_vault("kv-lab-3").unwrap();
        assert_eq!(
            config.secret_url("TENANT-ID"),
            "https://kv-lab-3.vault.azure.net/secrets/TENANT-ID?api-version=7.3"
        );
    }

    #[test]
    fn test_with_timeout() {
        let config = KeyVaultConfig::for_vault("kv")
            .unwrap()
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }
}
