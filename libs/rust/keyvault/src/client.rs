//! Key Vault secret-read client.

use async_trait::async_trait;
use rust_common::{HttpConfig, build_http_client};
use tracing::{debug, instrument};

use crate::config::KeyVaultConfig;
use crate::credential::{TokenCredential, VAULT_SCOPE};
use crate::error::{KeyVaultError, KeyVaultResult};
use crate::models::{ErrorResponse, SecretBundle};
use crate::store::SecretStore;

/// Bearer-authenticated Key Vault client for secret reads.
pub struct SecretClient<C: TokenCredential> {
    config: KeyVaultConfig,
    credential: C,
    http: reqwest::Client,
}

/// Whether a secret name would be accepted by the vault.
///
/// Key Vault object names are 1-127 characters from `[A-Za-z0-9-]`.
#[must_use]
pub fn valid_secret_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 127
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

impl<C: TokenCredential> SecretClient<C> {
    /// Create a client for the configured vault.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: KeyVaultConfig, credential: C) -> KeyVaultResult<Self> {
        let http = build_http_client(&HttpConfig::default().with_timeout(config.timeout))?;
        Ok(Self {
            config,
            credential,
            http,
        })
    }

    /// Read the current version of a named secret.
    ///
    /// One token acquisition, one GET; every failure is final.
    ///
    /// # Errors
    ///
    /// See [`KeyVaultError`] for the status-code mapping.
    #[instrument(skip(self))]
    pub async fn get_secret(&self, name: &str) -> KeyVaultResult<SecretBundle> {
        if !valid_secret_name(name) {
            return Err(KeyVaultError::InvalidSecretName(name.to_string()));
        }

        let token = self.credential.get_token(VAULT_SCOPE).await?;
        let url = self.config.secret_url(name);

        debug!(name, "reading secret");
        let response = self
            .http
            .get(&url)
            .bearer_auth(token.secret())
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        match status.as_u16() {
            200 => {
                let body = response.text().await?;
                Ok(serde_json::from_str(&body)?)
            }
            401 => {
                let text = response.text().await.unwrap_or_default();
                Err(KeyVaultError::auth_failed(format!(
                    "vault rejected the bearer token: {}",
                    azure_error_reason(&text)
                )))
            }
            403 => Err(KeyVaultError::PermissionDenied(name.to_string())),
            404 => Err(KeyVaultError::not_found(name)),
            s if s >= 500 => {
                let text = response.text().await.unwrap_or_default();
                Err(KeyVaultError::unavailable(format!(
                    "status {status}: {}",
                    azure_error_reason(&text)
                )))
            }
            other => {
                let text = response.text().await.unwrap_or_default();
                Err(KeyVaultError::UnexpectedStatus {
                    status: other,
                    reason: azure_error_reason(&text),
                })
            }
        }
    }
}

/// Pull the code and message out of an Azure error body, falling back to
/// the raw text.
fn azure_error_reason(body: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(parsed) => {
            let code = parsed.error.code.unwrap_or_default();
            let message = parsed.error.message.unwrap_or_default();
            match (code.is_empty(), message.is_empty()) {
                (false, false) => format!("{code}: {message}"),
                (false, true) => code,
                (true, false) => message,
                (true, true) => body.to_string(),
            }
        }
        Err(_) => body.to_string(),
    }
}

#[async_trait]
impl<C: TokenCredential> SecretStore for SecretClient<C> {
    type Error = KeyVaultError;

    async fn get_secret(&self, name: &str) -> KeyVaultResult<SecretBundle> {
        Self::get_secret(self, name).await
    }
}
