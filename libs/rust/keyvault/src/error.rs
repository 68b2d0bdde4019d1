//! Key Vault error types.
//!
//! Every error is fatal to the workflow that hits it; there is no
//! retryability classification because nothing here is retried.

use thiserror::Error;

/// Errors surfaced by the Key Vault client and credentials.
#[derive(Error, Debug)]
pub enum KeyVaultError {
    /// Token acquisition against AAD or IMDS failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The vault rejected the bearer token for this secret
    #[error("Permission denied reading secret {0}")]
    PermissionDenied(String),

    /// Secret does not exist in the vault
    #[error("Secret not found: {0}")]
    SecretNotFound(String),

    /// Secret name contains characters the vault would reject
    #[error("Invalid secret name: {0:?}")]
    InvalidSecretName(String),

    /// Vault returned a server-side error
    #[error("Key Vault unavailable: {0}")]
    Unavailable(String),

    /// Vault returned a status outside the documented contract
    #[error("Unexpected Key Vault response: status {status}: {reason}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Reason extracted from the response body
        reason: String,
    },

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Malformed JSON response
    #[error("Malformed response: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for Key Vault operations.
pub type KeyVaultResult<T> = Result<T, KeyVaultError>;

impl KeyVaultError {
    /// Create an authentication failed error.
    #[must_use]
    pub fn auth_failed(msg: impl Into<String>) -> Self {
        Self::AuthenticationFailed(msg.into())
    }

    /// Create a secret not found error.
    #[must_use]
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::SecretNotFound(name.into())
    }

    /// Create an unavailable error.
    #[must_use]
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Whether the error points at credentials rather than the vault.
    #[must_use]
    pub const fn is_auth(&self) -> bool {
        matches!(
            self,
            Self::AuthenticationFailed(_) | Self::PermissionDenied(_)
        )
    }
}
