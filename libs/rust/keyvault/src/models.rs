//! Wire types for the Key Vault and token endpoints.

use secrecy::SecretString;
use serde::Deserialize;

/// Secret read response (`GET /secrets/{name}`).
///
/// The `value` is a plain string for ordinary secrets and a base64 blob
/// for certificate-backed secrets; interpreting it is the caller's job.
#[derive(Debug, Deserialize)]
pub struct SecretBundle {
    /// Secret value
    pub value: SecretString,
    /// Full secret identifier URL
    #[serde(default)]
    pub id: Option<String>,
    /// Secret management attributes
    #[serde(default)]
    pub attributes: Option<SecretAttributes>,
}

/// Secret management attributes.
#[derive(Debug, Clone, Deserialize)]
pub struct SecretAttributes {
    /// Whether the secret is enabled
    #[serde(default)]
    pub enabled: bool,
    /// Creation time, unix seconds
    #[serde(default)]
    pub created: Option<i64>,
    /// Last update time, unix seconds
    #[serde(default)]
    pub updated: Option<i64>,
}

/// AAD token endpoint response (client-credentials grant).
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    /// Token type, `Bearer`
    #[serde(default)]
    pub token_type: Option<String>,
    /// Token lifetime in seconds
    #[serde(default)]
    pub expires_in: Option<u64>,
    /// The bearer token
    pub access_token: SecretString,
}

/// IMDS managed-identity token response.
///
/// IMDS reports `expires_on` as a stringly-typed unix timestamp rather
/// than a lifetime, unlike the AAD endpoint.
#[derive(Debug, Deserialize)]
pub struct ImdsTokenResponse {
    /// The bearer token
    pub access_token: SecretString,
    /// Expiry as unix seconds, a string on the wire
    #[serde(default)]
    pub expires_on: Option<String>,
}

/// Azure error body wrapper: `{"error": {"code": ..., "message": ...}}`.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    /// Error payload
    pub error: ErrorDetail,
}

/// Azure error payload.
#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code, e.g. `SecretNotFound`
    #[serde(default)]
    pub code: Option<String>,
    /// Human-readable message
    #[serde(default)]
    pub message: Option<String>,
}
