//! Credential providers for bearer-token acquisition.
//!
//! The vault client is agnostic about where its bearer token comes from;
//! anything implementing [`TokenCredential`] will do. Two providers cover
//! the provisioning workflows: [`ManagedIdentityCredential`] for the
//! host's ambient identity, and [`ClientSecretCredential`] for a Service
//! Principal whose secrets were read back from disk.

use async_trait::async_trait;
use rust_common::{HttpConfig, build_http_client};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};

use crate::error::{KeyVaultError, KeyVaultResult};
use crate::models::{ImdsTokenResponse, TokenResponse};

/// OAuth2 scope covering the Key Vault data plane.
pub const VAULT_SCOPE: &str = "https://vault.azure.net/.default";

/// Default Azure Instance Metadata Service endpoint.
pub const DEFAULT_IMDS_ENDPOINT: &str = "http://169.254.169.254";

/// Default AAD authority.
pub const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com";

const IMDS_API_VERSION: &str = "2018-02-01";

/// A bearer token scoped to one audience.
///
/// Held in memory for the duration of one run, never persisted.
pub struct AccessToken {
    token: SecretString,
    /// Token lifetime in seconds, when the issuer reports one
    pub expires_in: Option<u64>,
}

impl AccessToken {
    /// Wrap a raw bearer string.
    #[must_use]
    pub fn new(token: String, expires_in: Option<u64>) -> Self {
        Self {
            token: SecretString::from(token),
            expires_in,
        }
    }

    /// Expose the raw bearer string for an `Authorization` header.
    #[must_use]
    pub fn secret(&self) -> &str {
        self.token.expose_secret()
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"[REDACTED]")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// A capability that yields a bearer token for a target audience.
#[async_trait]
pub trait TokenCredential: Send + Sync {
    /// Obtain a token for the given OAuth2 scope.
    async fn get_token(&self, scope: &str) -> KeyVaultResult<AccessToken>;
}

/// Ambient managed-identity credential, backed by the Azure Instance
/// Metadata Service.
///
/// No secret is embedded anywhere; the platform vouches for the VM and
/// IMDS hands out tokens for the identity selected by `client_id`.
pub struct ManagedIdentityCredential {
    endpoint: String,
    client_id: Option<String>,
    http: reqwest::Client,
}

impl ManagedIdentityCredential {
    /// Credential for a user-assigned identity selected by client id.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(client_id: impl Into<String>) -> KeyVaultResult<Self> {
        Ok(Self {
            endpoint: DEFAULT_IMDS_ENDPOINT.to_string(),
            client_id: Some(client_id.into()),
            http: build_http_client(&HttpConfig::default())?,
        })
    }

    /// Credential for the system-assigned identity of the host.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn system_assigned() -> KeyVaultResult<Self> {
        Ok(Self {
            endpoint: DEFAULT_IMDS_ENDPOINT.to_string(),
            client_id: None,
            http: build_http_client(&HttpConfig::default())?,
        })
    }

    /// Override the IMDS endpoint (tests).
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl TokenCredential for ManagedIdentityCredential {
    #[instrument(skip(self))]
    async fn get_token(&self, scope: &str) -> KeyVaultResult<AccessToken> {
        // IMDS wants the bare resource URI, not an OAuth2 scope.
        let resource = scope.trim_end_matches("/.default").trim_end_matches('/');

        let url = format!("{}/metadata/identity/oauth2/token", self.endpoint);
        let mut request = self
            .http
            .get(&url)
            .header("Metadata", "true")
            .query(&[("api-version", IMDS_API_VERSION), ("resource", resource)]);
        if let Some(client_id) = &self.client_id {
            request = request.query(&[("client_id", client_id.as_str())]);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(KeyVaultError::auth_failed(format!(
                "IMDS token request failed: status {status}: {body}"
            )));
        }

        let token: ImdsTokenResponse = serde_json::from_str(&body)?;
        debug!("obtained managed identity token");
        Ok(AccessToken {
            token: token.access_token,
            expires_in: None,
        })
    }
}

/// Service-Principal credential using the OAuth2 client-credentials grant.
pub struct ClientSecretCredential {
    authority: String,
    tenant_id: String,
    client_id: String,
    client_secret: SecretString,
    http: reqwest::Client,
}

impl ClientSecretCredential {
    /// Credential for the given app registration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<SecretString>,
    ) -> KeyVaultResult<Self> {
        Ok(Self {
            authority: DEFAULT_AUTHORITY.to_string(),
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            http: build_http_client(&HttpConfig::default())?,
        })
    }

    /// Override the AAD authority (tests, sovereign clouds).
    #[must_use]
    pub fn with_authority(mut self, authority: impl Into<String>) -> Self {
        self.authority = authority.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl TokenCredential for ClientSecretCredential {
    #[instrument(skip(self), fields(tenant = %self.tenant_id))]
    async fn get_token(&self, scope: &str) -> KeyVaultResult<AccessToken> {
        let url = format!("{}/{}/oauth2/v2.0/token", self.authority, self.tenant_id);

        let response = self
            .http
            .post(&url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.expose_secret()),
                ("scope", scope),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(KeyVaultError::auth_failed(format!(
                "token request failed: status {status}: {body}"
            )));
        }

        let token: TokenResponse = serde_json::from_str(&body)?;
        debug!("obtained service principal token");
        Ok(AccessToken {
            token: token.access_token,
            expires_in: token.expires_in,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_access_token_debug_redacted() {
        let token = AccessToken::new("very-secret-bearer".to_string(), Some(3599));
        let debug = format!("{token:?}");
        assert!(!debug.contains("very-secret-bearer"));
        assert!(debug.contains("[REDACTED]"));
        assert_eq!(token.secret(), "very-secret-bearer");
    }

    #[tokio::test]
    async fn test_client_secret_token_ok() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/tenant-1/oauth2/v2.0/token"))
            .and(body_string_contains("grant_type=client_credentials"))
            .and(body_string_contains("client_id=app-1"))
            .and(body_string_contains("scope=https%3A%2F%2Fvault.azure.net%2F.default"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "token_type": "Bearer",
                "expires_in": 3599,
                "access_token": "T"
            })))
            .mount(&server)
            .await;

        let credential = ClientSecretCredential::new(
            "tenant-1",
            "app-1",
            SecretString::from("sp-secret".to_string()),
        )
        .unwrap()
        .with_authority(server.uri());

        let token = credential.get_token(VAULT_SCOPE).await.unwrap();
        assert_eq!(token.secret(), "T");
        assert_eq!(token.expires_in, Some(3599));
    }

    #[tokio::test]
    async fn test_client_secret_token_non_success_status() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/tenant-1/oauth2/v2.0/token"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": "invalid_client",
                "error_description": "AADSTS7000215: Invalid client secret provided."
            })))
            .mount(&server)
            .await;

        let credential = ClientSecretCredential::new(
            "tenant-1",
            "app-1",
            SecretString::from("wrong".to_string()),
        )
        .unwrap()
        .with_authority(server.uri());

        let err = credential.get_token(VAULT_SCOPE).await.unwrap_err();
        assert!(matches!(err, KeyVaultError::AuthenticationFailed(_)));
        assert!(err.to_string().contains("401"));
    }

    #[tokio::test]
    async fn test_client_secret_token_missing_field() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/tenant-1/oauth2/v2.0/token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "token_type": "Bearer" })),
            )
            .mount(&server)
            .await;

        let credential = ClientSecretCredential::new(
            "tenant-1",
            "app-1",
            SecretString::from("sp-secret".to_string()),
        )
        .unwrap()
        .with_authority(server.uri());

        let err = credential.get_token(VAULT_SCOPE).await.unwrap_err();
        assert!(matches!(err, KeyVaultError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_managed_identity_token_ok() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/metadata/identity/oauth2/token"))
            .and(header("Metadata", "true"))
            .and(query_param("api-version", "2018-02-01"))
            .and(query_param("resource", "https://vault.azure.net"))
            .and(query_param("client_id", "uami-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "M",
                "expires_on": "1697000000",
                "token_type": "Bearer"
            })))
            .mount(&server)
            .await;

        let credential = ManagedIdentityCredential::new("uami-1")
            .unwrap()
            .with_endpoint(server.uri());

        // The `/.default` suffix must be stripped into a bare resource URI.
        let token = credential.get_token(VAULT_SCOPE).await.unwrap();
        assert_eq!(token.secret(), "M");
    }

    #[tokio::test]
    async fn test_managed_identity_error_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/metadata/identity/oauth2/token"))
            .respond_with(ResponseTemplate::new(400).set_body_string(
                r#"{"error":"invalid_request","error_description":"Identity not found"}"#,
            ))
            .mount(&server)
            .await;

        let credential = ManagedIdentityCredential::new("uami-1")
            .unwrap()
            .with_endpoint(server.uri());

        let err = credential.get_token(VAULT_SCOPE).await.unwrap_err();
        assert!(matches!(err, KeyVaultError::AuthenticationFailed(_)));
        assert!(err.to_string().contains("Identity not found"));
    }
}
