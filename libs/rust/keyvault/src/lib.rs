//! Azure Key Vault client for the certificate provisioning tools.
//!
//! Provides bearer-authenticated secret reads plus the credential
//! implementations used to obtain the bearer token: IMDS managed identity
//! for the host's ambient identity, and the OAuth2 client-credentials
//! grant for a Service Principal.

pub mod client;
pub mod config;
pub mod credential;
pub mod error;
pub mod models;
pub mod store;

pub use client::SecretClient;
pub use config::KeyVaultConfig;
pub use credential::{
    AccessToken, ClientSecretCredential, ManagedIdentityCredential, TokenCredential, VAULT_SCOPE,
};
pub use error::{KeyVaultError, KeyVaultResult};
pub use models::SecretBundle;
pub use store::SecretStore;
