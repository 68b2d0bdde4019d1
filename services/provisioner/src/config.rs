//! Centralized configuration for the provisioning tools.
//!
//! All configuration is loaded from environment variables and validated
//! at startup. Defaults match the lab deployment layout; everything that
//! used to be a script constant is an explicit, overridable parameter.

use crate::error::ProvisionError;
use std::env;
use std::path::PathBuf;

/// Default directory the Service-Principal secrets are written to and
/// read back from.
pub const DEFAULT_SECRETS_DIR: &str = "/tmp/workingdir/secrets-App-Registration";

/// Default directory the certificate outputs are written to.
pub const DEFAULT_CERT_OUTPUT_DIR: &str = "/tmp/workingdir/cert_output";

/// The three Service-Principal secrets, by their Key Vault names.
pub const SP_SECRET_NAMES: [&str; 3] = ["TENANT-ID", "CLIENT-ID", "CLIENT-SECRET"];

/// Configuration for the secret-fetcher workflow.
#[derive(Debug, Clone)]
pub struct SecretsConfig {
    /// Key Vault to read the Service-Principal secrets from
    pub vault_name: String,
    /// Client id of the user-assigned managed identity
    pub identity_client_id: String,
    /// Secrets to retrieve, written one file per name
    pub secret_names: Vec<String>,
    /// Directory the secret files are written to
    pub output_dir: PathBuf,
}

impl SecretsConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing.
    pub fn from_env() -> Result<Self, ProvisionError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            vault_name: require_env("KEY_VAULT_NAME")?,
            identity_client_id: require_env("IDENTITY_CLIENT_ID")?,
            secret_names: SP_SECRET_NAMES.iter().map(ToString::to_string).collect(),
            output_dir: env::var("SECRETS_DIR")
                .unwrap_or_else(|_| DEFAULT_SECRETS_DIR.to_string())
                .into(),
        })
    }
}

/// Configuration for the certificate-fetcher workflow.
#[derive(Debug, Clone)]
pub struct CertificateConfig {
    /// Directory the Service-Principal secret files are read from
    pub secrets_dir: PathBuf,
    /// Key Vault holding the certificate secret
    pub vault_name: String,
    /// Name of the certificate secret
    pub certificate_name: String,
    /// Directory the PFX and PEM outputs are written to
    pub output_dir: PathBuf,
    /// Path of the external openssl binary
    pub openssl_path: String,
    /// PKCS#12 import password (empty by convention)
    pub import_password: String,
}

impl CertificateConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing.
    pub fn from_env() -> Result<Self, ProvisionError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            secrets_dir: env::var("SECRETS_DIR")
                .unwrap_or_else(|_| DEFAULT_SECRETS_DIR.to_string())
                .into(),
            vault_name: require_env("KEY_VAULT_NAME")?,
            certificate_name: require_env("CERTIFICATE_NAME")?,
            output_dir: env::var("CERT_OUTPUT_DIR")
                .unwrap_or_else(|_| DEFAULT_CERT_OUTPUT_DIR.to_string())
                .into(),
            openssl_path: env::var("OPENSSL_PATH").unwrap_or_else(|_| "openssl".to_string()),
            import_password: env::var("PFX_IMPORT_PASSWORD").unwrap_or_default(),
        })
    }

    /// Path of the persisted PKCS#12 bundle.
    #[must_use]
    pub fn pfx_path(&self) -> PathBuf {
        self.output_dir.join("certificate.pfx")
    }

    /// Path of the extracted PEM certificate.
    #[must_use]
    pub fn cert_path(&self) -> PathBuf {
        self.output_dir.join("certificate.crt")
    }

    /// Path of the extracted PEM private key.
    #[must_use]
    pub fn key_path(&self) -> PathBuf {
        self.output_dir.join("certificate.key")
    }
}

/// Read a required environment variable.
fn require_env(name: &str) -> Result<String, ProvisionError> {
    env::var(name)
        .map_err(|_| ProvisionError::config(format!("missing required configuration: {name}")))
}
