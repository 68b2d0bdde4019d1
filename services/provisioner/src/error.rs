//! Error types for the provisioning workflows.
//!
//! Every variant is fatal: the binaries report it and exit 1. Nothing is
//! retried or downgraded to a warning.

use crate::pkcs12::Pkcs12Error;
use keyvault_client::KeyVaultError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors aborting a provisioning run.
#[derive(Error, Debug)]
pub enum ProvisionError {
    /// A Service-Principal secret file is absent from the secrets directory
    #[error("Missing secret file for {name}: {}", path.display())]
    MissingSecretFile {
        /// Secret name the file is named after
        name: String,
        /// Path that was expected to exist
        path: PathBuf,
    },

    /// Key Vault or token endpoint failure
    #[error(transparent)]
    KeyVault(#[from] KeyVaultError),

    /// Certificate secret was not valid base64
    #[error("Certificate secret is not valid base64: {0}")]
    InvalidCertificate(#[from] base64::DecodeError),

    /// External PKCS#12 tool failure
    #[error(transparent)]
    Pkcs12(#[from] Pkcs12Error),

    /// Filesystem failure
    #[error("{context}: {source}")]
    Io {
        /// What was being read or written
        context: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ProvisionError {
    /// Create a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an I/O error with context.
    #[must_use]
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}
