//! Azure Key Vault certificate provisioning workflows.
//!
//! Two sequential workflows composed only by the secrets directory on
//! disk: [`secrets::fetch_secrets`] materializes the Service-Principal
//! secrets, then [`certificate::fetch_certificate`] exchanges them for
//! the PKCS#12 bundle and derives the PEM pair.

pub mod certificate;
pub mod config;
pub mod error;
pub mod pkcs12;
pub mod secrets;

pub use config::{CertificateConfig, SecretsConfig};
pub use error::ProvisionError;
