//! Certificate-fetcher workflow: PFX retrieval and PEM materialization.
//!
//! A strict five-step pipeline with no recovery between steps: read the
//! Service-Principal secret files, obtain a bearer token, download the
//! base64-encoded PKCS#12 bundle, persist it, split it into PEM parts.
//! The first failure terminates the run.

use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use keyvault_client::SecretStore;
use secrecy::{ExposeSecret, SecretString};
use tokio::fs;
use tracing::{info, instrument};
use zeroize::Zeroizing;

use crate::config::CertificateConfig;
use crate::error::ProvisionError;
use crate::pkcs12::Pkcs12Splitter;

/// Service-Principal credentials read back from the secrets directory.
#[derive(Debug, Clone)]
pub struct ServicePrincipal {
    /// AAD tenant the app registration lives in
    pub tenant_id: String,
    /// Application (client) id
    pub client_id: String,
    /// Client secret
    pub client_secret: SecretString,
}

/// Paths produced by a successful certificate run.
#[derive(Debug, Clone)]
pub struct CertificateOutputs {
    /// Raw PKCS#12 bundle
    pub pfx: PathBuf,
    /// PEM certificate chain
    pub certificate: PathBuf,
    /// PEM private key (unencrypted)
    pub private_key: PathBuf,
}

/// Read the three Service-Principal secret files.
///
/// Fails with a distinct error per missing file, before any network call
/// is attempted.
///
/// # Errors
///
/// Returns `MissingSecretFile` naming the first absent file, or an I/O
/// error for an unreadable one.
pub async fn read_service_principal(secrets_dir: &Path) -> Result<ServicePrincipal, ProvisionError> {
    let tenant_id = read_secret_file(secrets_dir, "TENANT-ID").await?;
    let client_id = read_secret_file(secrets_dir, "CLIENT-ID").await?;
    let client_secret = read_secret_file(secrets_dir, "CLIENT-SECRET").await?;

    Ok(ServicePrincipal {
        tenant_id,
        client_id,
        client_secret: SecretString::from(client_secret),
    })
}

async fn read_secret_file(dir: &Path, name: &str) -> Result<String, ProvisionError> {
    let path = dir.join(name);

    match fs::metadata(&path).await {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => {
            return Err(ProvisionError::MissingSecretFile {
                name: name.to_string(),
                path,
            });
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ProvisionError::MissingSecretFile {
                name: name.to_string(),
                path,
            });
        }
        Err(e) => {
            return Err(ProvisionError::io(
                format!("failed to stat {}", path.display()),
                e,
            ));
        }
    }

    let value = fs::read_to_string(&path)
        .await
        .map_err(|e| ProvisionError::io(format!("failed to read {}", path.display()), e))?;
    Ok(value.trim().to_string())
}

/// Run the tail of the pipeline against an authenticated `store`:
/// download the certificate secret, persist the decoded PFX, and split it
/// into the PEM pair.
///
/// Reading the Service-Principal files and building the store from them
/// is the caller's job.
///
/// # Errors
///
/// Returns the first vault, decoding, filesystem, or tool error.
#[instrument(skip_all, fields(certificate = %config.certificate_name))]
pub async fn fetch_certificate<S, P>(
    config: &CertificateConfig,
    store: &S,
    splitter: &P,
) -> Result<CertificateOutputs, ProvisionError>
where
    S: SecretStore,
    ProvisionError: From<S::Error>,
    P: Pkcs12Splitter,
{
    let bundle = store.get_secret(&config.certificate_name).await?;
    info!("certificate secret retrieved");

    let pfx = Zeroizing::new(STANDARD.decode(bundle.value.expose_secret().trim())?);

    fs::create_dir_all(&config.output_dir).await.map_err(|e| {
        ProvisionError::io(
            format!("failed to create {}", config.output_dir.display()),
            e,
        )
    })?;

    let outputs = CertificateOutputs {
        pfx: config.pfx_path(),
        certificate: config.cert_path(),
        private_key: config.key_path(),
    };

    fs::write(&outputs.pfx, pfx.as_slice())
        .await
        .map_err(|e| {
            ProvisionError::io(format!("failed to write {}", outputs.pfx.display()), e)
        })?;
    info!(path = %outputs.pfx.display(), "PFX saved");

    splitter
        .split(
            &outputs.pfx,
            &outputs.private_key,
            &outputs.certificate,
            &config.import_password,
        )
        .await?;
    info!(
        key = %outputs.private_key.display(),
        cert = %outputs.certificate.display(),
        "certificate and key extracted"
    );

    Ok(outputs)
}
