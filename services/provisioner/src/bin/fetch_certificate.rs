//! Retrieve the PFX certificate from Azure Key Vault using the
//! Service-Principal credentials stored in local files, then extract the
//! public certificate and private key in PEM form via openssl.
//!
//! Exits 0 on full success; 1 on the first failure, with the diagnostic
//! logged.

use cert_provisioner::ProvisionError;
use cert_provisioner::certificate::{fetch_certificate, read_service_principal};
use cert_provisioner::config::CertificateConfig;
use cert_provisioner::pkcs12::OpensslSplitter;
use keyvault_client::{ClientSecretCredential, KeyVaultConfig, SecretClient};
use rust_common::{TracingConfig, init_tracing};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    init_tracing(&TracingConfig::default());

    if let Err(e) = run().await {
        error!(error = %e, "certificate materialization failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), ProvisionError> {
    let config = CertificateConfig::from_env()?;

    let sp = read_service_principal(&config.secrets_dir).await?;
    info!(tenant = %sp.tenant_id, "service principal loaded");

    let credential = ClientSecretCredential::new(
        sp.tenant_id.clone(),
        sp.client_id.clone(),
        sp.client_secret.clone(),
    )?;
    let vault = KeyVaultConfig::for_vault(&config.vault_name)?;
    let client = SecretClient::new(vault, credential)?;

    let splitter = OpensslSplitter::new(config.openssl_path.clone());
    let outputs = fetch_certificate(&config, &client, &splitter).await?;
    info!(
        pfx = %outputs.pfx.display(),
        cert = %outputs.certificate.display(),
        key = %outputs.private_key.display(),
        "operation completed successfully"
    );
    Ok(())
}
