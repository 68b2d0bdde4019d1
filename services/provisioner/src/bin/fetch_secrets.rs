//! Retrieve the Service-Principal secrets from Azure Key Vault using the
//! user-assigned managed identity, and save each one to its own file.
//!
//! Exits 0 when every secret was saved; 1 on the first failure, with the
//! diagnostic logged.

use cert_provisioner::ProvisionError;
use cert_provisioner::config::SecretsConfig;
use cert_provisioner::secrets::fetch_secrets;
use keyvault_client::{KeyVaultConfig, ManagedIdentityCredential, SecretClient};
use rust_common::{TracingConfig, init_tracing};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    init_tracing(&TracingConfig::default());

    if let Err(e) = run().await {
        error!(error = %e, "secret retrieval failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), ProvisionError> {
    let config = SecretsConfig::from_env()?;

    let vault = KeyVaultConfig::for_vault(&config.vault_name)?;
    info!(vault = %vault.vault_url, "connecting to Key Vault");

    let credential = ManagedIdentityCredential::new(config.identity_client_id.clone())?;
    let client = SecretClient::new(vault, credential)?;

    fetch_secrets(&config, &client).await?;
    Ok(())
}
