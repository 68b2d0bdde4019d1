//! Secret-fetcher workflow: materialize Service-Principal secrets as files.

use std::path::PathBuf;

use keyvault_client::SecretStore;
use secrecy::ExposeSecret;
use tokio::fs;
use tracing::{info, instrument};

use crate::config::SecretsConfig;
use crate::error::ProvisionError;

/// Fetch each configured secret and write it to `<output_dir>/<name>`.
///
/// Values are trimmed of surrounding whitespace and files are overwritten
/// on every run. The first retrieval or write failure aborts the whole
/// run; there is no partial-success accounting and nothing is retried.
///
/// # Errors
///
/// Returns the first retrieval or filesystem error encountered.
#[instrument(skip(config, store), fields(vault = %config.vault_name))]
pub async fn fetch_secrets<S>(
    config: &SecretsConfig,
    store: &S,
) -> Result<Vec<PathBuf>, ProvisionError>
where
    S: SecretStore,
    ProvisionError: From<S::Error>,
{
    fs::create_dir_all(&config.output_dir).await.map_err(|e| {
        ProvisionError::io(
            format!("failed to create {}", config.output_dir.display()),
            e,
        )
    })?;

    let mut written = Vec::with_capacity(config.secret_names.len());
    for name in &config.secret_names {
        let bundle = store.get_secret(name).await?;
        let value = bundle.value.expose_secret().trim();

        let path = config.output_dir.join(name);
        fs::write(&path, value)
            .await
            .map_err(|e| ProvisionError::io(format!("failed to write {}", path.display()), e))?;

        info!(secret = %name, path = %path.display(), "secret saved");
        written.push(path);
    }

    info!(count = written.len(), "all secrets retrieved and saved");
    Ok(written)
}
