//! Generic secret-read abstraction.

use crate::models::SecretBundle;
use async_trait::async_trait;

/// Read access to named secrets, independent of the backing vault.
///
/// The provisioning workflows are written against this trait so tests can
/// substitute an in-memory store for the real [`crate::SecretClient`].
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Error type surfaced by the store.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch the current value of a named secret.
    async fn get_secret(&self, name: &str) -> Result<SecretBundle, Self::Error>;
}
