//! PKCS#12 splitting via the external `openssl` tool.
//!
//! The bundle is split into a PEM private key and a PEM certificate by
//! two `openssl pkcs12` invocations, the same commands an operator would
//! run by hand. The [`Pkcs12Splitter`] trait keeps the workflows
//! independent of the tool.

use async_trait::async_trait;
use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

/// Error from the external PKCS#12 tool.
#[derive(Debug, Error)]
pub enum Pkcs12Error {
    /// Tool missing or not executable
    #[error("failed to run {tool}: {source}")]
    ExecFailed {
        /// Binary that was invoked
        tool: String,
        /// Underlying spawn error
        #[source]
        source: std::io::Error,
    },

    /// Tool ran and exited non-zero
    #[error("{tool} {status}: {stderr}")]
    CommandFailed {
        /// Binary that was invoked
        tool: String,
        /// Exit status as reported by the OS
        status: String,
        /// First non-empty stderr line
        stderr: String,
    },
}

/// Split a PKCS#12 bundle into a PEM certificate / private key pair.
#[async_trait]
pub trait Pkcs12Splitter: Send + Sync {
    /// Extract the unencrypted private key into `key_out` and the
    /// certificate chain into `cert_out` from the bundle at `pfx`.
    async fn split(
        &self,
        pfx: &Path,
        key_out: &Path,
        cert_out: &Path,
        password: &str,
    ) -> Result<(), Pkcs12Error>;
}

/// Splitter that shells out to `openssl pkcs12`.
#[derive(Debug, Clone)]
pub struct OpensslSplitter {
    openssl_path: String,
}

impl OpensslSplitter {
    /// Create a splitter using the given `openssl` binary.
    #[must_use]
    pub fn new(openssl_path: impl Into<String>) -> Self {
        Self {
            openssl_path: openssl_path.into(),
        }
    }

    async fn run(&self, args: &[&OsStr]) -> Result<(), Pkcs12Error> {
        debug!(tool = %self.openssl_path, ?args, "running pkcs12 extraction");

        let output = Command::new(&self.openssl_path)
            .args(args)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| Pkcs12Error::ExecFailed {
                tool: self.openssl_path.clone(),
                source,
            })?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let first_line = stderr
            .lines()
            .find(|l| !l.is_empty())
            .unwrap_or("unknown error")
            .to_owned();
        Err(Pkcs12Error::CommandFailed {
            tool: self.openssl_path.clone(),
            status: output.status.to_string(),
            stderr: first_line,
        })
    }
}

fn key_extraction_args(pfx: &Path, key_out: &Path, pass: &str) -> Vec<OsString> {
    vec![
        "pkcs12".into(),
        "-in".into(),
        pfx.into(),
        "-nocerts".into(),
        "-nodes".into(),
        "-out".into(),
        key_out.into(),
        "-passin".into(),
        pass.into(),
    ]
}

fn cert_extraction_args(pfx: &Path, cert_out: &Path, pass: &str) -> Vec<OsString> {
    vec![
        "pkcs12".into(),
        "-in".into(),
        pfx.into(),
        "-clcerts".into(),
        "-nokeys".into(),
        "-out".into(),
        cert_out.into(),
        "-passin".into(),
        pass.into(),
    ]
}

#[async_trait]
impl Pkcs12Splitter for OpensslSplitter {
    async fn split(
        &self,
        pfx: &Path,
        key_out: &Path,
        cert_out: &Path,
        password: &str,
    ) -> Result<(), Pkcs12Error> {
        let pass = format!("pass:{password}");

        // Private key first, then the certificate chain, matching the
        // documented operator commands.
        let key_args = key_extraction_args(pfx, key_out, &pass);
        self.run(&key_args.iter().map(OsString::as_os_str).collect::<Vec<_>>())
            .await?;

        let cert_args = cert_extraction_args(pfx, cert_out, &pass);
        self.run(&cert_args.iter().map(OsString::as_os_str).collect::<Vec<_>>())
            .await
    }
}
