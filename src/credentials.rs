//! Loading API keys from the local credentials file.

use crate::models::Credentials;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, instrument, warn};

/// Why the credentials file could not be used.
#[derive(Debug, Error)]
pub enum CredentialsError {
    /// The file does not exist.
    #[error("{} file not found", .0.display())]
    NotFound(PathBuf),
    /// The file exists but could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The file is not valid JSON or lacks a service entry.
    #[error("{} file is not valid JSON: {source}", .path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Read and parse the credentials file at `path`.
///
/// # Errors
///
/// Distinguishes a missing file ([`CredentialsError::NotFound`]) from a file
/// whose content is not the expected JSON ([`CredentialsError::Invalid`]).
#[instrument(level = "info", fields(path = %path.display()))]
pub fn load_credentials(path: &Path) -> Result<Credentials, CredentialsError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!("Credentials file missing");
            return Err(CredentialsError::NotFound(path.to_path_buf()));
        }
        Err(source) => {
            return Err(CredentialsError::Unreadable {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let creds = serde_json::from_str::<Credentials>(&raw).map_err(|source| {
        CredentialsError::Invalid {
            path: path.to_path_buf(),
            source,
        }
    })?;
    info!("Credentials loaded");
    Ok(creds)
}
