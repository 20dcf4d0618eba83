//! Store Credentials
//!
//! Resolves the configured [`CredentialSource`] into a login for the store.
//!
//! # Sources
//!
//! - Service-account key file: JSON `{"service_account_id": ..., "secret": ...}`
//! - Instance metadata: `GET <url>` with `Metadata-Flavor: Google`, answering
//!   `{"access_token": ..., "expires_in": ..., "token_type": ...}`
//! - Anonymous: no login (local SQLite)

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use super::config::CredentialSource;

/// Upper bound on one metadata request.
pub const METADATA_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors raised while resolving credentials.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    /// The key file could not be read.
    #[error("failed to read service account key {path}: {message}")]
    KeyFile {
        /// Key file path.
        path: PathBuf,
        /// I/O error text.
        message: String,
    },

    /// The key file is not in the expected format.
    #[error("malformed service account key {path}: {message}")]
    KeyFormat {
        /// Key file path.
        path: PathBuf,
        /// Parse error text.
        message: String,
    },

    /// The metadata service could not be reached or refused the request.
    #[error("metadata token request failed: {0}")]
    Metadata(String),
}

/// A resolved login. Secret material never appears in `Debug` output.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct StoreCredentials {
    user: Option<String>,
    secret: Option<String>,
}

impl StoreCredentials {
    /// No login.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self {
            user: None,
            secret: None,
        }
    }

    /// Login with a user name and secret.
    #[must_use]
    pub const fn new(user: String, secret: String) -> Self {
        Self {
            user: Some(user),
            secret: Some(secret),
        }
    }

    /// Login user, if any.
    #[must_use]
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// Login secret, if any.
    #[must_use]
    pub fn secret(&self) -> Option<&str> {
        self.secret.as_deref()
    }

    /// Whether this carries no login at all.
    #[must_use]
    pub const fn is_anonymous(&self) -> bool {
        self.user.is_none() && self.secret.is_none()
    }
}

impl std::fmt::Debug for StoreCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreCredentials")
            .field("user", &self.user)
            .field("secret", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[derive(Deserialize)]
struct ServiceAccountKey {
    service_account_id: String,
    secret: String,
}

#[derive(Deserialize)]
struct MetadataToken {
    access_token: String,
    #[serde(default)]
    expires_in: u64,
    #[serde(default)]
    token_type: String,
}

/// Resolves credentials from a configured source.
#[derive(Debug, Clone)]
pub struct CredentialResolver {
    source: CredentialSource,
    user: String,
    http: reqwest::Client,
}

impl CredentialResolver {
    /// Create a resolver. `user` is the login role paired with metadata tokens.
    #[must_use]
    pub fn new(source: CredentialSource, user: impl Into<String>) -> Self {
        Self {
            source,
            user: user.into(),
            http: reqwest::Client::new(),
        }
    }

    /// The configured source.
    #[must_use]
    pub const fn source(&self) -> &CredentialSource {
        &self.source
    }

    /// Resolve the login.
    pub async fn resolve(&self) -> Result<StoreCredentials, CredentialError> {
        match &self.source {
            CredentialSource::Anonymous => Ok(StoreCredentials::anonymous()),
            CredentialSource::ServiceAccountKey { path } => read_key_file(path).await,
            CredentialSource::Metadata { url } => self.fetch_metadata_token(url).await,
        }
    }

    async fn fetch_metadata_token(&self, url: &str) -> Result<StoreCredentials, CredentialError> {
        let response = self
            .http
            .get(url)
            .header("Metadata-Flavor", "Google")
            .timeout(METADATA_TIMEOUT)
            .send()
            .await
            .map_err(|e| CredentialError::Metadata(e.to_string()))?
            .error_for_status()
            .map_err(|e| CredentialError::Metadata(e.to_string()))?;

        let token: MetadataToken = response
            .json()
            .await
            .map_err(|e| CredentialError::Metadata(e.to_string()))?;

        tracing::debug!(
            token_type = %token.token_type,
            expires_in = token.expires_in,
            "Metadata token acquired"
        );
        Ok(StoreCredentials::new(self.user.clone(), token.access_token))
    }
}

async fn read_key_file(path: &Path) -> Result<StoreCredentials, CredentialError> {
    let raw = tokio::fs::read(path)
        .await
        .map_err(|e| CredentialError::KeyFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    let key: ServiceAccountKey =
        serde_json::from_slice(&raw).map_err(|e| CredentialError::KeyFormat {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    Ok(StoreCredentials::new(key.service_account_id, key.secret))
}
