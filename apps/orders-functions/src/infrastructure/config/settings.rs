//! Function Configuration Settings
//!
//! Settings for the table store, credentials and logging, read once at
//! process start. Values come from a lookup function so that callers other
//! than [`DatabaseSettings::from_env`] can supply them explicitly.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Default SQLite database file.
pub const DEFAULT_SQLITE_PATH: &str = "./data/orders.db";

/// Default Postgres login role.
pub const DEFAULT_DATABASE_USER: &str = "orders";

/// Default instance metadata token URL.
pub const DEFAULT_METADATA_URL: &str =
    "http://169.254.169.254/computeMetadata/v1/instance/service-accounts/default/token";

/// Where the `orders` table lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    /// Local SQLite file.
    Sqlite {
        /// Database file path.
        path: PathBuf,
    },
    /// Remote Postgres store.
    Postgres {
        /// `postgres://host:port` endpoint.
        endpoint: String,
        /// Database name.
        database: String,
        /// Login role.
        user: String,
    },
}

impl Backend {
    /// Short backend name for logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sqlite { .. } => "sqlite",
            Self::Postgres { .. } => "postgres",
        }
    }

    /// Whether the store is reached over the network.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(self, Self::Postgres { .. })
    }
}

/// How the function authenticates against the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// No credentials.
    Anonymous,
    /// Service-account key file.
    ServiceAccountKey {
        /// Key file path.
        path: PathBuf,
    },
    /// Token from the instance metadata service.
    Metadata {
        /// Token URL.
        url: String,
    },
}

/// Session readiness and pool settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    /// Upper bound on one readiness attempt.
    pub ready_timeout: Duration,
    /// Readiness attempts before giving up.
    pub connect_attempts: u32,
    /// First retry delay.
    pub backoff_initial: Duration,
    /// Largest retry delay.
    pub backoff_max: Duration,
    /// Pool size.
    pub max_connections: u32,
    /// Create the `orders` table when it is missing.
    pub auto_migrate: bool,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            ready_timeout: Duration::from_secs(10),
            connect_attempts: 3,
            backoff_initial: Duration::from_millis(200),
            backoff_max: Duration::from_secs(2),
            max_connections: 4,
            auto_migrate: true,
        }
    }
}

/// Complete store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseSettings {
    /// Store location.
    pub backend: Backend,
    /// Credential source.
    pub credentials: CredentialSource,
    /// Readiness and pool settings.
    pub connection: ConnectionSettings,
}

impl DatabaseSettings {
    /// Settings for a local SQLite file with default connection settings.
    #[must_use]
    pub fn sqlite(path: impl Into<PathBuf>) -> Self {
        Self {
            backend: Backend::Sqlite { path: path.into() },
            credentials: CredentialSource::Anonymous,
            connection: ConnectionSettings::default(),
        }
    }

    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but unusable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but unusable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let endpoint = non_empty(&lookup, "ENDPOINT");
        let database = non_empty(&lookup, "DATABASE");

        let backend = match endpoint {
            None => Backend::Sqlite {
                path: PathBuf::from(database.unwrap_or_else(|| DEFAULT_SQLITE_PATH.to_string())),
            },
            Some(endpoint) if endpoint.starts_with("sqlite:") => {
                let inline = endpoint.trim_start_matches("sqlite:").trim_start_matches("//");
                let path = database
                    .or_else(|| (!inline.is_empty()).then(|| inline.to_string()))
                    .unwrap_or_else(|| DEFAULT_SQLITE_PATH.to_string());
                Backend::Sqlite {
                    path: PathBuf::from(path),
                }
            }
            Some(endpoint)
                if endpoint.starts_with("postgres://") || endpoint.starts_with("postgresql://") =>
            {
                Backend::Postgres {
                    endpoint,
                    database: database.ok_or_else(|| ConfigError::MissingEnvVar("DATABASE".to_string()))?,
                    user: non_empty(&lookup, "DATABASE_USER")
                        .unwrap_or_else(|| DEFAULT_DATABASE_USER.to_string()),
                }
            }
            Some(endpoint) => return Err(ConfigError::UnsupportedEndpoint(endpoint)),
        };

        let credentials = if let Some(path) = non_empty(&lookup, "SA_KEY_FILE") {
            CredentialSource::ServiceAccountKey {
                path: PathBuf::from(path),
            }
        } else if backend.is_remote() {
            CredentialSource::Metadata {
                url: non_empty(&lookup, "METADATA_URL")
                    .unwrap_or_else(|| DEFAULT_METADATA_URL.to_string()),
            }
        } else {
            CredentialSource::Anonymous
        };

        let defaults = ConnectionSettings::default();
        let connection = ConnectionSettings {
            ready_timeout: parse_var(&lookup, "DB_READY_TIMEOUT_MS", defaults.ready_timeout.as_millis())
                .map(duration_millis)?,
            connect_attempts: parse_var(&lookup, "DB_CONNECT_ATTEMPTS", defaults.connect_attempts)?,
            backoff_initial: parse_var(
                &lookup,
                "DB_BACKOFF_INITIAL_MS",
                defaults.backoff_initial.as_millis(),
            )
            .map(duration_millis)?,
            backoff_max: parse_var(&lookup, "DB_BACKOFF_MAX_MS", defaults.backoff_max.as_millis())
                .map(duration_millis)?,
            max_connections: parse_var(&lookup, "DB_MAX_CONNECTIONS", defaults.max_connections)?,
            auto_migrate: parse_bool(&lookup, "DB_AUTO_MIGRATE", !backend.is_remote())?,
        };

        if connection.connect_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                key: "DB_CONNECT_ATTEMPTS".to_string(),
                value: "0".to_string(),
            });
        }
        if connection.max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                key: "DB_MAX_CONNECTIONS".to_string(),
                value: "0".to_string(),
            });
        }

        Ok(Self {
            backend,
            credentials,
            connection,
        })
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Human-readable lines.
    Text,
}

impl LogFormat {
    /// Parse the format name.
    #[must_use]
    pub fn from_str_case_insensitive(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "text" | "pretty" => Some(Self::Text),
            _ => None,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TelemetrySettings {
    /// Output format.
    pub format: LogFormat,
}

impl TelemetrySettings {
    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `LOG_FORMAT` names an unknown format.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if `LOG_FORMAT` names an unknown format.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let format = match non_empty(&lookup, "LOG_FORMAT") {
            None => LogFormat::default(),
            Some(raw) => LogFormat::from_str_case_insensitive(&raw).ok_or(
                ConfigError::InvalidValue {
                    key: "LOG_FORMAT".to_string(),
                    value: raw,
                },
            )?,
        };
        Ok(Self { format })
    }
}

/// Local development server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalSettings {
    /// HTTP listen port.
    pub port: u16,
}

impl Default for LocalSettings {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

impl LocalSettings {
    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `ORDERS_LOCAL_PORT` is not a port number.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if `ORDERS_LOCAL_PORT` is not a port number.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            port: parse_var(&lookup, "ORDERS_LOCAL_PORT", Self::default().port)?,
        })
    }
}

/// Configuration error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Required environment variable is missing.
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    /// Environment variable could not be parsed.
    #[error("environment variable {key} has invalid value '{value}'")]
    InvalidValue {
        /// Variable name.
        key: String,
        /// Raw value.
        value: String,
    },
    /// `ENDPOINT` uses a scheme no backend handles.
    #[error("unsupported ENDPOINT '{0}': expected postgres:// or sqlite:")]
    UnsupportedEndpoint(String),
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    non_empty(lookup, key).map_or(Ok(default), |raw| {
        raw.parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw,
        })
    })
}

fn parse_bool<F>(lookup: &F, key: &str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match non_empty(lookup, key) {
        None => Ok(default),
        Some(raw) => match raw.to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidValue {
                key: key.to_string(),
                value: raw,
            }),
        },
    }
}

fn duration_millis(millis: u128) -> Duration {
    Duration::from_millis(u64::try_from(millis).unwrap_or(u64::MAX))
}
