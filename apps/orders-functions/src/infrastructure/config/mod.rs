//! Configuration Module
//!
//! Settings read once at start-up and injected into the store adapter,
//! telemetry and the local server.

mod settings;

pub use settings::{
    Backend, ConfigError, ConnectionSettings, CredentialSource, DEFAULT_DATABASE_USER,
    DEFAULT_METADATA_URL, DEFAULT_SQLITE_PATH, DatabaseSettings, LocalSettings, LogFormat,
    TelemetrySettings,
};
