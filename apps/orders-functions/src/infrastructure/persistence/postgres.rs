//! Postgres store adapter.
//!
//! The remote managed store. The login comes from the resolved
//! [`StoreCredentials`]; anonymous credentials leave the endpoint's own
//! user and password untouched.

use sqlx::Postgres;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgQueryResult};

use super::query::SqlDriver;
use super::sql_text::PlaceholderStyle;
use crate::application::ports::StoreError;
use crate::infrastructure::auth::StoreCredentials;
use crate::infrastructure::config::ConnectionSettings;

/// `orders` table definition.
pub const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS orders (\
     id BIGSERIAL PRIMARY KEY, \
     name TEXT NOT NULL, \
     created_at TIMESTAMPTZ NOT NULL)";

/// Connection options for `endpoint`/`database` with `credentials` applied.
pub fn connect_options(
    endpoint: &str,
    database: &str,
    credentials: &StoreCredentials,
) -> Result<PgConnectOptions, StoreError> {
    let mut options: PgConnectOptions = endpoint.parse().map_err(StoreError::connection)?;
    options = options.database(database);
    if let Some(user) = credentials.user() {
        options = options.username(user);
    }
    if let Some(secret) = credentials.secret() {
        options = options.password(secret);
    }
    Ok(options)
}

/// Open a pool with `options`.
pub async fn open_pool(
    options: PgConnectOptions,
    settings: &ConnectionSettings,
) -> Result<PgPool, StoreError> {
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.ready_timeout)
        .connect_with(options)
        .await
        .map_err(StoreError::connection)
}

/// Create the `orders` table if it does not exist.
pub async fn migrate(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::query(SCHEMA)
        .execute(pool)
        .await
        .map_err(StoreError::query)?;
    Ok(())
}

impl SqlDriver for Postgres {
    const PLACEHOLDERS: PlaceholderStyle = PlaceholderStyle::Dollar;

    fn rows_affected(result: &PgQueryResult) -> u64 {
        result.rows_affected()
    }
}
