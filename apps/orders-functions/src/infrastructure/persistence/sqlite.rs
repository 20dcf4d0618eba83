//! SQLite store adapter.
//!
//! Local development and tests. Ids come from an `AUTOINCREMENT` key, so
//! they start at one and are never reused.

use std::path::Path;

use sqlx::Sqlite;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteQueryResult};

use super::query::SqlDriver;
use super::sql_text::PlaceholderStyle;
use crate::application::ports::StoreError;
use crate::infrastructure::config::ConnectionSettings;

/// `orders` table definition.
pub const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS orders (\
     id INTEGER PRIMARY KEY AUTOINCREMENT, \
     name TEXT NOT NULL, \
     created_at TIMESTAMP NOT NULL)";

/// Open a pool on the database file at `path`, creating it when missing.
pub async fn open_pool(
    path: &Path,
    settings: &ConnectionSettings,
) -> Result<SqlitePool, StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(StoreError::connection)?;
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .busy_timeout(settings.ready_timeout);

    SqlitePoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.ready_timeout)
        .connect_with(options)
        .await
        .map_err(StoreError::connection)
}

/// Create the `orders` table if it does not exist.
pub async fn migrate(pool: &SqlitePool) -> Result<(), StoreError> {
    sqlx::query(SCHEMA)
        .execute(pool)
        .await
        .map_err(StoreError::query)?;
    Ok(())
}

impl SqlDriver for Sqlite {
    const PLACEHOLDERS: PlaceholderStyle = PlaceholderStyle::Question;

    fn rows_affected(result: &SqliteQueryResult) -> u64 {
        result.rows_affected()
    }
}
