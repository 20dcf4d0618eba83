//! SQL session provider.
//!
//! Owns the connection pool for the life of the process. The pool is opened
//! lazily on the first [`SessionProvider::acquire`] under the readiness
//! policy; a failed start leaves the provider empty so the next invocation
//! tries again. Each acquired [`SqlSession`] is one pooled connection,
//! returned to the pool on close.

use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::{PgPool, Postgres, Sqlite, SqlitePool};
use tokio::sync::OnceCell;

use super::readiness::{ReadinessConfig, connect_with_retry};
use super::{postgres, query, sqlite};
use crate::application::ports::{ResultSet, Session, SessionProvider, Statement, StoreError};
use crate::domain::{ColumnSpec, Row};
use crate::infrastructure::auth::CredentialResolver;
use crate::infrastructure::config::{Backend, DEFAULT_DATABASE_USER, DatabaseSettings};

#[derive(Debug, Clone)]
enum SqlPool {
    Sqlite(SqlitePool),
    Postgres(PgPool),
}

impl SqlPool {
    async fn close(&self) {
        match self {
            Self::Sqlite(pool) => pool.close().await,
            Self::Postgres(pool) => pool.close().await,
        }
    }
}

/// Session provider backed by a sqlx pool.
#[derive(Debug)]
pub struct SqlSessionProvider {
    settings: DatabaseSettings,
    resolver: CredentialResolver,
    pool: OnceCell<SqlPool>,
}

impl SqlSessionProvider {
    /// Create a provider. Nothing is opened until the first session is requested.
    #[must_use]
    pub fn new(settings: DatabaseSettings) -> Self {
        let user = match &settings.backend {
            Backend::Postgres { user, .. } => user.clone(),
            Backend::Sqlite { .. } => DEFAULT_DATABASE_USER.to_string(),
        };
        let resolver = CredentialResolver::new(settings.credentials.clone(), user);
        Self {
            settings,
            resolver,
            pool: OnceCell::new(),
        }
    }

    /// Create a provider and wait until the store is ready.
    pub async fn connect(settings: DatabaseSettings) -> Result<Self, StoreError> {
        let provider = Self::new(settings);
        provider.ready().await?;
        Ok(provider)
    }

    /// Settings the provider was built with.
    #[must_use]
    pub const fn settings(&self) -> &DatabaseSettings {
        &self.settings
    }

    /// Whether the pool has been opened.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.pool.initialized()
    }

    /// Open the pool if it is not open yet.
    pub async fn ready(&self) -> Result<(), StoreError> {
        self.pool().await.map(|_| ())
    }

    async fn pool(&self) -> Result<&SqlPool, StoreError> {
        self.pool
            .get_or_try_init(|| async {
                let config = ReadinessConfig::from_connection_settings(&self.settings.connection);
                connect_with_retry(config, || self.open()).await
            })
            .await
    }

    async fn open(&self) -> Result<SqlPool, StoreError> {
        let connection = &self.settings.connection;
        let pool = match &self.settings.backend {
            Backend::Sqlite { path } => {
                let pool = sqlite::open_pool(path, connection).await?;
                if connection.auto_migrate {
                    sqlite::migrate(&pool).await?;
                }
                SqlPool::Sqlite(pool)
            }
            Backend::Postgres {
                endpoint, database, ..
            } => {
                let credentials = self
                    .resolver
                    .resolve()
                    .await
                    .map_err(|e| StoreError::Credentials(e.to_string()))?;
                let options = postgres::connect_options(endpoint, database, &credentials)?;
                let pool = postgres::open_pool(options, connection).await?;
                if connection.auto_migrate {
                    postgres::migrate(&pool).await?;
                }
                SqlPool::Postgres(pool)
            }
        };

        tracing::info!(
            backend = self.settings.backend.as_str(),
            max_connections = connection.max_connections,
            "Store ready"
        );
        Ok(pool)
    }
}

#[async_trait]
impl SessionProvider for SqlSessionProvider {
    type Session = SqlSession;

    async fn acquire(&self) -> Result<Self::Session, StoreError> {
        match self.pool().await? {
            SqlPool::Sqlite(pool) => pool
                .acquire()
                .await
                .map(SqlSession::Sqlite)
                .map_err(StoreError::connection),
            SqlPool::Postgres(pool) => pool
                .acquire()
                .await
                .map(SqlSession::Postgres)
                .map_err(StoreError::connection),
        }
    }

    async fn shutdown(&self) {
        if let Some(pool) = self.pool.get() {
            pool.close().await;
            tracing::info!(backend = self.settings.backend.as_str(), "Store closed");
        }
    }
}

/// One pooled connection.
#[derive(Debug)]
pub enum SqlSession {
    /// SQLite connection.
    Sqlite(PoolConnection<Sqlite>),
    /// Postgres connection.
    Postgres(PoolConnection<Postgres>),
}

#[async_trait]
impl Session for SqlSession {
    async fn execute(&mut self, statement: &Statement) -> Result<ResultSet, StoreError> {
        match self {
            Self::Sqlite(conn) => query::execute::<Sqlite>(&mut **conn, statement).await,
            Self::Postgres(conn) => query::execute::<Postgres>(&mut **conn, statement).await,
        }
    }

    async fn stream_read_table(
        &mut self,
        table: &str,
        columns: &[ColumnSpec],
    ) -> Result<Vec<Row>, StoreError> {
        match self {
            Self::Sqlite(conn) => query::read_table::<Sqlite>(&mut **conn, table, columns).await,
            Self::Postgres(conn) => {
                query::read_table::<Postgres>(&mut **conn, table, columns).await
            }
        }
    }

    async fn close(self) -> Result<(), StoreError> {
        drop(self);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::application::services::with_session;
    use crate::domain::{Order, TypedValue};

    fn settings(dir: &tempfile::TempDir) -> DatabaseSettings {
        DatabaseSettings::sqlite(dir.path().join("orders.db"))
    }

    #[tokio::test]
    async fn opens_lazily() {
        let dir = tempfile::tempdir().unwrap();
        let provider = SqlSessionProvider::new(settings(&dir));
        assert!(!provider.is_ready());

        let session = provider.acquire().await.unwrap();
        session.close().await.unwrap();

        assert!(provider.is_ready());
        assert!(dir.path().join("orders.db").exists());
    }

    #[tokio::test]
    async fn migrated_table_is_readable() {
        let dir = tempfile::tempdir().unwrap();
        let provider = SqlSessionProvider::connect(settings(&dir)).await.unwrap();

        let rows = with_session(&provider, |session| {
            Box::pin(async move { session.stream_read_table("orders", &Order::COLUMNS).await })
        })
        .await
        .unwrap();

        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn missing_table_without_migration() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = settings(&dir);
        settings.connection.auto_migrate = false;
        let provider = SqlSessionProvider::new(settings);

        let result = with_session(&provider, |session| {
            Box::pin(async move {
                session
                    .execute(
                        &Statement::new("DELETE FROM orders WHERE id = $id")
                            .bind("id", TypedValue::uint64(1)),
                    )
                    .await
            })
        })
        .await;

        assert!(matches!(result, Err(StoreError::Query(_))));
    }

    #[tokio::test]
    async fn unreachable_store_is_not_ready() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"").unwrap();

        let mut settings = DatabaseSettings::sqlite(blocker.join("orders.db"));
        settings.connection.connect_attempts = 2;
        settings.connection.backoff_initial = Duration::from_millis(10);
        let provider = SqlSessionProvider::new(settings);

        let err = provider.acquire().await.unwrap_err();
        assert!(matches!(err, StoreError::NotReady { attempts: 2, .. }));
        assert!(!provider.is_ready());
    }

    #[tokio::test]
    async fn shutdown_closes_pool() {
        let dir = tempfile::tempdir().unwrap();
        let provider = SqlSessionProvider::connect(settings(&dir)).await.unwrap();
        provider.shutdown().await;
        assert!(provider.acquire().await.is_err());
    }
}
