//! Data store connector.
//!
//! Owns the single process-wide SQLite pool backing the `contacts`
//! collection. The pool is opened once at startup and shared by every
//! request through a cloneable [`Database`] handle.

mod contacts;

pub use contacts::ContactRepository;

use crate::config::DatabaseConfig;
use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

static MEMDB_COUNTER: AtomicU64 = AtomicU64::new(0);

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(sqlx::Error),
    #[error("migration error: {0}")]
    Migration(sqlx::migrate::MigrateError),
    #[error("database integrity check failed: {0}")]
    Integrity(String),
    #[error("corrupt contact record: {0}")]
    CorruptRecord(String),
}

/// Database handle with connection pool.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connection acquire timeout - prevents connection storms from blocking indefinitely.
    const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

    /// Maximum time a connection can remain idle before being closed.
    const IDLE_TIMEOUT: Duration = Duration::from_secs(60);

    /// Connect to the store, running migrations and an integrity check.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DbError> {
        let (options, max_connections) = Self::options(config)?;

        if let Some(parent) = options.get_filename().parent()
            && !parent.as_os_str().is_empty()
            && !is_memory_url(&config.url)
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            tracing::warn!(path = %parent.display(), error = %e, "Failed to create database directory");
        }

        let pool = Self::pool_options(config, max_connections)
            .connect_with(options)
            .await?;

        info!(url = %config.url, "Database connected");

        Self::run_migrations(&pool).await?;

        let integrity_result: String = sqlx::query_scalar("PRAGMA integrity_check")
            .fetch_one(&pool)
            .await?;

        if integrity_result != "ok" {
            tracing::error!(
                integrity_check = %integrity_result,
                "Database integrity check FAILED - corruption detected!"
            );
            return Err(DbError::Integrity(integrity_result));
        }

        info!("Database integrity check passed");

        Ok(Self { pool })
    }

    /// Connect at startup without refusing to serve.
    ///
    /// A failed connection is logged and replaced by a lazy pool, so the
    /// process keeps running and store-backed requests fail with 500 until the
    /// store is reachable. With `fail_fast` the error is returned instead.
    /// A store that comes back later is migrated but not integrity-checked.
    pub async fn open(config: &DatabaseConfig) -> Result<Self, DbError> {
        match Self::connect(config).await {
            Ok(db) => {
                info!("Store connected successfully");
                Ok(db)
            }
            Err(e) if config.fail_fast => {
                tracing::error!(url = %config.url, error = %e, "Store connection error");
                Err(e)
            }
            Err(e) => {
                tracing::error!(url = %config.url, error = %e, "Store connection error, continuing without store");
                Self::connect_lazy(config)
            }
        }
    }

    /// Build a pool that only opens connections when a query needs one.
    ///
    /// Used when the startup connection failed: the process keeps serving and
    /// store-backed requests fail individually until the store is reachable.
    /// Every new connection applies pending migrations first, so a store that
    /// appears later starts out with its schema.
    pub fn connect_lazy(config: &DatabaseConfig) -> Result<Self, DbError> {
        let (options, max_connections) = Self::options(config)?;
        let pool = Self::pool_options(config, max_connections)
            .after_connect(|conn, _meta| {
                Box::pin(async move {
                    MIGRATOR
                        .run_direct(conn)
                        .await
                        .map_err(|e| sqlx::Error::Migrate(Box::new(e)))
                })
            })
            .connect_lazy_with(options);
        Ok(Self { pool })
    }

    /// Get reference to the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Get contact repository.
    pub fn contacts(&self) -> ContactRepository<'_> {
        ContactRepository::new(&self.pool)
    }

    fn pool_options(config: &DatabaseConfig, max_connections: u32) -> SqlitePoolOptions {
        let options = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Self::ACQUIRE_TIMEOUT)
            .test_before_acquire(true);

        // An in-memory database lives only as long as its last connection.
        if is_memory_url(&config.url) {
            options.idle_timeout(None).max_lifetime(None)
        } else {
            options.idle_timeout(Some(Self::IDLE_TIMEOUT))
        }
    }

    fn options(config: &DatabaseConfig) -> Result<(SqliteConnectOptions, u32), DbError> {
        if is_memory_url(&config.url) {
            // Each in-memory store gets its own shared-cache name so parallel
            // tests never see each other's rows. One connection keeps it alive.
            let id = MEMDB_COUNTER.fetch_add(1, Ordering::Relaxed);
            let memdb_uri = format!(
                "file:contact-api-memdb-{}-{}?mode=memory&cache=shared",
                std::process::id(),
                id
            );

            let options = SqliteConnectOptions::new()
                .filename(&memdb_uri)
                .shared_cache(true)
                .create_if_missing(true);
            return Ok((options, 1));
        }

        let options = SqliteConnectOptions::from_str(&config.url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);
        Ok((options, config.max_connections.max(1)))
    }

    /// Run embedded migrations.
    async fn run_migrations(pool: &SqlitePool) -> Result<(), DbError> {
        MIGRATOR
            .run(pool)
            .await
            .map_err(DbError::Migration)?;

        info!("Database migrations checked/applied");
        Ok(())
    }
}

/// Whether a database URL names a private in-memory store.
pub fn is_memory_url(url: &str) -> bool {
    matches!(url, ":memory:" | "sqlite::memory:" | "sqlite://:memory:")
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        DbError::Sqlx(err)
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::Migration(err)
    }
}
