//! Database Module
//!
//! Handles the SQLite connection pool, lazy setup and migrations

pub mod repository;

use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use tokio::sync::OnceCell;

use crate::core::config::DatabaseConfig;
use crate::utils::AppError;
use repository::{RepoError, RepoResult};

/// Database service, owns the SQLite connection pool
///
/// Created once at startup without touching the database. The first
/// operation connects and applies migrations; if that fails the error is
/// reported as [`RepoError::Unavailable`] and the next call tries again.
#[derive(Clone, Debug)]
pub struct DbService {
    pool: SqlitePool,
    ready: Arc<OnceCell<()>>,
}

impl DbService {
    /// Build the (lazy) pool from configuration
    pub fn new(config: &DatabaseConfig) -> Result<Self, AppError> {
        let mut options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|e| AppError::internal(format!("Invalid database url: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            // busy_timeout: 写冲突时等待 5s 而非立即失败
            .busy_timeout(Duration::from_secs(5));

        let mut pool_options = SqlitePoolOptions::new()
            .acquire_timeout(Duration::from_millis(config.acquire_timeout_ms));

        if config.is_in_memory() {
            // 内存库: 单连接且永不回收，否则数据随连接消失
            pool_options = pool_options
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        } else {
            options = options
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .optimize_on_close(true, None);
            pool_options = pool_options.max_connections(config.max_connections.max(1));
        }

        let pool = pool_options.connect_lazy_with(options);

        Ok(Self {
            pool,
            ready: Arc::new(OnceCell::new()),
        })
    }

    /// Pool with migrations applied
    pub async fn pool(&self) -> RepoResult<&SqlitePool> {
        self.ensure_ready().await?;
        Ok(&self.pool)
    }

    /// Connect and migrate once; safe to call repeatedly
    pub async fn ensure_ready(&self) -> RepoResult<()> {
        self.ready
            .get_or_try_init(|| async {
                sqlx::migrate!("./migrations")
                    .run(&self.pool)
                    .await
                    .map_err(|e| {
                        tracing::warn!(error = %e, "Database setup failed, will retry on next request");
                        RepoError::Unavailable(format!("Failed to apply migrations: {e}"))
                    })?;
                tracing::info!("Database connection established, migrations applied");
                Ok::<(), RepoError>(())
            })
            .await
            .map(|_| ())
    }

    /// Round-trip `SELECT 1`, returning its latency
    pub async fn health_check(&self) -> RepoResult<Duration> {
        let start = Instant::now();
        let pool = self.pool().await?;
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(pool)
            .await?;
        Ok(start.elapsed())
    }

    /// Close all connections (graceful shutdown)
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database pool closed");
    }
}
