//! Database Module
//!
//! Handles the SQLite connection pool, migrations and first-run seeding

pub mod repository;
mod seed;

use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};

use crate::utils::AppError;

/// Database service, owns the SQLite connection pool
#[derive(Clone)]
pub struct DbService {
    pub pool: SqlitePool,
}

impl DbService {
    /// Open `database_url`, apply migrations and, on a fresh database, write
    /// the built-in dataset when `seed_defaults` is set.
    pub async fn new(database_url: &str, seed_defaults: bool) -> Result<Self, AppError> {
        let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");

        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::database(format!("Invalid database url: {e}")))?
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(5));

        // 内存库只能有一个连接，且连接不能被回收
        let pool = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await
        } else {
            SqlitePoolOptions::new()
                .max_connections(5)
                .connect_with(
                    options
                        .journal_mode(SqliteJournalMode::Wal)
                        .synchronous(SqliteSynchronous::Normal),
                )
                .await
        }
        .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        tracing::info!(in_memory, "Database connection established");

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");

        if seed_defaults {
            seed::seed_if_fresh(&pool).await?;
        }

        Ok(Self { pool })
    }

    /// In-memory database with the built-in dataset
    pub async fn in_memory() -> Result<Self, AppError> {
        Self::new("sqlite::memory:", true).await
    }
}
