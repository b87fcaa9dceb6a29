//! Repository Module
//!
//! 每个表一个模块，提供参数化 SQL 的自由函数。
//! 写入函数接受任意 `SqliteExecutor`，可在连接池或事务中调用。

pub mod audit_log;
pub mod bill;
pub mod facility_usage;
pub mod package;
pub mod top_up;
pub mod user;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => RepoError::NotFound("Row not found".into()),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepoError::Duplicate(db.message().to_string())
            }
            _ => RepoError::Database(err.to_string()),
        }
    }
}

pub type RepoResult<T> = Result<T, RepoError>;
