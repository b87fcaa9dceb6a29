//! 统一错误处理
//!
//! [`AppError`] 映射为 HTTP 状态码与 `{ "error": "..." }` 响应体：
//!
//! | 变体 | 状态码 |
//! |------|--------|
//! | Invalid / Validation | 400 |
//! | NotFound | 404 |
//! | Conflict | 409 |
//! | Database / Internal | 500 (细节只写日志) |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use shared::rpc::{ErrorBody, RpcError};
use tracing::error;

use crate::db::repository::RepoError;

/// 应用错误枚举
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== 请求错误 (4xx) ==========
    #[error("{0}")]
    /// 无效请求 (400)，包括未知动作与无法解析的请求体
    Invalid(String),

    #[error("Validation failed: {0}")]
    /// 验证失败 (400)
    Validation(String),

    #[error("{0}")]
    /// 资源不存在 (404)
    NotFound(String),

    #[error("{0}")]
    /// 资源冲突 (409)
    Conflict(String),

    // ========== 系统错误 (5xx) ==========
    #[error("Database error: {0}")]
    /// 数据库错误 (500)
    Database(String),

    #[error("Internal server error: {0}")]
    /// 内部错误 (500)
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Invalid(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                "Database error".to_string()
            }
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<RpcError> for AppError {
    fn from(e: RpcError) -> Self {
        AppError::Invalid(e.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        RepoError::from(e).into()
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(e: sqlx::migrate::MigrateError) -> Self {
        AppError::Database(format!("Failed to apply migrations: {e}"))
    }
}
