//! 登录认证
//!
//! 按用户名与明文密码匹配用户列表。仅为提示性质的权限控制。

use shared::User;
use thiserror::Error;

use crate::error::StoreError;
use crate::repository::Repository;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("帳號或密碼錯誤")]
    InvalidCredentials,

    #[error("Authentication backend unavailable: {0}")]
    Unavailable(#[from] StoreError),
}

/// Look up a user by username and password.
pub async fn authenticate(
    repository: &dyn Repository,
    username: &str,
    password: &str,
) -> Result<User, AuthError> {
    let users = repository.list_users().await?;
    match users
        .into_iter()
        .find(|u| u.username == username && u.password == password)
    {
        Some(user) => Ok(user),
        None => {
            tracing::warn!(username = %username, "Login rejected");
            Err(AuthError::InvalidCredentials)
        }
    }
}
