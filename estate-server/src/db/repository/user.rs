//! User Repository
//!
//! `username` 是主键，更新时不可修改。

use shared::User;
use sqlx::{SqliteExecutor, SqlitePool};

use super::{RepoError, RepoResult};

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<User>> {
    let users = sqlx::query_as::<_, User>(
        "SELECT username, password, role, name FROM users ORDER BY rowid",
    )
    .fetch_all(pool)
    .await?;
    Ok(users)
}

pub async fn create(pool: &SqlitePool, user: &User) -> RepoResult<()> {
    sqlx::query("INSERT INTO users (username, password, role, name) VALUES (?, ?, ?, ?)")
        .bind(&user.username)
        .bind(&user.password)
        .bind(user.role)
        .bind(&user.name)
        .execute(pool)
        .await
        .map_err(|e| match RepoError::from(e) {
            RepoError::Duplicate(_) => {
                RepoError::Duplicate(format!("User {} already exists", user.username))
            }
            other => other,
        })?;
    Ok(())
}

pub async fn update(pool: &SqlitePool, user: &User) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE users SET password = ?, role = ?, name = ? WHERE username = ?")
        .bind(&user.password)
        .bind(user.role)
        .bind(&user.name)
        .bind(&user.username)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {} not found", user.username)));
    }
    Ok(())
}

/// Seed helper; an existing username is left untouched.
pub async fn insert_ignore<'e, E: SqliteExecutor<'e>>(executor: E, user: &User) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO users (username, password, role, name) VALUES (?, ?, ?, ?) \
         ON CONFLICT(username) DO NOTHING",
    )
    .bind(&user.username)
    .bind(&user.password)
    .bind(user.role)
    .bind(&user.name)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn delete(pool: &SqlitePool, username: &str) -> RepoResult<()> {
    sqlx::query("DELETE FROM users WHERE username = ?")
        .bind(username)
        .execute(pool)
        .await?;
    Ok(())
}
