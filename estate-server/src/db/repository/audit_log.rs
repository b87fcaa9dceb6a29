//! Audit Log Repository
//!
//! 追加与淘汰在同一事务内完成，表内最多保留 [`AUDIT_LOG_CAPACITY`] 条，按 `seq` 淘汰最早的。

use shared::util::{new_id, now_timestamp};
use shared::{AUDIT_LOG_CAPACITY, AuditLogEntry, NewAuditLog};
use sqlx::SqlitePool;

use super::RepoResult;

/// Newest first
pub async fn find_recent(pool: &SqlitePool) -> RepoResult<Vec<AuditLogEntry>> {
    let entries = sqlx::query_as::<_, AuditLogEntry>(
        r#"SELECT id, timestamp, actor_name, module, "action", description, diff
           FROM audit_logs ORDER BY seq DESC LIMIT ?"#,
    )
    .bind(AUDIT_LOG_CAPACITY as i64)
    .fetch_all(pool)
    .await?;
    Ok(entries)
}

/// Stamp `log` with a fresh id and the current time, store it and evict overflow.
pub async fn append(pool: &SqlitePool, log: NewAuditLog) -> RepoResult<AuditLogEntry> {
    let entry = log.into_entry(new_id(), now_timestamp());

    let mut tx = pool.begin().await?;
    sqlx::query(
        r#"INSERT INTO audit_logs (id, timestamp, actor_name, module, "action", description, diff)
           VALUES (?, ?, ?, ?, ?, ?, ?)"#,
    )
    .bind(&entry.id)
    .bind(&entry.timestamp)
    .bind(&entry.actor_name)
    .bind(&entry.module)
    .bind(entry.action)
    .bind(&entry.description)
    .bind(&entry.diff)
    .execute(&mut *tx)
    .await?;

    let evicted = sqlx::query(
        "DELETE FROM audit_logs WHERE seq NOT IN \
         (SELECT seq FROM audit_logs ORDER BY seq DESC LIMIT ?)",
    )
    .bind(AUDIT_LOG_CAPACITY as i64)
    .execute(&mut *tx)
    .await?
    .rows_affected();
    tx.commit().await?;

    if evicted > 0 {
        tracing::debug!(evicted, "Audit log capacity reached");
    }
    Ok(entry)
}
