//! Top-up Repository

use shared::TopUpRecord;
use sqlx::{SqliteExecutor, SqlitePool};

use super::RepoResult;

/// Newest date first
pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<TopUpRecord>> {
    let records = sqlx::query_as::<_, TopUpRecord>(
        "SELECT id, date, points, amount, note FROM top_up_records ORDER BY date DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(records)
}

pub async fn upsert<'e, E: SqliteExecutor<'e>>(executor: E, record: &TopUpRecord) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO top_up_records (id, date, points, amount, note) VALUES (?, ?, ?, ?, ?) \
         ON CONFLICT(id) DO UPDATE SET \
            date = excluded.date, \
            points = excluded.points, \
            amount = excluded.amount, \
            note = excluded.note",
    )
    .bind(&record.id)
    .bind(&record.date)
    .bind(record.points)
    .bind(record.amount)
    .bind(&record.note)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn delete(pool: &SqlitePool, id: &str) -> RepoResult<()> {
    sqlx::query("DELETE FROM top_up_records WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
