//! Package Repository

use shared::PackageRecord;
use sqlx::{SqliteExecutor, SqlitePool};

use super::RepoResult;

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<PackageRecord>> {
    let records = sqlx::query_as::<_, PackageRecord>(
        "SELECT id, year, month, count FROM package_records ORDER BY rowid",
    )
    .fetch_all(pool)
    .await?;
    Ok(records)
}

pub async fn upsert<'e, E: SqliteExecutor<'e>>(executor: E, record: &PackageRecord) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO package_records (id, year, month, count) VALUES (?, ?, ?, ?) \
         ON CONFLICT(id) DO UPDATE SET count = excluded.count",
    )
    .bind(&record.id)
    .bind(record.year)
    .bind(record.month)
    .bind(record.count)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn delete(pool: &SqlitePool, id: &str) -> RepoResult<()> {
    sqlx::query("DELETE FROM package_records WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
