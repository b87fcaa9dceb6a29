//! Facility Usage Repository

use shared::FacilityUsageRecord;
use sqlx::{SqliteExecutor, SqlitePool};

use super::RepoResult;

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<FacilityUsageRecord>> {
    let records = sqlx::query_as::<_, FacilityUsageRecord>(
        "SELECT id, year, month, gym_count, game_room_count, kitchen_count, av_room_count, \
         k1_space_count FROM facility_usage ORDER BY rowid",
    )
    .fetch_all(pool)
    .await?;
    Ok(records)
}

/// Only the counters change on conflict; `year` / `month` stay as inserted.
pub async fn upsert<'e, E: SqliteExecutor<'e>>(
    executor: E,
    record: &FacilityUsageRecord,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO facility_usage (id, year, month, gym_count, game_room_count, kitchen_count, \
         av_room_count, k1_space_count) VALUES (?, ?, ?, ?, ?, ?, ?, ?) \
         ON CONFLICT(id) DO UPDATE SET \
            gym_count = excluded.gym_count, \
            game_room_count = excluded.game_room_count, \
            kitchen_count = excluded.kitchen_count, \
            av_room_count = excluded.av_room_count, \
            k1_space_count = excluded.k1_space_count",
    )
    .bind(&record.id)
    .bind(record.year)
    .bind(record.month)
    .bind(record.gym_count)
    .bind(record.game_room_count)
    .bind(record.kitchen_count)
    .bind(record.av_room_count)
    .bind(record.k1_space_count)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn delete(pool: &SqlitePool, id: &str) -> RepoResult<()> {
    sqlx::query("DELETE FROM facility_usage WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
