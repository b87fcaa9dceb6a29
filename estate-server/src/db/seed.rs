//! First-run seeding
//!
//! `PRAGMA user_version` marks a database that has been seeded, so records
//! deleted later are not brought back on restart.

use shared::seed;
use sqlx::SqlitePool;

use super::repository::{RepoResult, bill, facility_usage, package, top_up, user};

const SEEDED_VERSION: i64 = 1;

pub(super) async fn seed_if_fresh(pool: &SqlitePool) -> RepoResult<()> {
    let version: i64 = sqlx::query_scalar("PRAGMA user_version")
        .fetch_one(pool)
        .await?;
    if version >= SEEDED_VERSION {
        return Ok(());
    }

    let mut tx = pool.begin().await?;
    for u in seed::default_users() {
        user::insert_ignore(&mut *tx, &u).await?;
    }
    for b in seed::default_bills() {
        bill::upsert(&mut *tx, &b).await?;
    }
    for t in seed::default_top_ups() {
        top_up::upsert(&mut *tx, &t).await?;
    }
    for f in seed::default_facility_usages() {
        facility_usage::upsert(&mut *tx, &f).await?;
    }
    for p in seed::default_packages() {
        package::upsert(&mut *tx, &p).await?;
    }
    sqlx::query(&format!("PRAGMA user_version = {SEEDED_VERSION}"))
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    tracing::info!("Default dataset written");
    Ok(())
}
