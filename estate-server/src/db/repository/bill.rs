//! Bill Repository

use shared::Bill;
use sqlx::{SqliteExecutor, SqlitePool};

use super::RepoResult;

const COLUMNS: &str = "id, roc_year, month, usage, amount, billing_period, contract_capacity, \
     max_demand, power_factor, meter_number, current_reading, last_reading, usage_category, \
     payment_deadline, basic_fee, flow_fee, payment_adjustment, others";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Bill>> {
    let bills = sqlx::query_as::<_, Bill>(&format!("SELECT {COLUMNS} FROM bills ORDER BY rowid"))
        .fetch_all(pool)
        .await?;
    Ok(bills)
}

/// Insert or update by id. The natural key (`roc_year`, `month`) is fixed at insert.
pub async fn upsert<'e, E: SqliteExecutor<'e>>(executor: E, bill: &Bill) -> RepoResult<()> {
    sqlx::query(&format!(
        "INSERT INTO bills ({COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
         ON CONFLICT(id) DO UPDATE SET \
            usage = excluded.usage, \
            amount = excluded.amount, \
            billing_period = excluded.billing_period, \
            contract_capacity = excluded.contract_capacity, \
            max_demand = excluded.max_demand, \
            power_factor = excluded.power_factor, \
            meter_number = excluded.meter_number, \
            current_reading = excluded.current_reading, \
            last_reading = excluded.last_reading, \
            usage_category = excluded.usage_category, \
            payment_deadline = excluded.payment_deadline, \
            basic_fee = excluded.basic_fee, \
            flow_fee = excluded.flow_fee, \
            payment_adjustment = excluded.payment_adjustment, \
            others = excluded.others"
    ))
    .bind(&bill.id)
    .bind(bill.roc_year)
    .bind(bill.month)
    .bind(bill.usage)
    .bind(bill.amount)
    .bind(&bill.billing_period)
    .bind(bill.contract_capacity)
    .bind(bill.max_demand)
    .bind(bill.power_factor)
    .bind(&bill.meter_number)
    .bind(bill.current_reading)
    .bind(bill.last_reading)
    .bind(&bill.usage_category)
    .bind(&bill.payment_deadline)
    .bind(bill.basic_fee)
    .bind(bill.flow_fee)
    .bind(bill.payment_adjustment)
    .bind(bill.others)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn delete(pool: &SqlitePool, id: &str) -> RepoResult<()> {
    sqlx::query("DELETE FROM bills WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
