//! 内置默认数据集
//!
//! 本地存储首次读取某个集合、服务端新建数据库时写入这些数据；审计日志默认为空。

use crate::models::{Bill, FacilityUsageRecord, PackageRecord, TopUpRecord, User, UserRole};

/// 社区总户数（每户分摊计算用）
pub const TOTAL_HOUSEHOLDS: u32 = 167;

const METER_NUMBER: &str = "18-33-7005-08-7";

#[allow(clippy::too_many_arguments)]
fn bill(
    id: &str,
    roc_year: i32,
    month: i32,
    usage: f64,
    amount: f64,
    period: &str,
    max_demand: f64,
    power_factor: f64,
    readings: (f64, f64),
    fees: (f64, f64, f64, f64),
) -> Bill {
    Bill {
        billing_period: Some(period.to_string()),
        contract_capacity: Some(50.0),
        max_demand: Some(max_demand),
        power_factor: Some(power_factor),
        meter_number: Some(METER_NUMBER.to_string()),
        current_reading: Some(readings.0),
        last_reading: Some(readings.1),
        usage_category: Some("C5".to_string()),
        basic_fee: fees.0,
        flow_fee: fees.1,
        payment_adjustment: fees.2,
        others: fees.3,
        ..Bill::new(id, roc_year, month, usage, amount)
    }
}

pub fn default_bills() -> Vec<Bill> {
    vec![
        bill("1", 113, 7, 11810.0, 60180.0, "113年06月28日至113年07月29日", 49.0, 100.0, (48920.0, 48500.0), (11810.0, 48370.0, 0.0, 0.0)),
        bill("2", 113, 8, 11040.0, 49041.0, "113年07月29日至113年08月29日", 48.0, 100.0, (49200.0, 48920.0), (11810.0, 37977.6, -746.8, 0.2)),
        bill("3", 113, 9, 11040.0, 49041.0, "113年08月29日至113年09月26日", 48.0, 100.0, (49476.0, 49200.0), (11810.0, 37977.6, -746.8, 0.2)),
        bill("4", 113, 10, 12600.0, 52886.0, "113年09月27日至113年10月29日", 45.0, 100.0, (49791.0, 49476.0), (9079.9, 44611.6, -805.3, -0.2)),
        bill("5", 113, 11, 10120.0, 47107.0, "113年10月30日至113年11月27日", 41.0, 100.0, (50044.0, 49791.0), (8660.0, 39164.4, -717.3, -0.1)),
        bill("6", 113, 12, 10720.0, 49394.0, "113年11月28日至113年12月26日", 40.0, 100.0, (50312.0, 50044.0), (8660.0, 41486.4, -752.1, -0.3)),
        bill("7", 114, 1, 9240.0, 43753.0, "113年12月27日至114年01月22日", 40.0, 100.0, (50543.0, 50312.0), (8660.0, 35758.8, -666.2, 0.4)),
        bill("8", 114, 2, 12080.0, 54579.0, "114年01月23日至114年02月24日", 40.0, 100.0, (50845.0, 50543.0), (8660.0, 46749.6, -831.1, 0.5)),
        bill("9", 114, 3, 10440.0, 48327.0, "114年02月25日至114年03月26日", 42.0, 100.0, (51106.0, 50845.0), (8660.0, 40402.8, -735.9, 0.1)),
        bill("10", 114, 4, 12000.0, 54274.0, "114年03月27日至114年04月27日", 41.0, 100.0, (51406.0, 51106.0), (8660.0, 46440.0, -826.5, 0.5)),
        bill("11", 114, 5, 11880.0, 53816.0, "114年04月28日至114年05月26日", 44.0, 100.0, (51703.0, 51406.0), (8660.0, 45975.6, -819.5, -0.1)),
        bill("12", 114, 6, 12400.0, 60521.0, "114年05月27日至114年06月25日", 46.0, 100.0, (52013.0, 51703.0), (11285.0, 50158.0, -921.6, -0.4)),
        bill("13", 114, 7, 12080.0, 60180.0, "114年06月26日至114年07月27日", 48.0, 100.0, (52315.0, 52013.0), (11810.0, 49286.4, -916.4, 0.0)),
        bill("14", 114, 8, 14040.0, 68057.0, "114年07月28日至114年08月26日", 52.0, 99.0, (52666.0, 52315.0), (11810.0, 57283.2, -1036.3, 0.1)),
        bill("15", 114, 9, 12760.0, 63385.0, "114年08月27日至114年09月25日", 50.0, 99.0, (52985.0, 52666.0), (11810.0, 52060.8, -958.0, 472.2)),
        bill("16", 114, 10, 14720.0, 65621.0, "114年09月26日至114年10月28日", 49.0, 100.0, (53353.0, 52985.0), (9185.0, 57434.7, -999.2, 0.5)),
        bill("17", 114, 11, 10960.0, 50309.0, "114年10月29日至114年11月26日", 43.0, 100.0, (53627.0, 53353.0), (8660.0, 42415.2, -766.1, -0.1)),
    ]
}

pub fn default_users() -> Vec<User> {
    vec![
        User::new("Steven", "Steven", UserRole::Admin, "Kai"),
        User::new("manager", "manager", UserRole::Manager, "物業主任"),
    ]
}

pub fn default_top_ups() -> Vec<TopUpRecord> {
    [
        ("2024-10", 4630),
        ("2024-11", 7945),
        ("2024-12", 7440),
        ("2025-01", 10550),
        ("2025-02", 3090),
        ("2025-03", 3700),
        ("2025-04", 1995),
        ("2025-05", 5610),
        ("2025-06", 1245),
        ("2025-07", 2100),
        ("2025-08", 1780),
        ("2025-09", 5140),
        ("2025-10", 1780),
        ("2025-11", 1990),
    ]
    .into_iter()
    .map(|(month, points)| {
        TopUpRecord::new(month, format!("{month}-01"), points, points as f64)
    })
    .collect()
}

pub fn default_facility_usages() -> Vec<FacilityUsageRecord> {
    // (month, gym, game room, kitchen, av room, k1 space), ROC 114
    [
        (1, 101, 19, 2, 32, 0),
        (2, 120, 25, 1, 10, 0),
        (3, 165, 23, 0, 9, 0),
        (4, 149, 22, 0, 11, 0),
        (5, 175, 26, 0, 14, 0),
        (6, 174, 34, 1, 3, 0),
        (7, 279, 36, 0, 7, 0),
        (8, 275, 28, 1, 9, 0),
        (9, 263, 16, 3, 7, 0),
        (10, 286, 14, 0, 8, 0),
        (11, 292, 12, 0, 7, 0),
    ]
    .into_iter()
    .map(|(month, gym, game, kitchen, av, k1)| FacilityUsageRecord {
        gym_count: gym,
        game_room_count: game,
        kitchen_count: kitchen,
        av_room_count: av,
        k1_space_count: k1,
        ..FacilityUsageRecord::new(month.to_string(), 114, month)
    })
    .collect()
}

pub fn default_packages() -> Vec<PackageRecord> {
    [
        (2024, 5, 27),
        (2024, 6, 120),
        (2024, 7, 167),
        (2024, 8, 283),
        (2024, 9, 371),
        (2024, 10, 462),
        (2024, 11, 645),
        (2024, 12, 661),
        (2025, 1, 704),
        (2025, 2, 516),
        (2025, 3, 618),
        (2025, 4, 601),
        (2025, 5, 589),
        (2025, 6, 664),
        (2025, 7, 721),
        (2025, 8, 669),
        (2025, 9, 692),
        (2025, 10, 680),
        (2025, 11, 815),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (year, month, count))| PackageRecord::new((i + 1).to_string(), year, month, count))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_ids_are_unique() {
        let bills = default_bills();
        let mut ids: Vec<_> = bills.iter().map(|b| b.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), bills.len());
    }

    #[test]
    fn test_seed_bills_reconcile() {
        // 114/09 carries a 472.2 surcharge inside "others"; every bill still adds up
        for bill in default_bills() {
            assert!(bill.is_reconciled(), "bill {} does not reconcile", bill.id);
        }
    }
}
