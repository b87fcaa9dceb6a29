//! Package Delivery Model

use serde::{Deserialize, Serialize};

use super::{Periodic, Record};

/// 每月包裹收件数量（公历年）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PackageRecord {
    pub id: String,
    pub year: i32,
    pub month: i32,
    pub count: i64,
}

impl PackageRecord {
    pub fn new(id: impl Into<String>, year: i32, month: i32, count: i64) -> Self {
        Self {
            id: id.into(),
            year,
            month,
            count,
        }
    }
}

impl Record for PackageRecord {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Periodic for PackageRecord {
    fn period(&self) -> (i32, i32) {
        (self.year, self.month)
    }
}
