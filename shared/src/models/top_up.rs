//! Facility Top-up Model

use serde::{Deserialize, Serialize};

use super::Record;

/// 公设储值纪录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TopUpRecord {
    pub id: String,
    /// YYYY-MM-DD
    pub date: String,
    pub points: i64,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl TopUpRecord {
    pub fn new(id: impl Into<String>, date: impl Into<String>, points: i64, amount: f64) -> Self {
        Self {
            id: id.into(),
            date: date.into(),
            points,
            amount,
            note: None,
        }
    }
}

impl Record for TopUpRecord {
    fn id(&self) -> &str {
        &self.id
    }
}
