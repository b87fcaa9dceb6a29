//! Facility Usage Model

use serde::{Deserialize, Serialize};

use super::{Periodic, Record};

/// 公设使用统计（每月）
///
/// `year` 为民国年。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct FacilityUsageRecord {
    pub id: String,
    pub year: i32,
    pub month: i32,
    /// 健身房
    #[serde(default)]
    pub gym_count: i64,
    /// 兒童遊戲室
    #[serde(default)]
    pub game_room_count: i64,
    /// 廚藝教室
    #[serde(default)]
    pub kitchen_count: i64,
    /// 視聽室
    #[serde(default)]
    pub av_room_count: i64,
    /// K1旁空地
    #[serde(default)]
    pub k1_space_count: i64,
}

/// One of the five counted shared facilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facility {
    Gym,
    GameRoom,
    Kitchen,
    AvRoom,
    K1Space,
}

impl Facility {
    pub const ALL: [Facility; 5] = [
        Facility::Gym,
        Facility::GameRoom,
        Facility::Kitchen,
        Facility::AvRoom,
        Facility::K1Space,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Facility::Gym => "健身房",
            Facility::GameRoom => "兒童遊戲室",
            Facility::Kitchen => "廚藝教室",
            Facility::AvRoom => "視聽室",
            Facility::K1Space => "K1旁空地",
        }
    }

    /// 审计差异用的简称
    pub fn short_label(self) -> &'static str {
        match self {
            Facility::Gym => "健身房",
            Facility::GameRoom => "遊戲室",
            Facility::Kitchen => "廚藝",
            Facility::AvRoom => "視聽室",
            Facility::K1Space => "K1",
        }
    }
}

impl FacilityUsageRecord {
    pub fn new(id: impl Into<String>, year: i32, month: i32) -> Self {
        Self {
            id: id.into(),
            year,
            month,
            gym_count: 0,
            game_room_count: 0,
            kitchen_count: 0,
            av_room_count: 0,
            k1_space_count: 0,
        }
    }

    pub fn count(&self, facility: Facility) -> i64 {
        match facility {
            Facility::Gym => self.gym_count,
            Facility::GameRoom => self.game_room_count,
            Facility::Kitchen => self.kitchen_count,
            Facility::AvRoom => self.av_room_count,
            Facility::K1Space => self.k1_space_count,
        }
    }

    pub fn with_count(mut self, facility: Facility, value: i64) -> Self {
        match facility {
            Facility::Gym => self.gym_count = value,
            Facility::GameRoom => self.game_room_count = value,
            Facility::Kitchen => self.kitchen_count = value,
            Facility::AvRoom => self.av_room_count = value,
            Facility::K1Space => self.k1_space_count = value,
        }
        self
    }

    pub fn total(&self) -> i64 {
        Facility::ALL.iter().map(|f| self.count(*f)).sum()
    }
}

impl Record for FacilityUsageRecord {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Periodic for FacilityUsageRecord {
    fn period(&self) -> (i32, i32) {
        (self.year, self.month)
    }
}
