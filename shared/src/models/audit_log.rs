//! 审计日志类型定义
//!
//! 所有条目不可变、不可删除，只能通过确认过的变更追加。
//! 日志为容量 [`AUDIT_LOG_CAPACITY`] 的环形缓冲区，超出时按插入顺序淘汰最早的条目。

use serde::{Deserialize, Serialize};

/// 日志最多保留的条目数
pub const AUDIT_LOG_CAPACITY: usize = 500;

/// Module tags used by the dashboard. The field itself is free text.
pub mod modules {
    /// 公電
    pub const ELECTRICITY: &str = "electricity";
    /// 包裹
    pub const PACKAGE: &str = "package";
    /// 公設
    pub const FACILITY: &str = "facility";
    /// 使用者管理
    pub const USER: &str = "user";
}

/// 审计操作类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type), sqlx(rename_all = "UPPERCASE"))]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
}

impl AuditAction {
    pub fn as_str(self) -> &'static str {
        match self {
            AuditAction::Create => "CREATE",
            AuditAction::Update => "UPDATE",
            AuditAction::Delete => "DELETE",
        }
    }

    /// 界面显示用
    pub fn label(self) -> &'static str {
        match self {
            AuditAction::Create => "新增",
            AuditAction::Update => "修改",
            AuditAction::Delete => "刪除",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 审计日志条目（不可变）
///
/// `id` 与 `timestamp` 由存储层在追加时分配，调用方从不提供。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    pub id: String,
    /// 本地时间 `YYYY/MM/DD HH:MM:SS`
    pub timestamp: String,
    pub actor_name: String,
    /// 模块标签（如 "electricity", "package", "facility"）
    pub module: String,
    pub action: AuditAction,
    pub description: String,
    /// 数值变更摘要 e.g. "500 -> 600"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
}

/// 追加请求（不含 id / timestamp）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAuditLog {
    pub actor_name: String,
    pub module: String,
    pub action: AuditAction,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
}

impl NewAuditLog {
    /// Stamp the request with an identifier and timestamp.
    pub fn into_entry(self, id: String, timestamp: String) -> AuditLogEntry {
        AuditLogEntry {
            id,
            timestamp,
            actor_name: self.actor_name,
            module: self.module,
            action: self.action,
            description: self.description,
            diff: self.diff,
        }
    }
}
