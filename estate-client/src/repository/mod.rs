//! Repository 抽象
//!
//! 五个记录集合加一个审计日志，统一为 async 接口：
//!
//! - [`LocalStore`]: redb 单表键值槽位，每个槽位存一个 JSON 数组
//! - [`RemoteStore`]: 单端点 RPC 代理 `POST {base}/api?action=<name>`
//!
//! 集合语义：`list` 顺序不保证；`save` 按 id upsert（幂等）；`delete` 对不存在的 id 为空操作。

mod local;
mod remote;

pub use local::{LocalStore, Slot};
pub use remote::RemoteStore;

use async_trait::async_trait;
use shared::{AuditLogEntry, Bill, FacilityUsageRecord, NewAuditLog, PackageRecord, TopUpRecord, User};

use crate::error::StoreResult;

/// Persistence boundary used by the pipeline, auth and user management.
#[async_trait]
pub trait Repository: Send + Sync {
    // ========== Bills ==========

    async fn list_bills(&self) -> StoreResult<Vec<Bill>>;
    async fn save_bill(&self, bill: &Bill) -> StoreResult<()>;
    async fn delete_bill(&self, id: &str) -> StoreResult<()>;

    // ========== Users ==========

    async fn list_users(&self) -> StoreResult<Vec<User>>;
    /// `is_new` on an existing username is a `Conflict`;
    /// updating an absent username is `NotFound`.
    async fn save_user(&self, user: &User, is_new: bool) -> StoreResult<()>;
    async fn delete_user(&self, username: &str) -> StoreResult<()>;

    // ========== Top-ups ==========

    async fn list_top_ups(&self) -> StoreResult<Vec<TopUpRecord>>;
    async fn save_top_up(&self, record: &TopUpRecord) -> StoreResult<()>;
    async fn delete_top_up(&self, id: &str) -> StoreResult<()>;

    // ========== Facility usage ==========

    async fn list_facility_usages(&self) -> StoreResult<Vec<FacilityUsageRecord>>;
    async fn save_facility_usage(&self, record: &FacilityUsageRecord) -> StoreResult<()>;
    async fn delete_facility_usage(&self, id: &str) -> StoreResult<()>;

    // ========== Packages ==========

    async fn list_packages(&self) -> StoreResult<Vec<PackageRecord>>;
    async fn save_package(&self, record: &PackageRecord) -> StoreResult<()>;
    async fn delete_package(&self, id: &str) -> StoreResult<()>;

    // ========== Audit log ==========

    /// Newest first, at most [`shared::AUDIT_LOG_CAPACITY`] entries.
    async fn list_logs(&self) -> StoreResult<Vec<AuditLogEntry>>;

    /// Assign id + timestamp, append, evict beyond capacity, return the stored entry.
    async fn append_log(&self, log: NewAuditLog) -> StoreResult<AuditLogEntry>;
}

/// 会话槽位（持久化当前登录用户，不含密码）
pub trait SessionStore: Send + Sync {
    fn load_session(&self) -> StoreResult<Option<User>>;
    fn store_session(&self, user: &User) -> StoreResult<()>;
    fn clear_session(&self) -> StoreResult<()>;
}
