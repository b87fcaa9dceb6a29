//! RPC 协议: 单一端点 `/api?action=<name>` 的动作词汇与请求体
//!
//! ```text
//! POST /api?action=saveBill      body: Bill
//! POST /api?action=deleteBill    body: { "id": "..." }
//! POST /api?action=saveUser      body: { "user": User, "isNew": true }
//! POST /api?action=addAuditLog   body: NewAuditLog  → AuditLogEntry
//! ```
//!
//! 变更类动作返回 `{ "success": true }`，失败返回非 2xx 与 `{ "error": "..." }`。

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::User;

/// Query parameter carrying the action selector
pub const ACTION_PARAM: &str = "action";

/// Path of the single endpoint
pub const ENDPOINT_PATH: &str = "/api";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RpcError {
    #[error("Unknown action: {0}")]
    UnknownAction(String),
}

/// 动作词汇
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RpcAction {
    GetUsers,
    SaveUser,
    DeleteUser,
    GetBills,
    SaveBill,
    DeleteBill,
    GetTopUps,
    SaveTopUp,
    DeleteTopUp,
    GetFacilityUsages,
    SaveFacilityUsage,
    DeleteFacilityUsage,
    GetPackages,
    SavePackage,
    DeletePackage,
    GetAuditLogs,
    AddAuditLog,
}

impl RpcAction {
    pub const ALL: [RpcAction; 17] = [
        RpcAction::GetUsers,
        RpcAction::SaveUser,
        RpcAction::DeleteUser,
        RpcAction::GetBills,
        RpcAction::SaveBill,
        RpcAction::DeleteBill,
        RpcAction::GetTopUps,
        RpcAction::SaveTopUp,
        RpcAction::DeleteTopUp,
        RpcAction::GetFacilityUsages,
        RpcAction::SaveFacilityUsage,
        RpcAction::DeleteFacilityUsage,
        RpcAction::GetPackages,
        RpcAction::SavePackage,
        RpcAction::DeletePackage,
        RpcAction::GetAuditLogs,
        RpcAction::AddAuditLog,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RpcAction::GetUsers => "getUsers",
            RpcAction::SaveUser => "saveUser",
            RpcAction::DeleteUser => "deleteUser",
            RpcAction::GetBills => "getBills",
            RpcAction::SaveBill => "saveBill",
            RpcAction::DeleteBill => "deleteBill",
            RpcAction::GetTopUps => "getTopUps",
            RpcAction::SaveTopUp => "saveTopUp",
            RpcAction::DeleteTopUp => "deleteTopUp",
            RpcAction::GetFacilityUsages => "getFacilityUsages",
            RpcAction::SaveFacilityUsage => "saveFacilityUsage",
            RpcAction::DeleteFacilityUsage => "deleteFacilityUsage",
            RpcAction::GetPackages => "getPackages",
            RpcAction::SavePackage => "savePackage",
            RpcAction::DeletePackage => "deletePackage",
            RpcAction::GetAuditLogs => "getAuditLogs",
            RpcAction::AddAuditLog => "addAuditLog",
        }
    }

    /// Read-only actions carry no body.
    pub fn is_query(self) -> bool {
        matches!(
            self,
            RpcAction::GetUsers
                | RpcAction::GetBills
                | RpcAction::GetTopUps
                | RpcAction::GetFacilityUsages
                | RpcAction::GetPackages
                | RpcAction::GetAuditLogs
        )
    }
}

impl FromStr for RpcAction {
    type Err = RpcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RpcAction::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| RpcError::UnknownAction(s.to_string()))
    }
}

impl std::fmt::Display for RpcAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `saveUser` body; `is_new` distinguishes create from update because the
/// username cannot be used to infer intent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveUserRequest {
    pub user: User,
    pub is_new: bool,
}

/// `deleteUser` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteUserRequest {
    pub username: String,
}

/// `deleteBill` / `deleteTopUp` / `deleteFacilityUsage` / `deletePackage` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteRequest {
    pub id: String,
}

/// Mutation acknowledgement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub const OK: SuccessResponse = SuccessResponse { success: true };
}

/// Error payload returned with a non-2xx status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
