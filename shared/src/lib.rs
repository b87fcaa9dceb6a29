//! Shared types for the Estate dashboard
//!
//! Record types, audit log entries and the RPC vocabulary used by both
//! `estate-client` and `estate-server`.

pub mod models;
pub mod rpc;
pub mod seed;
pub mod util;

// Re-exports
pub use models::{
    AUDIT_LOG_CAPACITY, AuditAction, AuditLogEntry, Bill, BillSummary, Facility,
    FacilityUsageRecord, NewAuditLog, PackageRecord, Periodic, Record, TopUpRecord, User,
    UserRole, modules,
};
pub use rpc::{RpcAction, RpcError};
pub use serde::{Deserialize, Serialize};
