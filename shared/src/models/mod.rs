//! Data models
//!
//! Shared between estate-server and estate-client (via the RPC endpoint).
//! JSON uses camelCase field names; DB row types use
//! `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]` with snake_case columns.
//! All record IDs are opaque strings minted by the caller.

pub mod audit_log;
pub mod bill;
pub mod facility_usage;
pub mod package;
pub mod top_up;
pub mod user;

// Re-exports
pub use audit_log::*;
pub use bill::*;
pub use facility_usage::*;
pub use package::*;
pub use top_up::*;
pub use user::*;

/// A record stored in one of the keyed collections.
///
/// `id()` is the identity used by save/delete; updates never match by content.
pub trait Record: Clone + serde::Serialize + serde::de::DeserializeOwned + Send + Sync {
    fn id(&self) -> &str;
}

/// Records carrying a (year, month) natural key.
///
/// Uniqueness of the key is checked by callers before saving; the
/// storage layer accepts duplicates.
pub trait Periodic: Record {
    fn period(&self) -> (i32, i32);
}
