//! Estate Client - 社区管理面板核心
//!
//! 所有业务记录的增删改都经过 [`MutationPipeline`]：确认 → 写入 → 审计日志。
//! 存储通过 [`Repository`] 抽象，可选本地 redb 或远程 RPC 代理。

pub mod actions;
pub mod audit;
pub mod auth;
pub mod changes;
pub mod client;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod repository;
pub mod session;
pub mod users;
pub mod validation;

pub use actions::{ActionError, ActionResult, Dashboard};
pub use audit::AuditLogView;
pub use auth::{AuthError, authenticate};
pub use client::EstateClient;
pub use config::{Backend, ClientConfig};
pub use error::{StoreError, StoreResult};
pub use pipeline::{
    CommittedMutation, ConfirmGate, ConfirmOutcome, ConfirmPrompt, LogDescriptor, MutationEvent,
    MutationPipeline, PendingChange, PipelineError,
};
pub use repository::{LocalStore, RemoteStore, Repository, SessionStore};
pub use session::{PrivilegedView, Session, SessionError};
pub use users::UserAdmin;
pub use validation::ValidationError;

// Re-export shared types for convenience
pub use shared::{AuditAction, AuditLogEntry, NewAuditLog, User, UserRole};
