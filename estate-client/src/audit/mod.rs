//! 审计日志展示与差异计算

pub mod diff;
pub mod viewer;

pub use diff::{FieldChange, create_diff, create_snapshot, render_changes, render_snapshot};
pub use viewer::{ActionTone, AuditLogRow, AuditLogView, ModuleTone};
