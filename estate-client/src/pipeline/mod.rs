//! 变更管线
//!
//! 每个业务变更都经过同一条路径：
//!
//! ```text
//! request_action ─→ ConfirmGate ─┬─ cancel  → 无写入、无日志
//!                                └─ confirm → Repository 写入
//!                                              → append_log（有当前用户时）
//!                                              → MutationEvent 广播
//! ```
//!
//! 写入失败时不追加日志，错误返回给调用方；日志追加失败只记录 tracing 错误，不回滚写入。

mod gate;

pub use gate::ConfirmGate;

use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use shared::{AuditAction, AuditLogEntry, NewAuditLog};
use thiserror::Error;
use tokio::sync::broadcast;

use crate::error::{StoreError, StoreResult};
use crate::repository::Repository;
use crate::session::Session;

/// Broadcast channel capacity
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Logout confirmation text
pub const LOGOUT_CONFIRM_MESSAGE: &str = "您確定要登出系統嗎?";

/// Deferred persistence write, executed only after confirmation
pub type MutationAction = Box<dyn FnOnce() -> BoxFuture<'static, StoreResult<()>> + Send>;

/// What the audit entry will say about a change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogDescriptor {
    pub module: String,
    pub action: AuditAction,
    pub description: String,
    pub diff: Option<String>,
}

impl LogDescriptor {
    pub fn new(module: impl Into<String>, action: AuditAction, description: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            action,
            description: description.into(),
            diff: None,
        }
    }

    pub fn with_diff(mut self, diff: impl Into<String>) -> Self {
        self.diff = Some(diff.into());
        self
    }

    fn to_log(&self, actor_name: String) -> NewAuditLog {
        NewAuditLog {
            actor_name,
            module: self.module.clone(),
            action: self.action,
            description: self.description.clone(),
            diff: self.diff.clone(),
        }
    }
}

/// Descriptor plus the text shown in the confirmation prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingChange {
    pub descriptor: LogDescriptor,
    pub confirm_message: String,
}

/// What the confirmation prompt is asking about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmPrompt {
    Mutation {
        message: String,
        descriptor: LogDescriptor,
    },
    Logout {
        message: String,
    },
}

impl ConfirmPrompt {
    pub fn message(&self) -> &str {
        match self {
            ConfirmPrompt::Mutation { message, .. } | ConfirmPrompt::Logout { message } => message,
        }
    }
}

enum Pending {
    Mutation {
        action: MutationAction,
        prompt: ConfirmPrompt,
        descriptor: LogDescriptor,
    },
    Logout {
        prompt: ConfirmPrompt,
    },
}

impl Pending {
    fn prompt(&self) -> &ConfirmPrompt {
        match self {
            Pending::Mutation { prompt, .. } | Pending::Logout { prompt } => prompt,
        }
    }
}

/// A write that went through
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommittedMutation {
    pub descriptor: LogDescriptor,
    /// `None` when nobody was logged in or the log append failed
    pub entry: Option<AuditLogEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmOutcome {
    Committed(CommittedMutation),
    LoggedOut,
}

/// Broadcast to subscribers after every committed mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationEvent {
    pub module: String,
    pub action: AuditAction,
    pub entry: Option<AuditLogEntry>,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("No pending confirmation")]
    NothingPending,

    #[error("操作失敗，請稍後再試: {0}")]
    WriteFailed(#[source] StoreError),

    #[error("Logout failed: {0}")]
    Logout(#[source] StoreError),
}

pub struct MutationPipeline {
    repository: Arc<dyn Repository>,
    session: Arc<Session>,
    gate: ConfirmGate<Pending>,
    events: broadcast::Sender<MutationEvent>,
}

impl MutationPipeline {
    pub fn new(repository: Arc<dyn Repository>, session: Arc<Session>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            repository,
            session,
            gate: ConfirmGate::new(),
            events,
        }
    }

    pub fn repository(&self) -> &Arc<dyn Repository> {
        &self.repository
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Show the confirmation prompt for `action`. Nothing runs until [`confirm`](Self::confirm).
    pub fn request_action<F, Fut>(
        &self,
        action: F,
        descriptor: LogDescriptor,
        confirm_message: impl Into<String>,
    ) -> ConfirmPrompt
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = StoreResult<()>> + Send + 'static,
    {
        let action: MutationAction = Box::new(move || action().boxed());
        let prompt = ConfirmPrompt::Mutation {
            message: confirm_message.into(),
            descriptor: descriptor.clone(),
        };
        self.open(Pending::Mutation {
            action,
            prompt: prompt.clone(),
            descriptor,
        });
        prompt
    }

    pub fn request_change<F, Fut>(&self, change: PendingChange, action: F) -> ConfirmPrompt
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = StoreResult<()>> + Send + 'static,
    {
        self.request_action(action, change.descriptor, change.confirm_message)
    }

    pub fn request_logout(&self) -> ConfirmPrompt {
        let prompt = ConfirmPrompt::Logout {
            message: LOGOUT_CONFIRM_MESSAGE.to_string(),
        };
        self.open(Pending::Logout {
            prompt: prompt.clone(),
        });
        prompt
    }

    fn open(&self, pending: Pending) {
        if let Some(replaced) = self.gate.open(pending) {
            tracing::debug!(prompt = replaced.prompt().message(), "Pending confirmation replaced");
        }
    }

    /// The prompt currently shown, if any
    pub fn pending(&self) -> Option<ConfirmPrompt> {
        self.gate.peek(|p| p.prompt().clone())
    }

    pub fn is_pending(&self) -> bool {
        self.gate.is_open()
    }

    /// Dismiss the prompt. No write, no log.
    pub fn cancel(&self) -> bool {
        self.gate.cancel()
    }

    /// Run the pending request. The gate is idle afterwards whatever the result.
    pub async fn confirm(&self) -> Result<ConfirmOutcome, PipelineError> {
        let pending = self.gate.take().ok_or(PipelineError::NothingPending)?;

        match pending {
            Pending::Logout { .. } => {
                self.session.logout().map_err(PipelineError::Logout)?;
                Ok(ConfirmOutcome::LoggedOut)
            }
            Pending::Mutation {
                action, descriptor, ..
            } => {
                if let Err(e) = action().await {
                    tracing::warn!(
                        module = %descriptor.module,
                        action = %descriptor.action,
                        error = %e,
                        "Mutation failed, nothing logged"
                    );
                    return Err(PipelineError::WriteFailed(e));
                }

                let entry = self.append_log(&descriptor).await;
                let _ = self.events.send(MutationEvent {
                    module: descriptor.module.clone(),
                    action: descriptor.action,
                    entry: entry.clone(),
                });

                Ok(ConfirmOutcome::Committed(CommittedMutation { descriptor, entry }))
            }
        }
    }

    async fn append_log(&self, descriptor: &LogDescriptor) -> Option<AuditLogEntry> {
        let Some(actor_name) = self.session.actor_name() else {
            tracing::debug!(module = %descriptor.module, "No actor, audit entry skipped");
            return None;
        };

        match self.repository.append_log(descriptor.to_log(actor_name)).await {
            Ok(entry) => {
                tracing::info!(
                    target: "audit",
                    module = %entry.module,
                    action = %entry.action,
                    actor = %entry.actor_name,
                    "{}",
                    entry.description
                );
                Some(entry)
            }
            Err(e) => {
                tracing::error!(
                    target: "audit",
                    module = %descriptor.module,
                    error = %e,
                    "Failed to append audit log"
                );
                None
            }
        }
    }

    /// Committed mutation notifications
    pub fn subscribe(&self) -> broadcast::Receiver<MutationEvent> {
        self.events.subscribe()
    }
}
