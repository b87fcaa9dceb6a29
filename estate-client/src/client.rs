// estate-client/src/client.rs
// 客户端入口 - 组装存储、会话与变更管线

use std::sync::Arc;

use shared::User;

use crate::actions::Dashboard;
use crate::audit::AuditLogView;
use crate::auth::{self, AuthError};
use crate::config::ClientConfig;
use crate::error::StoreResult;
use crate::pipeline::{ConfirmPrompt, MutationPipeline};
use crate::repository::{Repository, SessionStore};
use crate::session::{PrivilegedView, Session, SessionError};
use crate::users::UserAdmin;

pub struct EstateClient {
    session: Arc<Session>,
    pipeline: Arc<MutationPipeline>,
}

impl EstateClient {
    /// Open the configured backend and restore a persisted session.
    pub fn connect(config: &ClientConfig) -> StoreResult<Self> {
        let (repository, sessions) = config.open_stores()?;
        Self::from_parts(repository, sessions)
    }

    pub fn from_parts(
        repository: Arc<dyn Repository>,
        sessions: Arc<dyn SessionStore>,
    ) -> StoreResult<Self> {
        let session = Arc::new(Session::restore(sessions)?);
        let pipeline = Arc::new(MutationPipeline::new(repository, session.clone()));
        Ok(Self { session, pipeline })
    }

    pub fn repository(&self) -> &Arc<dyn Repository> {
        self.pipeline.repository()
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn pipeline(&self) -> &Arc<MutationPipeline> {
        &self.pipeline
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let user = auth::authenticate(self.repository().as_ref(), username, password).await?;
        self.session.login(&user)?;
        Ok(user.without_password())
    }

    /// Logout goes through the confirmation gate like any mutation.
    pub fn request_logout(&self) -> ConfirmPrompt {
        self.pipeline.request_logout()
    }

    pub fn dashboard(&self) -> Dashboard {
        Dashboard::new(self.pipeline.clone())
    }

    /// Open the user management view (admin only)
    pub fn user_admin(&self) -> Result<UserAdmin, SessionError> {
        self.session.open_view(PrivilegedView::UserManagement)?;
        Ok(UserAdmin::new(self.pipeline.clone()))
    }

    /// Open the audit log view (admin only)
    pub async fn audit_log(&self) -> Result<AuditLogView, SessionError> {
        self.session.open_view(PrivilegedView::AuditLog)?;
        let entries = self
            .repository()
            .list_logs()
            .await
            .map_err(SessionError::from)?;
        Ok(AuditLogView::new(entries))
    }
}
