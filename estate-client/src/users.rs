//! 使用者管理（仅管理员）
//!
//! - 用户名为主键，创建后不可修改
//! - 新建时用户名不可重复
//! - 不可删除当前登录的自己
//! - 编辑自己时同步更新会话

use std::sync::Arc;

use shared::User;

use crate::actions::{ActionError, ActionResult};
use crate::changes;
use crate::pipeline::{ConfirmPrompt, MutationPipeline};
use crate::validation::{self, ValidationError};

#[derive(Clone)]
pub struct UserAdmin {
    pipeline: Arc<MutationPipeline>,
}

impl UserAdmin {
    pub fn new(pipeline: Arc<MutationPipeline>) -> Self {
        Self { pipeline }
    }

    fn ensure_admin(&self) -> ActionResult<()> {
        if self.pipeline.session().is_admin() {
            Ok(())
        } else {
            Err(ActionError::Forbidden)
        }
    }

    pub async fn list(&self) -> ActionResult<Vec<User>> {
        self.ensure_admin()?;
        Ok(self.pipeline.repository().list_users().await?)
    }

    pub async fn create(&self, user: User) -> ActionResult<ConfirmPrompt> {
        self.ensure_admin()?;
        validation::validate_user(&user)?;
        let users = self.pipeline.repository().list_users().await?;
        if users.iter().any(|u| u.username == user.username) {
            return Err(ValidationError::DuplicateUsername(user.username).into());
        }

        let change = changes::user_create(&user);
        let repo = self.pipeline.repository().clone();
        Ok(self.pipeline.request_change(change, move || async move {
            repo.save_user(&user, true).await
        }))
    }

    /// Update password, role or display name of `original_username`.
    pub async fn update(&self, original_username: &str, user: User) -> ActionResult<ConfirmPrompt> {
        self.ensure_admin()?;
        if user.username != original_username {
            return Err(ValidationError::UsernameChanged.into());
        }
        validation::validate_user(&user)?;

        let users = self.pipeline.repository().list_users().await?;
        let before = users
            .iter()
            .find(|u| u.username == user.username)
            .ok_or_else(|| ActionError::NotFound(user.username.clone()))?;

        let change = changes::user_update(before, &user);
        let repo = self.pipeline.repository().clone();
        let session = self.pipeline.session().clone();
        Ok(self.pipeline.request_change(change, move || async move {
            repo.save_user(&user, false).await?;
            // the record is already saved; a stale session slot is only logged
            if let Err(e) = session.update_current(&user) {
                tracing::warn!(username = %user.username, error = %e, "Failed to persist session");
            }
            Ok(())
        }))
    }

    pub async fn delete(&self, username: &str) -> ActionResult<ConfirmPrompt> {
        self.ensure_admin()?;
        let is_self = self
            .pipeline
            .session()
            .current_actor()
            .is_some_and(|u| u.username == username);
        if is_self {
            return Err(ActionError::SelfDelete);
        }

        let users = self.pipeline.repository().list_users().await?;
        let target = users
            .into_iter()
            .find(|u| u.username == username)
            .ok_or_else(|| ActionError::NotFound(username.to_string()))?;

        let change = changes::user_delete(&target);
        let repo = self.pipeline.repository().clone();
        Ok(self.pipeline.request_change(change, move || async move {
            repo.delete_user(&target.username).await
        }))
    }
}
