//! 会话管理
//!
//! 整个客户端生命周期内最多一个当前用户，持久化到 `APP_SESSION` 槽位（不含密码）。
//! 启动时 [`Session::restore`] 直接恢复，不重新认证。
//! 角色检查仅为提示性质。

use std::collections::BTreeSet;
use std::sync::Arc;

use parking_lot::Mutex;
use shared::User;
use thiserror::Error;
use tokio::sync::watch;

use crate::error::{StoreError, StoreResult};
use crate::repository::SessionStore;

/// 仅管理员可打开的视图
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PrivilegedView {
    UserManagement,
    AuditLog,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Not logged in")]
    NotLoggedIn,

    #[error("Admin role required for {0:?}")]
    Forbidden(PrivilegedView),
}

pub struct Session {
    store: Arc<dyn SessionStore>,
    current: watch::Sender<Option<User>>,
    views: Mutex<BTreeSet<PrivilegedView>>,
}

impl Session {
    /// Empty session (nobody logged in)
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        let (current, _) = watch::channel(None);
        Self {
            store,
            current,
            views: Mutex::new(BTreeSet::new()),
        }
    }

    /// Load a persisted actor without re-authentication.
    pub fn restore(store: Arc<dyn SessionStore>) -> StoreResult<Self> {
        let session = Self::new(store);
        if let Some(user) = session.store.load_session()? {
            tracing::info!(username = %user.username, "Session restored");
            session.current.send_replace(Some(user));
        }
        Ok(session)
    }

    pub fn login(&self, user: &User) -> StoreResult<()> {
        let user = user.without_password();
        self.store.store_session(&user)?;
        tracing::info!(username = %user.username, role = ?user.role, "Logged in");
        self.current.send_replace(Some(user));
        Ok(())
    }

    /// Clear the actor and close every privileged view.
    pub fn logout(&self) -> StoreResult<()> {
        self.views.lock().clear();
        if let Some(user) = self.current.send_replace(None) {
            tracing::info!(username = %user.username, "Logged out");
        }
        self.store.clear_session()
    }

    /// Replace the stored actor after the logged-in user edited their own account.
    ///
    /// Returns `false` when `user` is not the current actor. The in-memory
    /// actor is replaced even when persisting the slot fails.
    pub fn update_current(&self, user: &User) -> StoreResult<bool> {
        let is_self = self
            .current
            .borrow()
            .as_ref()
            .is_some_and(|u| u.username == user.username);
        if !is_self {
            return Ok(false);
        }

        let user = user.without_password();
        self.current.send_replace(Some(user.clone()));
        self.store.store_session(&user)?;
        Ok(true)
    }

    pub fn current_actor(&self) -> Option<User> {
        self.current.borrow().clone()
    }

    /// Display name used in audit entries
    pub fn actor_name(&self) -> Option<String> {
        self.current
            .borrow()
            .as_ref()
            .map(|u| u.display_name().to_string())
    }

    pub fn is_logged_in(&self) -> bool {
        self.current.borrow().is_some()
    }

    pub fn can_edit(&self) -> bool {
        self.current
            .borrow()
            .as_ref()
            .is_some_and(|u| u.role.can_edit())
    }

    pub fn is_admin(&self) -> bool {
        self.current
            .borrow()
            .as_ref()
            .is_some_and(|u| u.role.is_admin())
    }

    // ========== Privileged views ==========

    pub fn open_view(&self, view: PrivilegedView) -> Result<(), SessionError> {
        if !self.is_logged_in() {
            return Err(SessionError::NotLoggedIn);
        }
        if !self.is_admin() {
            return Err(SessionError::Forbidden(view));
        }
        self.views.lock().insert(view);
        Ok(())
    }

    pub fn close_view(&self, view: PrivilegedView) {
        self.views.lock().remove(&view);
    }

    pub fn is_view_open(&self, view: PrivilegedView) -> bool {
        self.views.lock().contains(&view)
    }

    pub fn open_views(&self) -> Vec<PrivilegedView> {
        self.views.lock().iter().copied().collect()
    }

    /// Actor changes (login / logout / self-edit)
    pub fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.current.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::LocalStore;
    use shared::UserRole;

    fn store() -> Arc<LocalStore> {
        Arc::new(LocalStore::open_in_memory().unwrap())
    }

    fn admin() -> User {
        User::new("Steven", "Steven", UserRole::Admin, "Kai")
    }

    fn manager() -> User {
        User::new("manager", "manager", UserRole::Manager, "物業主任")
    }

    #[test]
    fn test_login_persists_and_restores() {
        let store = store();
        let session = Session::new(store.clone());
        assert!(session.current_actor().is_none());
        assert!(!session.can_edit());

        session.login(&manager()).unwrap();
        assert!(session.can_edit());
        assert!(!session.is_admin());
        assert_eq!(session.actor_name().as_deref(), Some("物業主任"));

        let restored = Session::restore(store).unwrap();
        let actor = restored.current_actor().unwrap();
        assert_eq!(actor.username, "manager");
        assert!(actor.password.is_empty());
    }

    #[test]
    fn test_logout_closes_privileged_views() {
        let store = store();
        let session = Session::new(store.clone());
        session.login(&admin()).unwrap();
        session.open_view(PrivilegedView::UserManagement).unwrap();
        session.open_view(PrivilegedView::AuditLog).unwrap();
        assert_eq!(session.open_views().len(), 2);

        session.logout().unwrap();
        assert!(session.open_views().is_empty());
        assert!(session.current_actor().is_none());
        assert!(Session::restore(store).unwrap().current_actor().is_none());
    }

    #[test]
    fn test_only_admin_opens_privileged_views() {
        let session = Session::new(store());
        assert!(matches!(
            session.open_view(PrivilegedView::AuditLog),
            Err(SessionError::NotLoggedIn)
        ));

        session.login(&manager()).unwrap();
        assert!(matches!(
            session.open_view(PrivilegedView::AuditLog),
            Err(SessionError::Forbidden(PrivilegedView::AuditLog))
        ));
        assert!(!session.is_view_open(PrivilegedView::AuditLog));
    }

    #[test]
    fn test_update_current_only_for_self() {
        let session = Session::new(store());
        session.login(&admin()).unwrap();

        assert!(!session.update_current(&manager()).unwrap());
        assert_eq!(session.actor_name().as_deref(), Some("Kai"));

        let renamed = User::new("Steven", "new-pass", UserRole::Admin, "Steven K.");
        assert!(session.update_current(&renamed).unwrap());
        assert_eq!(session.actor_name().as_deref(), Some("Steven K."));
    }

    #[tokio::test]
    async fn test_subscribe_sees_login() {
        let session = Session::new(store());
        let mut rx = session.subscribe();
        session.login(&manager()).unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().as_ref().unwrap().username, "manager");
    }
}
