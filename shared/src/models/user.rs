//! User Model

use serde::{Deserialize, Serialize};

use super::Record;

/// 用户角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "db", derive(sqlx::Type), sqlx(rename_all = "UPPERCASE"))]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    #[default]
    Guest,
    /// 物业管理员
    Manager,
    /// 系统管理员
    Admin,
}

impl UserRole {
    /// 可编辑业务数据
    pub fn can_edit(self) -> bool {
        matches!(self, UserRole::Manager | UserRole::Admin)
    }

    pub fn is_admin(self) -> bool {
        self == UserRole::Admin
    }

    pub fn label(self) -> &'static str {
        match self {
            UserRole::Guest => "訪客",
            UserRole::Manager => "物業管理員",
            UserRole::Admin => "系統管理員",
        }
    }
}

/// User entity
///
/// `username` is the primary key and never changes after creation.
/// Passwords are stored as plain text; the role check is advisory only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: UserRole,
    /// 显示名称，空则使用 username
    #[serde(default)]
    pub name: String,
}

impl User {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        role: UserRole,
        name: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            role,
            name: name.into(),
        }
    }

    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.username
        } else {
            &self.name
        }
    }

    /// Copy of this user safe to keep in a session slot.
    pub fn without_password(&self) -> Self {
        Self {
            password: String::new(),
            ..self.clone()
        }
    }
}

impl Record for User {
    fn id(&self) -> &str {
        &self.username
    }
}
