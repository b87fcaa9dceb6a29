//! Client configuration

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::error::StoreResult;
use crate::repository::{LocalStore, RemoteStore, Repository, SessionStore};

/// Where records are persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    /// redb file on disk
    Local(PathBuf),
    /// redb in-memory backend (nothing survives the process)
    InMemory,
    /// RPC proxy (e.g., "http://localhost:3000")
    Remote { base_url: String },
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub backend: Backend,

    /// Request timeout in seconds (remote backend only)
    pub timeout: u64,

    /// Session slot file for the remote backend.
    /// Local backends keep the session next to the records.
    pub session_path: Option<PathBuf>,
}

impl ClientConfig {
    pub fn new(backend: Backend) -> Self {
        Self {
            backend,
            timeout: 30,
            session_path: None,
        }
    }

    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self::new(Backend::Local(path.into()))
    }

    pub fn in_memory() -> Self {
        Self::new(Backend::InMemory)
    }

    pub fn remote(base_url: impl Into<String>) -> Self {
        Self::new(Backend::Remote {
            base_url: base_url.into(),
        })
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = secs;
        self
    }

    /// Set the session slot file (remote backend)
    pub fn with_session_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_path = Some(path.into());
        self
    }

    /// Open the configured stores.
    pub(crate) fn open_stores(&self) -> StoreResult<(Arc<dyn Repository>, Arc<dyn SessionStore>)> {
        match &self.backend {
            Backend::Local(path) => {
                let store = Arc::new(LocalStore::open(path)?);
                let repository: Arc<dyn Repository> = store.clone();
                let sessions: Arc<dyn SessionStore> = store;
                Ok((repository, sessions))
            }
            Backend::InMemory => {
                let store = Arc::new(LocalStore::open_in_memory()?);
                let repository: Arc<dyn Repository> = store.clone();
                let sessions: Arc<dyn SessionStore> = store;
                Ok((repository, sessions))
            }
            Backend::Remote { base_url } => {
                let remote = RemoteStore::with_timeout(base_url, Duration::from_secs(self.timeout))?;
                let sessions = match &self.session_path {
                    Some(path) => LocalStore::open(path)?,
                    None => LocalStore::open_in_memory()?,
                };
                let repository: Arc<dyn Repository> = Arc::new(remote);
                let sessions: Arc<dyn SessionStore> = Arc::new(sessions);
                Ok((repository, sessions))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        let config = ClientConfig::remote("http://localhost:3000")
            .with_timeout(5)
            .with_session_path("/tmp/session.redb");
        assert_eq!(
            config.backend,
            Backend::Remote {
                base_url: "http://localhost:3000".into()
            }
        );
        assert_eq!(config.timeout, 5);
        assert!(config.session_path.is_some());

        assert_eq!(ClientConfig::in_memory().timeout, 30);
    }
}
