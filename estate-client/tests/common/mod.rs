//! Test doubles shared by the integration tests

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use estate_client::{
    EstateClient, LocalStore, Repository, SessionStore, StoreError, StoreResult, User, UserRole,
};
use shared::{AuditLogEntry, Bill, FacilityUsageRecord, NewAuditLog, PackageRecord, TopUpRecord};

/// LocalStore wrapper that counts writes and can be told to fail.
pub struct FlakyStore {
    inner: LocalStore,
    pub writes: AtomicUsize,
    pub fail_writes: AtomicBool,
    pub fail_logs: AtomicBool,
    pub fail_session: AtomicBool,
}

impl FlakyStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: LocalStore::open_in_memory().unwrap(),
            writes: AtomicUsize::new(0),
            fail_writes: AtomicBool::new(false),
            fail_logs: AtomicBool::new(false),
            fail_session: AtomicBool::new(false),
        })
    }

    pub fn inner(&self) -> &LocalStore {
        &self.inner
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn write(&self) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Database("disk full".into()));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl Repository for FlakyStore {
    async fn list_bills(&self) -> StoreResult<Vec<Bill>> {
        self.inner.list_bills().await
    }
    async fn save_bill(&self, bill: &Bill) -> StoreResult<()> {
        self.write()?;
        self.inner.save_bill(bill).await
    }
    async fn delete_bill(&self, id: &str) -> StoreResult<()> {
        self.write()?;
        self.inner.delete_bill(id).await
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        self.inner.list_users().await
    }
    async fn save_user(&self, user: &User, is_new: bool) -> StoreResult<()> {
        self.write()?;
        self.inner.save_user(user, is_new).await
    }
    async fn delete_user(&self, username: &str) -> StoreResult<()> {
        self.write()?;
        self.inner.delete_user(username).await
    }

    async fn list_top_ups(&self) -> StoreResult<Vec<TopUpRecord>> {
        self.inner.list_top_ups().await
    }
    async fn save_top_up(&self, record: &TopUpRecord) -> StoreResult<()> {
        self.write()?;
        self.inner.save_top_up(record).await
    }
    async fn delete_top_up(&self, id: &str) -> StoreResult<()> {
        self.write()?;
        self.inner.delete_top_up(id).await
    }

    async fn list_facility_usages(&self) -> StoreResult<Vec<FacilityUsageRecord>> {
        self.inner.list_facility_usages().await
    }
    async fn save_facility_usage(&self, record: &FacilityUsageRecord) -> StoreResult<()> {
        self.write()?;
        self.inner.save_facility_usage(record).await
    }
    async fn delete_facility_usage(&self, id: &str) -> StoreResult<()> {
        self.write()?;
        self.inner.delete_facility_usage(id).await
    }

    async fn list_packages(&self) -> StoreResult<Vec<PackageRecord>> {
        self.inner.list_packages().await
    }
    async fn save_package(&self, record: &PackageRecord) -> StoreResult<()> {
        self.write()?;
        self.inner.save_package(record).await
    }
    async fn delete_package(&self, id: &str) -> StoreResult<()> {
        self.write()?;
        self.inner.delete_package(id).await
    }

    async fn list_logs(&self) -> StoreResult<Vec<AuditLogEntry>> {
        self.inner.list_logs().await
    }
    async fn append_log(&self, log: NewAuditLog) -> StoreResult<AuditLogEntry> {
        if self.fail_logs.load(Ordering::SeqCst) {
            return Err(StoreError::Database("log slot locked".into()));
        }
        self.inner.append_log(log).await
    }
}

impl SessionStore for FlakyStore {
    fn load_session(&self) -> StoreResult<Option<User>> {
        self.inner.load_session()
    }
    fn store_session(&self, user: &User) -> StoreResult<()> {
        if self.fail_session.load(Ordering::SeqCst) {
            return Err(StoreError::Database("session slot locked".into()));
        }
        self.inner.store_session(user)
    }
    fn clear_session(&self) -> StoreResult<()> {
        self.inner.clear_session()
    }
}

pub fn client(store: &Arc<FlakyStore>) -> EstateClient {
    EstateClient::from_parts(store.clone(), store.clone()).unwrap()
}

pub fn admin() -> User {
    User::new("Steven", "Steven", UserRole::Admin, "Kai")
}

pub fn manager() -> User {
    User::new("manager", "manager", UserRole::Manager, "物業主任")
}
