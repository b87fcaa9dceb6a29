//! redb-based local store
//!
//! 单表 `slots`：key = 槽位名，value = JSON。
//! 集合槽位存 JSON 数组；`APP_SESSION` 存单个用户对象。
//! 首次读取不存在的槽位时写入内置默认数据；槽位内容损坏时记录警告并重置为默认数据。

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::util::{new_id, now_timestamp};
use shared::{
    AUDIT_LOG_CAPACITY, AuditLogEntry, Bill, FacilityUsageRecord, NewAuditLog, PackageRecord,
    Record, TopUpRecord, User, seed,
};

use super::{Repository, SessionStore};
use crate::error::{StoreError, StoreResult};

/// Slots table: key = slot name, value = JSON
const SLOTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("slots");

/// 固定槽位
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Bills,
    Users,
    TopUps,
    FacilityUsage,
    Packages,
    Logs,
    Session,
}

impl Slot {
    pub fn key(self) -> &'static str {
        match self {
            Slot::Bills => "APP_BILLS",
            Slot::Users => "APP_USERS",
            Slot::TopUps => "APP_TOPUPS",
            Slot::FacilityUsage => "APP_FACILITY_USAGE",
            Slot::Packages => "APP_PACKAGES",
            Slot::Logs => "APP_LOGS",
            Slot::Session => "APP_SESSION",
        }
    }
}

/// A JSON array slot with a built-in default dataset.
trait Seeded: Serialize + DeserializeOwned {
    const SLOT: Slot;
    fn seed() -> Vec<Self>;
}

macro_rules! impl_seeded {
    ($($ty:ty => $slot:expr, $seed:expr;)*) => {
        $(
            impl Seeded for $ty {
                const SLOT: Slot = $slot;
                fn seed() -> Vec<Self> {
                    $seed
                }
            }
        )*
    };
}

impl_seeded! {
    Bill => Slot::Bills, seed::default_bills();
    User => Slot::Users, seed::default_users();
    TopUpRecord => Slot::TopUps, seed::default_top_ups();
    FacilityUsageRecord => Slot::FacilityUsage, seed::default_facility_usages();
    PackageRecord => Slot::Packages, seed::default_packages();
    AuditLogEntry => Slot::Logs, Vec::new();
}

/// Local key-value store
///
/// redb calls are synchronous and run on the calling task; one session
/// issues one operation at a time.
#[derive(Clone)]
pub struct LocalStore {
    db: Arc<Database>,
}

impl LocalStore {
    /// Open or create database
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open in-memory database (nothing survives the process)
    pub fn open_in_memory() -> StoreResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StoreResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(SLOTS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    fn read_raw(&self, slot: Slot) -> StoreResult<Option<Vec<u8>>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SLOTS_TABLE)?;
        Ok(table.get(slot.key())?.map(|guard| guard.value().to_vec()))
    }

    fn write_raw(txn: &WriteTransaction, slot: Slot, bytes: &[u8]) -> StoreResult<()> {
        let mut table = txn.open_table(SLOTS_TABLE)?;
        table.insert(slot.key(), bytes)?;
        Ok(())
    }

    /// Decode a slot, falling back to the seed when absent or corrupt.
    ///
    /// The flag is `true` when the returned value must be persisted.
    fn decode<T: Seeded>(bytes: Option<Vec<u8>>) -> (Vec<T>, bool) {
        match bytes {
            None => (T::seed(), true),
            Some(bytes) => match serde_json::from_slice(&bytes) {
                Ok(items) => (items, false),
                Err(e) => {
                    tracing::warn!(
                        slot = T::SLOT.key(),
                        error = %e,
                        "Corrupt slot, resetting to default dataset"
                    );
                    (T::seed(), true)
                }
            },
        }
    }

    /// Read a collection, seeding (and persisting) it on first access.
    fn load<T: Seeded>(&self) -> StoreResult<Vec<T>> {
        let (items, dirty) = Self::decode::<T>(self.read_raw(T::SLOT)?);
        if dirty {
            let write_txn = self.db.begin_write()?;
            Self::write_raw(&write_txn, T::SLOT, &serde_json::to_vec(&items)?)?;
            write_txn.commit()?;
            tracing::debug!(slot = T::SLOT.key(), count = items.len(), "Slot seeded");
        }
        Ok(items)
    }

    /// Read-modify-write a collection inside one write transaction.
    ///
    /// Nothing is written when `f` fails.
    fn update<T, R, F>(&self, f: F) -> StoreResult<R>
    where
        T: Seeded,
        F: FnOnce(&mut Vec<T>) -> StoreResult<R>,
    {
        let write_txn = self.db.begin_write()?;
        let bytes = {
            let table = write_txn.open_table(SLOTS_TABLE)?;
            table.get(T::SLOT.key())?.map(|guard| guard.value().to_vec())
        };
        let (mut items, _) = Self::decode::<T>(bytes);

        let result = f(&mut items)?;

        Self::write_raw(&write_txn, T::SLOT, &serde_json::to_vec(&items)?)?;
        write_txn.commit()?;
        Ok(result)
    }

    fn upsert<T: Seeded + Record>(&self, record: &T) -> StoreResult<()> {
        self.update::<T, _, _>(|items| {
            match items.iter_mut().find(|r| r.id() == record.id()) {
                Some(existing) => *existing = record.clone(),
                None => items.push(record.clone()),
            }
            Ok(())
        })
    }

    fn remove<T: Seeded + Record>(&self, id: &str) -> StoreResult<()> {
        self.update::<T, _, _>(|items| {
            items.retain(|r| r.id() != id);
            Ok(())
        })
    }
}

#[async_trait]
impl Repository for LocalStore {
    async fn list_bills(&self) -> StoreResult<Vec<Bill>> {
        self.load()
    }

    async fn save_bill(&self, bill: &Bill) -> StoreResult<()> {
        self.upsert(bill)
    }

    async fn delete_bill(&self, id: &str) -> StoreResult<()> {
        self.remove::<Bill>(id)
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        self.load()
    }

    async fn save_user(&self, user: &User, is_new: bool) -> StoreResult<()> {
        self.update::<User, _, _>(|users| {
            let existing = users.iter().position(|u| u.username == user.username);
            match (existing, is_new) {
                (Some(_), true) => Err(StoreError::Conflict(user.username.clone())),
                (None, false) => Err(StoreError::NotFound(user.username.clone())),
                (Some(i), false) => {
                    users[i] = user.clone();
                    Ok(())
                }
                (None, true) => {
                    users.push(user.clone());
                    Ok(())
                }
            }
        })
    }

    async fn delete_user(&self, username: &str) -> StoreResult<()> {
        self.remove::<User>(username)
    }

    async fn list_top_ups(&self) -> StoreResult<Vec<TopUpRecord>> {
        self.load()
    }

    async fn save_top_up(&self, record: &TopUpRecord) -> StoreResult<()> {
        self.upsert(record)
    }

    async fn delete_top_up(&self, id: &str) -> StoreResult<()> {
        self.remove::<TopUpRecord>(id)
    }

    async fn list_facility_usages(&self) -> StoreResult<Vec<FacilityUsageRecord>> {
        self.load()
    }

    async fn save_facility_usage(&self, record: &FacilityUsageRecord) -> StoreResult<()> {
        self.upsert(record)
    }

    async fn delete_facility_usage(&self, id: &str) -> StoreResult<()> {
        self.remove::<FacilityUsageRecord>(id)
    }

    async fn list_packages(&self) -> StoreResult<Vec<PackageRecord>> {
        self.load()
    }

    async fn save_package(&self, record: &PackageRecord) -> StoreResult<()> {
        self.upsert(record)
    }

    async fn delete_package(&self, id: &str) -> StoreResult<()> {
        self.remove::<PackageRecord>(id)
    }

    async fn list_logs(&self) -> StoreResult<Vec<AuditLogEntry>> {
        let mut logs: Vec<AuditLogEntry> = self.load()?;
        // stored oldest-first
        logs.reverse();
        logs.truncate(AUDIT_LOG_CAPACITY);
        Ok(logs)
    }

    async fn append_log(&self, log: NewAuditLog) -> StoreResult<AuditLogEntry> {
        self.update::<AuditLogEntry, _, _>(|logs| {
            let entry = log.into_entry(new_id(), now_timestamp());
            logs.push(entry.clone());
            let overflow = logs.len().saturating_sub(AUDIT_LOG_CAPACITY);
            if overflow > 0 {
                logs.drain(..overflow);
            }
            Ok(entry)
        })
    }
}

impl SessionStore for LocalStore {
    fn load_session(&self) -> StoreResult<Option<User>> {
        let Some(bytes) = self.read_raw(Slot::Session)? else {
            return Ok(None);
        };
        match serde_json::from_slice(&bytes) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                tracing::warn!(error = %e, "Corrupt session slot, clearing");
                self.clear_session()?;
                Ok(None)
            }
        }
    }

    fn store_session(&self, user: &User) -> StoreResult<()> {
        let bytes = serde_json::to_vec(&user.without_password())?;
        let write_txn = self.db.begin_write()?;
        Self::write_raw(&write_txn, Slot::Session, &bytes)?;
        write_txn.commit()?;
        Ok(())
    }

    fn clear_session(&self) -> StoreResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(SLOTS_TABLE)?;
            table.remove(Slot::Session.key())?;
        }
        write_txn.commit()?;
        Ok(())
    }
}
