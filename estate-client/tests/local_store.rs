use estate_client::{LocalStore, Repository, SessionStore};
use shared::{AuditAction, Bill, NewAuditLog, PackageRecord, User, UserRole, modules, seed};
use tempfile::TempDir;

fn open(dir: &TempDir) -> LocalStore {
    LocalStore::open(dir.path().join("estate.redb")).unwrap()
}

#[tokio::test]
async fn test_seeded_dataset_is_stable() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);

    let first = store.list_bills().await.unwrap();
    let second = store.list_bills().await.unwrap();
    assert_eq!(first, seed::default_bills());
    assert_eq!(first, second);

    assert_eq!(store.list_users().await.unwrap().len(), 2);
    assert_eq!(store.list_top_ups().await.unwrap().len(), 14);
    assert_eq!(store.list_facility_usages().await.unwrap().len(), 11);
    assert_eq!(store.list_packages().await.unwrap().len(), 19);
}

#[tokio::test]
async fn test_bill_upsert_scenario() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);

    store.save_bill(&Bill::new("b1", 114, 11, 10960.0, 50309.0)).await.unwrap();
    store.save_bill(&Bill::new("b1", 114, 11, 11000.0, 51000.0)).await.unwrap();

    let bills = store.list_bills().await.unwrap();
    let b1: Vec<_> = bills.iter().filter(|b| b.id == "b1").collect();
    assert_eq!(b1.len(), 1);
    assert_eq!(b1[0].usage, 11000.0);
    assert_eq!(b1[0].amount, 51000.0);
    assert_eq!(bills.len(), seed::default_bills().len() + 1);
}

#[tokio::test]
async fn test_save_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);
    let record = PackageRecord::new("p-new", 2025, 12, 700);

    store.save_package(&record).await.unwrap();
    store.save_package(&record).await.unwrap();

    let matching: Vec<_> = store
        .list_packages()
        .await
        .unwrap()
        .into_iter()
        .filter(|p| p.id == "p-new")
        .collect();
    assert_eq!(matching, vec![record]);
}

#[tokio::test]
async fn test_delete_absent_id_is_noop() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);
    let before = store.list_top_ups().await.unwrap();

    store.delete_top_up("does-not-exist").await.unwrap();
    store.delete_user("nobody").await.unwrap();

    assert_eq!(store.list_top_ups().await.unwrap(), before);
    assert_eq!(store.list_users().await.unwrap(), seed::default_users());
}

#[tokio::test]
async fn test_log_cap_keeps_newest_500() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);

    for n in 1..=501 {
        store
            .append_log(NewAuditLog {
                actor_name: "Kai".into(),
                module: modules::FACILITY.into(),
                action: AuditAction::Update,
                description: format!("log {n}"),
                diff: None,
            })
            .await
            .unwrap();
    }

    let logs = store.list_logs().await.unwrap();
    assert_eq!(logs.len(), 500);
    assert_eq!(logs[0].description, "log 501");
    assert_eq!(logs[499].description, "log 2");
    assert!(logs.iter().all(|l| !l.id.is_empty() && !l.timestamp.is_empty()));
}

#[tokio::test]
async fn test_records_survive_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let store = open(&dir);
        store
            .save_user(&User::new("guard", "pw", UserRole::Manager, "警衛"), true)
            .await
            .unwrap();
        store
            .store_session(&User::new("Steven", "Steven", UserRole::Admin, "Kai"))
            .unwrap();
    }

    let store = open(&dir);
    assert!(store.list_users().await.unwrap().iter().any(|u| u.username == "guard"));
    let session = store.load_session().unwrap().unwrap();
    assert_eq!(session.username, "Steven");
    assert!(session.password.is_empty());
}
