mod common;

use std::sync::atomic::Ordering;

use common::{FlakyStore, admin, client, manager};
use estate_client::{
    ActionError, AuditAction, ConfirmOutcome, PrivilegedView, Repository, SessionError,
    ValidationError,
};
use shared::{Bill, FacilityUsageRecord, TopUpRecord, User, UserRole};

async fn confirm_entry(client: &estate_client::EstateClient) -> shared::AuditLogEntry {
    match client.pipeline().confirm().await.unwrap() {
        ConfirmOutcome::Committed(committed) => committed.entry.unwrap(),
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn test_manager_deletes_bill() {
    let store = FlakyStore::new();
    let client = client(&store);
    client.session().login(&manager()).unwrap();

    let bill = store
        .list_bills()
        .await
        .unwrap()
        .into_iter()
        .find(|b| b.id == "17")
        .unwrap();
    let prompt = client.dashboard().delete_bill(&bill).unwrap();
    assert!(prompt.message().contains("2025年 11月"));

    let entry = confirm_entry(&client).await;
    assert_eq!(entry.action, AuditAction::Delete);
    assert_eq!(entry.module, "electricity");
    assert_eq!(entry.actor_name, "物業主任");
    assert!(store.list_bills().await.unwrap().iter().all(|b| b.id != "17"));
}

#[tokio::test]
async fn test_guest_cannot_edit() {
    let store = FlakyStore::new();
    let client = client(&store);

    let bill = Bill::new("b1", 114, 11, 1.0, 1.0);
    assert!(matches!(
        client.dashboard().delete_bill(&bill),
        Err(ActionError::Forbidden)
    ));
    assert!(!client.pipeline().is_pending());
}

#[tokio::test]
async fn test_import_rejects_duplicate_period() {
    let store = FlakyStore::new();
    let client = client(&store);
    client.session().login(&manager()).unwrap();

    let result = client
        .dashboard()
        .import_bill(Bill::new("ignored", 114, 11, 1.0, 1.0))
        .await;
    assert!(matches!(
        result,
        Err(ActionError::Validation(ValidationError::DuplicatePeriod { year: 114, month: 11 }))
    ));
    assert_eq!(store.write_count(), 0);

    client
        .dashboard()
        .import_bill(Bill::new("ignored", 114, 12, 10000.0, 45000.0))
        .await
        .unwrap();
    let entry = confirm_entry(&client).await;
    assert_eq!(entry.description, "匯入 114年 12月 電費單");
    assert_eq!(entry.diff.as_deref(), Some("金額: 45000, 度數: 10000"));
}

#[tokio::test]
async fn test_update_bill_logs_diff() {
    let store = FlakyStore::new();
    let client = client(&store);
    client.session().login(&manager()).unwrap();

    let before = store.list_bills().await.unwrap().into_iter().find(|b| b.id == "17").unwrap();
    let after = Bill {
        amount: 51000.0,
        usage: 11000.0,
        ..before.clone()
    };
    client.dashboard().update_bill(&before, after).await.unwrap();
    let entry = confirm_entry(&client).await;
    assert_eq!(entry.action, AuditAction::Update);
    assert_eq!(entry.diff.as_deref(), Some("金額: 50309 -> 51000, 度數: 10960 -> 11000"));

    let saved = store.list_bills().await.unwrap().into_iter().find(|b| b.id == "17").unwrap();
    assert_eq!(saved.amount, 51000.0);
}

#[tokio::test]
async fn test_update_bill_keeps_period() {
    let store = FlakyStore::new();
    let client = client(&store);
    client.session().login(&manager()).unwrap();

    let before = store.list_bills().await.unwrap().into_iter().find(|b| b.id == "17").unwrap();
    let after = Bill {
        roc_year: 115,
        month: 3,
        amount: 51000.0,
        ..before.clone()
    };
    client.dashboard().update_bill(&before, after).await.unwrap();
    let entry = confirm_entry(&client).await;
    assert_eq!(entry.diff.as_deref(), Some("金額: 50309 -> 51000, 度數: 10960 -> 10960"));
    assert_eq!(entry.description, "修正 2025年11月帳單");

    let saved = store.list_bills().await.unwrap().into_iter().find(|b| b.id == "17").unwrap();
    assert_eq!((saved.roc_year, saved.month), (114, 11));
    assert_eq!(saved.amount, 51000.0);
}

#[tokio::test]
async fn test_top_up_create_and_delete() {
    let store = FlakyStore::new();
    let client = client(&store);
    client.session().login(&manager()).unwrap();

    assert!(matches!(
        client.dashboard().save_top_up(None, TopUpRecord::new("", "2025/12/01", 10, 10.0)),
        Err(ActionError::Validation(ValidationError::InvalidDate(_)))
    ));

    client
        .dashboard()
        .save_top_up(None, TopUpRecord::new("", "2025-12-01", 2000, 2000.0))
        .unwrap();
    let entry = confirm_entry(&client).await;
    assert_eq!(entry.action, AuditAction::Create);
    assert_eq!(entry.module, "facility");

    let created = store
        .list_top_ups()
        .await
        .unwrap()
        .into_iter()
        .find(|t| t.date == "2025-12-01")
        .unwrap();
    assert!(!created.id.is_empty());

    client.dashboard().delete_top_up(&created).unwrap();
    let entry = confirm_entry(&client).await;
    assert_eq!(entry.description, "刪除儲值紀錄 2025-12-01");
    assert!(store.list_top_ups().await.unwrap().iter().all(|t| t.id != created.id));
}

#[tokio::test]
async fn test_facility_usage_keeps_period_id() {
    let store = FlakyStore::new();
    let client = client(&store);
    client.session().login(&manager()).unwrap();

    let record = FacilityUsageRecord {
        gym_count: 300,
        game_room_count: 12,
        av_room_count: 7,
        ..FacilityUsageRecord::new("", 114, 11)
    };
    client.dashboard().save_facility_usage(record).await.unwrap();
    let entry = confirm_entry(&client).await;
    assert_eq!(entry.action, AuditAction::Update);
    assert_eq!(entry.diff.as_deref(), Some("健身房:292->300"));

    let usages = store.list_facility_usages().await.unwrap();
    let november: Vec<_> = usages.iter().filter(|u| u.year == 114 && u.month == 11).collect();
    assert_eq!(november.len(), 1);
    assert_eq!(november[0].id, "11");
    assert_eq!(november[0].gym_count, 300);
}

#[tokio::test]
async fn test_package_cell_lifecycle() {
    let store = FlakyStore::new();
    let client = client(&store);
    client.session().login(&manager()).unwrap();
    let dashboard = client.dashboard();

    // unchanged value needs no confirmation
    assert!(dashboard.set_package(2025, 11, Some(815)).await.unwrap().is_none());

    dashboard.set_package(2025, 12, Some(700)).await.unwrap().unwrap();
    assert_eq!(confirm_entry(&client).await.action, AuditAction::Create);

    dashboard.set_package(2025, 12, Some(720)).await.unwrap().unwrap();
    let entry = confirm_entry(&client).await;
    assert_eq!(entry.action, AuditAction::Update);
    assert_eq!(entry.diff.as_deref(), Some("700 -> 720"));

    dashboard.set_package(2025, 12, None).await.unwrap().unwrap();
    let entry = confirm_entry(&client).await;
    assert_eq!(entry.action, AuditAction::Delete);
    assert_eq!(entry.diff.as_deref(), Some("720 -> (空)"));

    let packages = store.list_packages().await.unwrap();
    assert!(packages.iter().all(|p| !(p.year == 2025 && p.month == 12)));
}

#[tokio::test]
async fn test_user_admin_rules() {
    let store = FlakyStore::new();
    let client = client(&store);

    client.session().login(&manager()).unwrap();
    assert!(matches!(
        client.user_admin(),
        Err(SessionError::Forbidden(PrivilegedView::UserManagement))
    ));

    client.session().login(&admin()).unwrap();
    let users = client.user_admin().unwrap();

    assert!(matches!(
        users.create(User::new("manager", "x", UserRole::Manager, "dup")).await,
        Err(ActionError::Validation(ValidationError::DuplicateUsername(_)))
    ));
    assert!(matches!(users.delete("Steven").await, Err(ActionError::SelfDelete)));
    assert!(matches!(
        users
            .update("manager", User::new("renamed", "x", UserRole::Manager, "n"))
            .await,
        Err(ActionError::Validation(ValidationError::UsernameChanged))
    ));

    users
        .create(User::new("guard", "pw", UserRole::Manager, "警衛"))
        .await
        .unwrap();
    let entry = confirm_entry(&client).await;
    assert_eq!(entry.module, "user");
    assert!(!entry.diff.unwrap_or_default().contains("pw"));

    users.delete("guard").await.unwrap();
    confirm_entry(&client).await;
    assert!(store.list_users().await.unwrap().iter().all(|u| u.username != "guard"));
}

#[tokio::test]
async fn test_editing_self_updates_session() {
    let store = FlakyStore::new();
    let client = client(&store);
    client.session().login(&admin()).unwrap();

    client
        .user_admin()
        .unwrap()
        .update("Steven", User::new("Steven", "Steven", UserRole::Admin, "Steven K."))
        .await
        .unwrap();
    let entry = confirm_entry(&client).await;

    // entry is written after the session update
    assert_eq!(entry.actor_name, "Steven K.");
    assert_eq!(entry.diff.as_deref(), Some("name: Kai -> Steven K."));
    assert_eq!(client.session().actor_name().as_deref(), Some("Steven K."));
}

#[tokio::test]
async fn test_self_edit_commits_when_session_slot_fails() {
    let store = FlakyStore::new();
    let client = client(&store);
    client.session().login(&admin()).unwrap();
    store.fail_session.store(true, Ordering::SeqCst);

    client
        .user_admin()
        .unwrap()
        .update("Steven", User::new("Steven", "Steven", UserRole::Admin, "Kai2"))
        .await
        .unwrap();
    let outcome = client.pipeline().confirm().await.unwrap();
    assert!(matches!(outcome, ConfirmOutcome::Committed(_)));

    let saved = store.list_users().await.unwrap().into_iter().find(|u| u.username == "Steven").unwrap();
    assert_eq!(saved.name, "Kai2");
    assert_eq!(client.session().actor_name().as_deref(), Some("Kai2"));

    let logs = store.list_logs().await.unwrap();
    let user_logs: Vec<_> = logs.iter().filter(|l| l.module == "user").collect();
    assert_eq!(user_logs.len(), 1);
    assert_eq!(user_logs[0].diff.as_deref(), Some("name: Kai -> Kai2"));
}

#[tokio::test]
async fn test_audit_log_view_admin_only() {
    let store = FlakyStore::new();
    let client = client(&store);
    client.session().login(&admin()).unwrap();

    let view = client.audit_log().await.unwrap();
    assert_eq!(view.empty_message(), Some("尚無操作紀錄"));

    client.dashboard().set_package(2026, 1, Some(10)).await.unwrap();
    confirm_entry(&client).await;
    let view = client.audit_log().await.unwrap();
    assert_eq!(view.len(), 1);
    assert_eq!(view.rows()[0].entry.module, "package");

    client.session().login(&manager()).unwrap();
    assert!(client.audit_log().await.is_err());
}
