mod common;

use std::sync::atomic::Ordering;

use common::{FlakyStore, admin, client, manager};
use estate_client::{
    AuditAction, ConfirmOutcome, ConfirmPrompt, LogDescriptor, PipelineError, Repository,
    SessionStore,
};
use shared::{Bill, modules};

fn delete_descriptor() -> LogDescriptor {
    LogDescriptor::new(modules::ELECTRICITY, AuditAction::Delete, "2025年 11月 電費單")
        .with_diff("金額: $50309")
}

#[tokio::test]
async fn test_cancel_writes_nothing() {
    let store = FlakyStore::new();
    let client = client(&store);
    client.session().login(&manager()).unwrap();

    let repo = store.clone();
    let prompt = client.pipeline().request_action(
        move || async move { repo.delete_bill("17").await },
        delete_descriptor(),
        "您即將刪除 2025年 11月 的電費單資料。",
    );
    assert_eq!(prompt.message(), "您即將刪除 2025年 11月 的電費單資料。");
    assert!(client.pipeline().is_pending());

    assert!(client.pipeline().cancel());
    assert!(!client.pipeline().is_pending());
    assert_eq!(store.write_count(), 0);
    assert!(store.list_logs().await.unwrap().is_empty());
    assert!(store.list_bills().await.unwrap().iter().any(|b| b.id == "17"));
}

#[tokio::test]
async fn test_confirm_writes_once_and_logs_once() {
    let store = FlakyStore::new();
    let client = client(&store);
    client.session().login(&manager()).unwrap();
    let mut events = client.pipeline().subscribe();

    let repo = store.clone();
    client.pipeline().request_action(
        move || async move { repo.delete_bill("17").await },
        delete_descriptor(),
        "confirm?",
    );
    let outcome = client.pipeline().confirm().await.unwrap();

    assert_eq!(store.write_count(), 1);
    let logs = store.list_logs().await.unwrap();
    assert_eq!(logs.len(), 1);

    let entry = &logs[0];
    assert_eq!(entry.actor_name, "物業主任");
    assert_eq!(entry.module, "electricity");
    assert_eq!(entry.action, AuditAction::Delete);
    assert_eq!(entry.description, "2025年 11月 電費單");
    assert_eq!(entry.diff.as_deref(), Some("金額: $50309"));

    match outcome {
        ConfirmOutcome::Committed(committed) => {
            assert_eq!(committed.entry.as_ref(), Some(entry));
            assert_eq!(committed.descriptor, delete_descriptor());
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    let event = events.recv().await.unwrap();
    assert_eq!(event.module, "electricity");
    assert_eq!(event.action, AuditAction::Delete);
    assert!(!client.pipeline().is_pending());
}

#[tokio::test]
async fn test_failed_write_surfaces_error_without_log() {
    let store = FlakyStore::new();
    let client = client(&store);
    client.session().login(&manager()).unwrap();
    store.fail_writes.store(true, Ordering::SeqCst);

    let repo = store.clone();
    let bill = Bill::new("b1", 114, 11, 10960.0, 50309.0);
    client.pipeline().request_action(
        move || async move { repo.save_bill(&bill).await },
        LogDescriptor::new(modules::ELECTRICITY, AuditAction::Create, "b1"),
        "confirm?",
    );

    let result = client.pipeline().confirm().await;
    assert!(matches!(result, Err(PipelineError::WriteFailed(_))));
    assert!(!client.pipeline().is_pending());
    assert!(store.list_logs().await.unwrap().is_empty());
    assert!(store.list_bills().await.unwrap().iter().all(|b| b.id != "b1"));
}

#[tokio::test]
async fn test_log_failure_keeps_write() {
    let store = FlakyStore::new();
    let client = client(&store);
    client.session().login(&manager()).unwrap();
    store.fail_logs.store(true, Ordering::SeqCst);

    let repo = store.clone();
    let bill = Bill::new("b1", 114, 12, 10000.0, 45000.0);
    client.pipeline().request_action(
        move || async move { repo.save_bill(&bill).await },
        LogDescriptor::new(modules::ELECTRICITY, AuditAction::Create, "b1"),
        "confirm?",
    );

    match client.pipeline().confirm().await.unwrap() {
        ConfirmOutcome::Committed(committed) => assert!(committed.entry.is_none()),
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(store.list_bills().await.unwrap().iter().any(|b| b.id == "b1"));
    assert!(store.list_logs().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_no_actor_writes_without_log() {
    let store = FlakyStore::new();
    let client = client(&store);

    let repo = store.clone();
    client.pipeline().request_action(
        move || async move { repo.delete_package("1").await },
        LogDescriptor::new(modules::PACKAGE, AuditAction::Delete, "2024年 5月 包裹數量"),
        "confirm?",
    );

    match client.pipeline().confirm().await.unwrap() {
        ConfirmOutcome::Committed(committed) => assert!(committed.entry.is_none()),
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(store.write_count(), 1);
    assert!(store.list_logs().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_last_request_wins() {
    let store = FlakyStore::new();
    let client = client(&store);
    client.session().login(&admin()).unwrap();

    let repo = store.clone();
    client.pipeline().request_action(
        move || async move { repo.delete_bill("1").await },
        LogDescriptor::new(modules::ELECTRICITY, AuditAction::Delete, "first"),
        "first?",
    );
    let repo = store.clone();
    client.pipeline().request_action(
        move || async move { repo.delete_bill("2").await },
        LogDescriptor::new(modules::ELECTRICITY, AuditAction::Delete, "second"),
        "second?",
    );
    assert_eq!(client.pipeline().pending().unwrap().message(), "second?");

    client.pipeline().confirm().await.unwrap();

    let ids: Vec<_> = store.list_bills().await.unwrap().into_iter().map(|b| b.id).collect();
    assert!(ids.contains(&"1".to_string()));
    assert!(!ids.contains(&"2".to_string()));

    let logs = store.list_logs().await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].description, "second");
    assert_eq!(logs[0].actor_name, "Kai");
}

#[tokio::test]
async fn test_confirm_without_pending() {
    let store = FlakyStore::new();
    let client = client(&store);
    assert!(matches!(
        client.pipeline().confirm().await,
        Err(PipelineError::NothingPending)
    ));
}

#[tokio::test]
async fn test_logout_through_gate() {
    let store = FlakyStore::new();
    let client = client(&store);
    client.session().login(&admin()).unwrap();
    client.user_admin().unwrap();

    let prompt = client.request_logout();
    assert!(matches!(prompt, ConfirmPrompt::Logout { .. }));

    // cancelled logout keeps the session
    client.pipeline().cancel();
    assert!(client.session().is_logged_in());

    client.request_logout();
    assert_eq!(
        client.pipeline().confirm().await.unwrap(),
        ConfirmOutcome::LoggedOut
    );
    assert!(!client.session().is_logged_in());
    assert!(client.session().open_views().is_empty());
    assert!(store.inner().load_session().is_ok_and(|s| s.is_none()));
}
