//! 变更描述
//!
//! 纯函数：根据变更前后的记录生成确认提示文本与审计日志描述。
//! 不访问存储，不做校验。

use shared::{AuditAction, Bill, Facility, FacilityUsageRecord, TopUpRecord, User, modules};

use crate::audit::diff::{EMPTY_MARKER, create_diff, create_snapshot, render_changes, render_snapshot};
use crate::pipeline::{LogDescriptor, PendingChange};

/// Diff text when a save changes nothing
pub const NO_CHANGE: &str = "無變更";

fn change(descriptor: LogDescriptor, confirm_message: String) -> PendingChange {
    PendingChange {
        descriptor,
        confirm_message,
    }
}

// ========== Bills ==========

pub fn bill_delete(bill: &Bill) -> PendingChange {
    let (year, month) = (bill.gregorian_year(), bill.month);
    change(
        LogDescriptor::new(
            modules::ELECTRICITY,
            AuditAction::Delete,
            format!("{year}年 {month}月 電費單"),
        )
        .with_diff(format!("金額: ${}", bill.amount)),
        format!("您即將刪除 {year}年 {month}月 的電費單資料。\n此動作無法復原。"),
    )
}

pub fn bill_update(before: &Bill, after: &Bill) -> PendingChange {
    let (year, month) = (after.gregorian_year(), after.month);
    change(
        LogDescriptor::new(
            modules::ELECTRICITY,
            AuditAction::Update,
            format!("修正 {year}年{month}月帳單"),
        )
        .with_diff(format!(
            "金額: {} -> {}, 度數: {} -> {}",
            before.amount, after.amount, before.usage, after.usage
        )),
        format!("確定要修改 {year}年 {month}月 的帳單資料嗎？"),
    )
}

/// Bill recognized from an uploaded image
pub fn bill_import(bill: &Bill) -> PendingChange {
    let (roc_year, month) = (bill.roc_year, bill.month);
    change(
        LogDescriptor::new(
            modules::ELECTRICITY,
            AuditAction::Create,
            format!("匯入 {roc_year}年 {month}月 電費單"),
        )
        .with_diff(format!("金額: {}, 度數: {}", bill.amount, bill.usage)),
        format!("確定要匯入 {roc_year}年 {month}月 的電費單嗎？"),
    )
}

// ========== Top-ups ==========

pub fn top_up_create(record: &TopUpRecord) -> PendingChange {
    let description = format!("儲值 {}點 (${})", record.points, record.amount);
    change(
        LogDescriptor::new(modules::FACILITY, AuditAction::Create, description.clone())
            .with_diff(format!("(新) {description}")),
        format!(
            "確定要新增儲值紀錄?\n日期: {}\n點數: {}\n金額: ${}",
            record.date, record.points, record.amount
        ),
    )
}

pub fn top_up_update(before: &TopUpRecord, after: &TopUpRecord) -> PendingChange {
    let diff = format!(
        "日期:{}->{}, 點數:{}->{}, 金額:{}->{}",
        before.date, after.date, before.points, after.points, before.amount, after.amount
    );
    change(
        LogDescriptor::new(
            modules::FACILITY,
            AuditAction::Update,
            format!("修改儲值紀錄 {}", after.date),
        )
        .with_diff(diff.clone()),
        format!("確定要修改儲值紀錄?\n{diff}"),
    )
}

pub fn top_up_delete(record: &TopUpRecord) -> PendingChange {
    change(
        LogDescriptor::new(
            modules::FACILITY,
            AuditAction::Delete,
            format!("刪除儲值紀錄 {}", record.date),
        )
        .with_diff(format!("刪除: {}點, ${}", record.points, record.amount)),
        format!("確定要刪除 {} 的儲值紀錄嗎？\n此動作無法復原。", record.date),
    )
}

// ========== Facility usage ==========

/// `existing` is the stored record for the same period, if any.
pub fn facility_usage_save(
    existing: Option<&FacilityUsageRecord>,
    record: &FacilityUsageRecord,
) -> PendingChange {
    let action = if existing.is_some() {
        AuditAction::Update
    } else {
        AuditAction::Create
    };

    let diff = match existing {
        Some(before) => {
            let changes: Vec<_> = Facility::ALL
                .iter()
                .filter(|f| before.count(**f) != record.count(**f))
                .map(|f| format!("{}:{}->{}", f.short_label(), before.count(*f), record.count(*f)))
                .collect();
            if changes.is_empty() {
                NO_CHANGE.to_string()
            } else {
                changes.join(", ")
            }
        }
        None => Facility::ALL
            .iter()
            .map(|f| format!("{}:{}", f.short_label(), record.count(*f)))
            .collect::<Vec<_>>()
            .join(", "),
    };

    let (year, month) = (record.year, record.month);
    let counts: String = Facility::ALL
        .iter()
        .map(|f| format!("\n{}: {}", f.label(), record.count(*f)))
        .collect();

    change(
        LogDescriptor::new(modules::FACILITY, action, format!("{year}年{month}月 公設使用統計"))
            .with_diff(diff),
        format!("確定要{} {year}年{month}月 的公設使用資料嗎？\n{counts}", action.label()),
    )
}

pub fn facility_usage_delete(record: &FacilityUsageRecord) -> PendingChange {
    let (year, month) = (record.year, record.month);
    let diff = Facility::ALL
        .iter()
        .map(|f| format!("{}:{}", f.short_label(), record.count(*f)))
        .collect::<Vec<_>>()
        .join(", ");
    change(
        LogDescriptor::new(
            modules::FACILITY,
            AuditAction::Delete,
            format!("{year}年{month}月 公設使用統計"),
        )
        .with_diff(diff),
        format!("確定要刪除 {year}年{month}月 的公設使用資料嗎？\n此動作無法復原。"),
    )
}

// ========== Packages ==========

/// Setting a cell to `None` clears (deletes) it.
///
/// Returns `None` when the value does not change.
pub fn package_set(
    year: i32,
    month: i32,
    current: Option<i64>,
    new: Option<i64>,
) -> Option<PendingChange> {
    let (action, diff) = match (current, new) {
        (a, b) if a == b => return None,
        (Some(old), None) => (AuditAction::Delete, format!("{old} -> {EMPTY_MARKER}")),
        (Some(old), Some(new)) => (AuditAction::Update, format!("{old} -> {new}")),
        (None, Some(new)) => (AuditAction::Create, format!("{EMPTY_MARKER} -> {new}")),
        (None, None) => return None,
    };

    Some(change(
        LogDescriptor::new(modules::PACKAGE, action, format!("{year}年 {month}月 包裹數量"))
            .with_diff(diff.clone()),
        format!(
            "您即將{} {year}年 {month}月 的包裹資料。\n\n變更內容: {diff}",
            action.label()
        ),
    ))
}

// ========== Users ==========

pub fn user_create(user: &User) -> PendingChange {
    change(
        LogDescriptor::new(
            modules::USER,
            AuditAction::Create,
            format!("新增使用者 {}", user.username),
        )
        .with_diff(render_snapshot(&create_snapshot(user, modules::USER))),
        format!("確定要建立使用者 {} 嗎？", user.username),
    )
}

pub fn user_update(before: &User, after: &User) -> PendingChange {
    let changes = create_diff(before, after, modules::USER);
    let diff = if changes.is_empty() {
        NO_CHANGE.to_string()
    } else {
        render_changes(&changes)
    };
    change(
        LogDescriptor::new(
            modules::USER,
            AuditAction::Update,
            format!("修改使用者 {}", after.username),
        )
        .with_diff(diff),
        format!("確定要更新使用者 {} 的資料嗎？", after.username),
    )
}

pub fn user_delete(user: &User) -> PendingChange {
    change(
        LogDescriptor::new(
            modules::USER,
            AuditAction::Delete,
            format!("刪除使用者 {}", user.username),
        )
        .with_diff(format!("{} ({})", user.display_name(), user.role.label())),
        format!("確定要刪除帳號 {} 嗎？", user.username),
    )
}
