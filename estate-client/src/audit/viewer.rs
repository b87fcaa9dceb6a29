//! Read-only audit log view

use std::collections::BTreeMap;

use shared::{AuditAction, AuditLogEntry, modules};

/// Shown when the log has no entries
pub const EMPTY_STATE_MESSAGE: &str = "尚無操作紀錄";

/// Placeholder for entries without a diff
pub const NO_DIFF: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleTone {
    Electricity,
    Package,
    Other,
}

impl ModuleTone {
    pub fn of(module: &str) -> Self {
        match module {
            modules::ELECTRICITY => ModuleTone::Electricity,
            modules::PACKAGE => ModuleTone::Package,
            _ => ModuleTone::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionTone {
    Create,
    Update,
    Delete,
}

impl From<AuditAction> for ActionTone {
    fn from(action: AuditAction) -> Self {
        match action {
            AuditAction::Create => ActionTone::Create,
            AuditAction::Update => ActionTone::Update,
            AuditAction::Delete => ActionTone::Delete,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditLogRow {
    pub entry: AuditLogEntry,
    pub module_tone: ModuleTone,
    pub action_tone: ActionTone,
}

impl AuditLogRow {
    pub fn diff_text(&self) -> &str {
        self.entry.diff.as_deref().unwrap_or(NO_DIFF)
    }
}

#[derive(Debug, Clone, Default)]
pub struct AuditLogView {
    rows: Vec<AuditLogRow>,
}

impl AuditLogView {
    /// Newest first; entries sharing a timestamp keep their input order.
    pub fn new(mut entries: Vec<AuditLogEntry>) -> Self {
        // zero-padded timestamps sort lexicographically
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        let rows = entries
            .into_iter()
            .map(|entry| AuditLogRow {
                module_tone: ModuleTone::of(&entry.module),
                action_tone: entry.action.into(),
                entry,
            })
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[AuditLogRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn empty_message(&self) -> Option<&'static str> {
        self.is_empty().then_some(EMPTY_STATE_MESSAGE)
    }

    /// Rows per module tag, each group newest first
    pub fn group_by_module(&self) -> BTreeMap<&str, Vec<&AuditLogRow>> {
        let mut groups: BTreeMap<&str, Vec<&AuditLogRow>> = BTreeMap::new();
        for row in &self.rows {
            groups.entry(row.entry.module.as_str()).or_default().push(row);
        }
        groups
    }
}
