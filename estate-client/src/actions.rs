//! 业务操作入口
//!
//! 每个操作：权限检查 → 校验 → 生成变更描述 → 交给变更管线等待确认。
//! 返回的 [`ConfirmPrompt`] 只是提示；写入发生在 `confirm()` 时。

use std::sync::Arc;

use shared::util::new_id;
use shared::{Bill, FacilityUsageRecord, PackageRecord, TopUpRecord};
use thiserror::Error;

use crate::changes;
use crate::error::StoreError;
use crate::pipeline::{ConfirmPrompt, MutationPipeline};
use crate::validation::{self, ValidationError};

#[derive(Debug, Error)]
pub enum ActionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Permission denied")]
    Forbidden,

    #[error("無法刪除自己的帳號")]
    SelfDelete,

    #[error("Not found: {0}")]
    NotFound(String),

    /// Loading the records needed to validate the change failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type ActionResult<T> = Result<T, ActionError>;

/// Bill, top-up, facility usage and package edits (MANAGER or ADMIN)
#[derive(Clone)]
pub struct Dashboard {
    pipeline: Arc<MutationPipeline>,
}

impl Dashboard {
    pub fn new(pipeline: Arc<MutationPipeline>) -> Self {
        Self { pipeline }
    }

    fn ensure_can_edit(&self) -> ActionResult<()> {
        if self.pipeline.session().can_edit() {
            Ok(())
        } else {
            Err(ActionError::Forbidden)
        }
    }

    // ========== Bills ==========

    pub fn delete_bill(&self, bill: &Bill) -> ActionResult<ConfirmPrompt> {
        self.ensure_can_edit()?;
        let repo = self.pipeline.repository().clone();
        let id = bill.id.clone();
        Ok(self.pipeline.request_change(changes::bill_delete(bill), move || async move {
            repo.delete_bill(&id).await
        }))
    }

    /// Correct amount, usage or details of `before`. Id and period stay fixed.
    pub async fn update_bill(&self, before: &Bill, mut after: Bill) -> ActionResult<ConfirmPrompt> {
        self.ensure_can_edit()?;
        after.id = before.id.clone();
        after.roc_year = before.roc_year;
        after.month = before.month;
        validation::validate_bill(&after)?;
        let bills = self.pipeline.repository().list_bills().await?;
        validation::ensure_unique_period(&bills, &after)?;

        let change = changes::bill_update(before, &after);
        let repo = self.pipeline.repository().clone();
        Ok(self.pipeline.request_change(change, move || async move {
            repo.save_bill(&after).await
        }))
    }

    /// Add a bill recognized from an uploaded image. A fresh id is minted.
    pub async fn import_bill(&self, mut bill: Bill) -> ActionResult<ConfirmPrompt> {
        self.ensure_can_edit()?;
        bill.id = new_id();
        validation::validate_bill(&bill)?;
        let bills = self.pipeline.repository().list_bills().await?;
        validation::ensure_unique_period(&bills, &bill)?;

        let change = changes::bill_import(&bill);
        let repo = self.pipeline.repository().clone();
        Ok(self.pipeline.request_change(change, move || async move {
            repo.save_bill(&bill).await
        }))
    }

    // ========== Top-ups ==========

    /// `existing` is the record being edited; `None` creates a new one.
    pub fn save_top_up(
        &self,
        existing: Option<&TopUpRecord>,
        mut record: TopUpRecord,
    ) -> ActionResult<ConfirmPrompt> {
        self.ensure_can_edit()?;
        let change = match existing {
            Some(before) => {
                record.id = before.id.clone();
                changes::top_up_update(before, &record)
            }
            None => {
                record.id = new_id();
                changes::top_up_create(&record)
            }
        };
        validation::validate_top_up(&record)?;

        let repo = self.pipeline.repository().clone();
        Ok(self.pipeline.request_change(change, move || async move {
            repo.save_top_up(&record).await
        }))
    }

    pub fn delete_top_up(&self, record: &TopUpRecord) -> ActionResult<ConfirmPrompt> {
        self.ensure_can_edit()?;
        let repo = self.pipeline.repository().clone();
        let id = record.id.clone();
        Ok(self.pipeline.request_change(changes::top_up_delete(record), move || async move {
            repo.delete_top_up(&id).await
        }))
    }

    // ========== Facility usage ==========

    /// Create or update the record for `record`'s period. An existing record
    /// for the same period keeps its id.
    pub async fn save_facility_usage(
        &self,
        mut record: FacilityUsageRecord,
    ) -> ActionResult<ConfirmPrompt> {
        self.ensure_can_edit()?;
        validation::validate_facility_usage(&record)?;

        let usages = self.pipeline.repository().list_facility_usages().await?;
        let existing = usages
            .iter()
            .find(|u| u.year == record.year && u.month == record.month);
        record.id = existing.map_or_else(new_id, |u| u.id.clone());

        let change = changes::facility_usage_save(existing, &record);
        let repo = self.pipeline.repository().clone();
        Ok(self.pipeline.request_change(change, move || async move {
            repo.save_facility_usage(&record).await
        }))
    }

    pub fn delete_facility_usage(&self, record: &FacilityUsageRecord) -> ActionResult<ConfirmPrompt> {
        self.ensure_can_edit()?;
        let change = changes::facility_usage_delete(record);
        let repo = self.pipeline.repository().clone();
        let id = record.id.clone();
        Ok(self.pipeline.request_change(change, move || async move {
            repo.delete_facility_usage(&id).await
        }))
    }

    // ========== Packages ==========

    /// Set one (year, month) cell; `None` clears it.
    ///
    /// Returns `Ok(None)` when the value is unchanged and nothing needs confirming.
    pub async fn set_package(
        &self,
        year: i32,
        month: i32,
        count: Option<i64>,
    ) -> ActionResult<Option<ConfirmPrompt>> {
        self.ensure_can_edit()?;

        let packages = self.pipeline.repository().list_packages().await?;
        let existing = packages
            .into_iter()
            .find(|p| p.year == year && p.month == month);

        let record = count.map(|count| {
            let id = existing.as_ref().map_or_else(new_id, |p| p.id.clone());
            PackageRecord::new(id, year, month, count)
        });
        if let Some(record) = &record {
            validation::validate_package(record)?;
        }

        let Some(change) = changes::package_set(year, month, existing.as_ref().map(|p| p.count), count)
        else {
            return Ok(None);
        };

        let repo = self.pipeline.repository().clone();
        let prompt = self.pipeline.request_change(change, move || async move {
            match (record, existing) {
                (Some(record), _) => repo.save_package(&record).await,
                (None, Some(existing)) => repo.delete_package(&existing.id).await,
                (None, None) => Ok(()),
            }
        });
        Ok(Some(prompt))
    }
}
