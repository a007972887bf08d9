//! The work item store contract and its implementations.

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use std::io;
use thiserror::Error;

use crate::work_item::{WorkItem, WorkItemDraft, WorkItemId, WorkStatus};
use crate::work_item_validation;

pub mod file;
pub mod memory;
mod record;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::{load_items_from_csv, load_items_from_json, save_items_to_csv, save_items_to_json};
pub use memory::InMemoryWorkItemStore;
pub use record::WorkItemRecord;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWorkItemStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("work item {0} not found")]
    NotFound(WorkItemId),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[cfg(feature = "sqlite")]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Which items a `list` call returns. Date bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkItemFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    /// Empty means any status.
    pub statuses: Vec<WorkStatus>,
}

impl WorkItemFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn on_date(date: NaiveDate) -> Self {
        Self {
            from: Some(date),
            to: Some(date),
            statuses: Vec::new(),
        }
    }

    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
            statuses: Vec::new(),
        }
    }

    pub fn with_status(mut self, status: WorkStatus) -> Self {
        if !self.statuses.contains(&status) {
            self.statuses.push(status);
        }
        self
    }

    pub fn matches(&self, item: &WorkItem) -> bool {
        let date = item.date();
        self.from.is_none_or(|from| date >= from)
            && self.to.is_none_or(|to| date <= to)
            && (self.statuses.is_empty() || self.statuses.contains(&item.status))
    }
}

/// Fields for a new row; the store assigns the id and creation time.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWorkItem {
    pub start_time: NaiveDateTime,
    pub duration_minutes: i64,
    pub status: WorkStatus,
    pub department: String,
    pub detail: String,
    pub worker: String,
    pub worker_role: String,
    pub created_by: Option<String>,
}

impl NewWorkItem {
    pub fn from_draft(draft: WorkItemDraft, created_by: Option<String>) -> Self {
        Self {
            start_time: draft.start_time(),
            duration_minutes: draft.duration_minutes(),
            status: WorkStatus::Pending,
            department: draft.department,
            detail: draft.detail,
            worker: draft.worker,
            worker_role: draft.worker_role,
            created_by,
        }
    }

    pub(crate) fn into_item(self, id: WorkItemId, created_at: NaiveDateTime) -> WorkItem {
        let mut item = WorkItem::new(
            whole_seconds(self.start_time),
            self.department,
            self.detail,
            self.worker,
            self.worker_role,
        )
        .with_status(self.status)
        .with_duration_minutes(self.duration_minutes);
        item.id = id;
        item.created_by = self.created_by;
        item.created_at = Some(whole_seconds(created_at));
        item
    }
}

/// Partial update; `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkItemPatch {
    pub start_time: Option<NaiveDateTime>,
    pub duration_minutes: Option<i64>,
    pub status: Option<WorkStatus>,
    pub department: Option<String>,
    pub detail: Option<String>,
    pub worker: Option<String>,
    pub worker_role: Option<String>,
}

impl WorkItemPatch {
    pub fn status(status: WorkStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn from_draft(draft: WorkItemDraft) -> Self {
        Self {
            start_time: Some(draft.start_time()),
            duration_minutes: Some(draft.duration_minutes()),
            status: None,
            department: Some(draft.department),
            detail: Some(draft.detail),
            worker: Some(draft.worker),
            worker_role: Some(draft.worker_role),
        }
    }

    /// Applies the patch; moving the start time re-derives the shift.
    pub fn apply(self, item: &mut WorkItem) {
        if let Some(start_time) = self.start_time {
            item.set_start_time(whole_seconds(start_time));
        }
        if let Some(minutes) = self.duration_minutes {
            item.duration_minutes = minutes;
        }
        if let Some(status) = self.status {
            item.status = status;
        }
        if let Some(department) = self.department {
            item.department = department;
        }
        if let Some(detail) = self.detail {
            item.detail = detail;
        }
        if let Some(worker) = self.worker {
            item.worker = worker;
        }
        if let Some(worker_role) = self.worker_role {
            item.worker_role = worker_role;
        }
    }
}

/// Call contract of the backing database.
pub trait WorkItemStore: Send + Sync {
    /// Matching items ordered by start time.
    fn list(&self, filter: &WorkItemFilter) -> StoreResult<Vec<WorkItem>>;
    fn get(&self, id: WorkItemId) -> StoreResult<Option<WorkItem>>;
    fn insert(&self, fields: NewWorkItem) -> StoreResult<WorkItem>;
    fn update(&self, id: WorkItemId, fields: WorkItemPatch) -> StoreResult<()>;
}

pub fn validate_items(items: &[WorkItem]) -> StoreResult<()> {
    work_item_validation::validate_item_collection(items)
        .map_err(|err| StoreError::InvalidData(err.to_string()))
}

/// Checks a single row before a store writes it.
pub(crate) fn validate_row(item: &WorkItem) -> StoreResult<()> {
    work_item_validation::validate_item(item).map_err(|err| StoreError::InvalidData(err.to_string()))
}

/// Drops sub-second precision, which the text-backed stores cannot keep.
fn whole_seconds(ts: NaiveDateTime) -> NaiveDateTime {
    ts.with_nanosecond(0).unwrap_or(ts)
}

pub(crate) fn now_local() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}
