use crate::work_item::{MAX_DURATION_MINUTES, WorkItem, WorkItemDraft};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct WorkItemValidationError {
    message: String,
}

impl WorkItemValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

fn require_text(field: &str, value: &str) -> Result<(), WorkItemValidationError> {
    if value.trim().is_empty() {
        return Err(WorkItemValidationError::new(format!("{field} is required")));
    }
    Ok(())
}

fn require_valid_duration(minutes: i64) -> Result<(), WorkItemValidationError> {
    if !(1..=MAX_DURATION_MINUTES).contains(&minutes) {
        return Err(WorkItemValidationError::new(format!(
            "duration_minutes must be between 1 and {MAX_DURATION_MINUTES} (got {minutes})"
        )));
    }
    Ok(())
}

pub fn validate_draft(draft: &WorkItemDraft) -> Result<(), WorkItemValidationError> {
    require_text("department", &draft.department)?;
    require_text("detail", &draft.detail)?;
    require_text("worker", &draft.worker)?;
    require_text("worker_role", &draft.worker_role)?;
    require_valid_duration(draft.duration_minutes())
}

pub fn validate_item(item: &WorkItem) -> Result<(), WorkItemValidationError> {
    require_valid_duration(item.duration_minutes).map_err(|err| {
        WorkItemValidationError::new(format!("work item {}: {err}", item.id))
    })
}

pub fn validate_item_collection(items: &[WorkItem]) -> Result<(), WorkItemValidationError> {
    let mut seen_ids = HashSet::with_capacity(items.len());
    for item in items {
        if !seen_ids.insert(item.id) {
            return Err(WorkItemValidationError::new(format!(
                "duplicate work item id {}",
                item.id
            )));
        }
        validate_item(item)?;
    }
    Ok(())
}
