use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{StoreError, StoreResult};
use crate::work_item::{WorkItem, WorkShift, WorkStatus};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Flat text row shared by the CSV export and the SQLite table.
///
/// Dates and times are kept in separate `work_date` / `work_time` columns so
/// rows sort lexicographically in start order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkItemRecord {
    pub id: String,
    pub work_date: String,
    pub work_time: String,
    pub duration_minutes: i64,
    #[serde(default)]
    pub status: String,
    pub department: String,
    pub detail: String,
    pub worker: String,
    pub worker_role: String,
    #[serde(default)]
    pub work_shift: String,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub created_at: String,
}

impl From<&WorkItem> for WorkItemRecord {
    fn from(item: &WorkItem) -> Self {
        Self {
            id: item.id.to_string(),
            work_date: item.start_time.format(DATE_FORMAT).to_string(),
            work_time: item.start_time.format(TIME_FORMAT).to_string(),
            duration_minutes: item.duration_minutes,
            status: item.status.as_str().to_string(),
            department: item.department.clone(),
            detail: item.detail.clone(),
            worker: item.worker.clone(),
            worker_role: item.worker_role.clone(),
            work_shift: item.shift.as_str().to_string(),
            created_by: item.created_by.clone().unwrap_or_default(),
            created_at: item
                .created_at
                .map(|ts| ts.format(TIMESTAMP_FORMAT).to_string())
                .unwrap_or_default(),
        }
    }
}

impl TryFrom<WorkItemRecord> for WorkItem {
    type Error = StoreError;

    fn try_from(record: WorkItemRecord) -> StoreResult<Self> {
        let id = Uuid::parse_str(record.id.trim())
            .map_err(|err| invalid(&record.id, format!("bad id: {err}")))?;
        let date = NaiveDate::parse_from_str(record.work_date.trim(), DATE_FORMAT)
            .map_err(|err| invalid(&record.id, format!("bad work_date '{}': {err}", record.work_date)))?;
        let time = parse_time(record.work_time.trim())
            .ok_or_else(|| invalid(&record.id, format!("bad work_time '{}'", record.work_time)))?;
        let start_time = date.and_time(time);

        let shift = record
            .work_shift
            .trim()
            .parse()
            .unwrap_or_else(|_| WorkShift::from_time(time));
        let created_at = optional_text(&record.created_at)
            .map(|raw| {
                NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
                    .map_err(|err| invalid(&record.id, format!("bad created_at '{raw}': {err}")))
            })
            .transpose()?;

        Ok(WorkItem {
            id,
            start_time,
            duration_minutes: record.duration_minutes,
            status: WorkStatus::from_stored(optional_text(&record.status)),
            department: record.department,
            detail: record.detail,
            worker: record.worker,
            worker_role: record.worker_role,
            shift,
            created_by: optional_text(&record.created_by).map(str::to_string),
            created_at,
        })
    }
}

fn invalid(id: &str, message: String) -> StoreError {
    StoreError::InvalidData(format!("work item {id}: {message}"))
}

fn optional_text(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

// accepts both HH:MM:SS and the shorter HH:MM
fn parse_time(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .ok()
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> WorkItemRecord {
        WorkItemRecord {
            id: Uuid::new_v4().to_string(),
            work_date: "2025-03-03".into(),
            work_time: "13:15".into(),
            duration_minutes: 60,
            status: String::new(),
            department: "HR".into(),
            detail: "Network drop".into(),
            worker: "Anan".into(),
            worker_role: "network".into(),
            ..WorkItemRecord::default()
        }
    }

    #[test]
    fn blank_status_and_shift_fall_back() {
        let item = WorkItem::try_from(record()).unwrap();
        assert_eq!(item.status, WorkStatus::Pending);
        assert_eq!(item.shift, WorkShift::Afternoon);
        assert_eq!(item.created_at, None);
    }

    #[test]
    fn seconds_in_time_are_accepted() {
        let mut rec = record();
        rec.work_time = "07:05:00".into();
        let item = WorkItem::try_from(rec).unwrap();
        assert_eq!(item.start_time.time(), NaiveTime::from_hms_opt(7, 5, 0).unwrap());
    }

    #[test]
    fn bad_date_is_invalid_data() {
        let mut rec = record();
        rec.work_date = "03/03/2025".into();
        assert!(matches!(
            WorkItem::try_from(rec),
            Err(StoreError::InvalidData(_))
        ));
    }
}
