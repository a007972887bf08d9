use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

use crate::timeline::TimeSpan;

pub type WorkItemId = Uuid;

/// Every work item occupies one hour unless a stored duration says otherwise.
pub const DEFAULT_DURATION_MINUTES: i64 = 60;

/// Longest job a single record may describe.
pub const MAX_DURATION_MINUTES: i64 = 24 * 60;

fn default_duration_minutes() -> i64 {
    DEFAULT_DURATION_MINUTES
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseLabelError {
    kind: &'static str,
    value: String,
}

impl ParseLabelError {
    pub(crate) fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkStatus {
    #[default]
    Pending,
    InProgress,
    Complete,
}

impl WorkStatus {
    pub const ALL: [WorkStatus; 3] = [
        WorkStatus::Pending,
        WorkStatus::InProgress,
        WorkStatus::Complete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkStatus::Pending => "pending",
            WorkStatus::InProgress => "inprogress",
            WorkStatus::Complete => "complete",
        }
    }

    /// Lenient read for stored rows: a missing or unrecognised status is pending.
    pub fn from_stored(value: Option<&str>) -> Self {
        value
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or_default()
    }
}

impl fmt::Display for WorkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkStatus {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(WorkStatus::Pending),
            "inprogress" | "in_progress" | "in-progress" => Ok(WorkStatus::InProgress),
            "complete" | "completed" => Ok(WorkStatus::Complete),
            _ => Err(ParseLabelError::new("work status", s)),
        }
    }
}

/// Coarse time-of-day bucket a job starts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkShift {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl WorkShift {
    pub fn from_time(time: NaiveTime) -> Self {
        let minutes = time.hour() * 60 + time.minute();
        match minutes {
            300..720 => WorkShift::Morning,
            720..1080 => WorkShift::Afternoon,
            1080..1440 => WorkShift::Evening,
            _ => WorkShift::Night,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkShift::Morning => "morning",
            WorkShift::Afternoon => "afternoon",
            WorkShift::Evening => "evening",
            WorkShift::Night => "night",
        }
    }
}

impl fmt::Display for WorkShift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkShift {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "morning" => Ok(WorkShift::Morning),
            "afternoon" => Ok(WorkShift::Afternoon),
            "evening" => Ok(WorkShift::Evening),
            "night" => Ok(WorkShift::Night),
            _ => Err(ParseLabelError::new("work shift", s)),
        }
    }
}

/// Whether an item should draw the eye on the calendar views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attention {
    None,
    InProgress,
    PastDue,
}

/// A technician job assignment as held by the work item store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItem {
    pub id: WorkItemId,
    pub start_time: NaiveDateTime,
    #[serde(default = "default_duration_minutes")]
    pub duration_minutes: i64,
    #[serde(default)]
    pub status: WorkStatus,
    pub department: String,
    pub detail: String,
    pub worker: String,
    pub worker_role: String,
    pub shift: WorkShift,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
}

impl WorkItem {
    pub fn new(
        start_time: NaiveDateTime,
        department: impl Into<String>,
        detail: impl Into<String>,
        worker: impl Into<String>,
        worker_role: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            start_time,
            duration_minutes: DEFAULT_DURATION_MINUTES,
            status: WorkStatus::Pending,
            department: department.into(),
            detail: detail.into(),
            worker: worker.into(),
            worker_role: worker_role.into(),
            shift: WorkShift::from_time(start_time.time()),
            created_by: None,
            created_at: None,
        }
    }

    pub fn with_status(mut self, status: WorkStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_duration_minutes(mut self, minutes: i64) -> Self {
        self.duration_minutes = minutes;
        self
    }

    pub fn date(&self) -> NaiveDate {
        self.start_time.date()
    }

    /// Start plus duration, saturating at the calendar bounds for durations
    /// that slipped past validation.
    pub fn estimated_end_time(&self) -> NaiveDateTime {
        Duration::try_minutes(self.duration_minutes)
            .and_then(|duration| self.start_time.checked_add_signed(duration))
            .unwrap_or(if self.duration_minutes < 0 {
                NaiveDateTime::MIN
            } else {
                NaiveDateTime::MAX
            })
    }

    pub fn set_start_time(&mut self, start_time: NaiveDateTime) {
        self.start_time = start_time;
        self.shift = WorkShift::from_time(start_time.time());
    }

    /// A pending job whose start time has already gone by.
    pub fn is_past_due(&self, now: NaiveDateTime) -> bool {
        self.status == WorkStatus::Pending && self.start_time < now
    }

    pub fn attention(&self, now: NaiveDateTime) -> Attention {
        if self.status == WorkStatus::InProgress {
            Attention::InProgress
        } else if self.is_past_due(now) {
            Attention::PastDue
        } else {
            Attention::None
        }
    }
}

impl TimeSpan for WorkItem {
    fn start_time(&self) -> NaiveDateTime {
        self.start_time
    }

    fn end_time(&self) -> NaiveDateTime {
        self.estimated_end_time()
    }
}

/// Form input for creating or editing a work item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItemDraft {
    pub work_date: NaiveDate,
    pub work_time: NaiveTime,
    pub department: String,
    pub detail: String,
    pub worker: String,
    pub worker_role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<i64>,
}

impl WorkItemDraft {
    pub fn new(
        work_date: NaiveDate,
        work_time: NaiveTime,
        department: impl Into<String>,
        detail: impl Into<String>,
        worker: impl Into<String>,
        worker_role: impl Into<String>,
    ) -> Self {
        Self {
            work_date,
            work_time,
            department: department.into(),
            detail: detail.into(),
            worker: worker.into(),
            worker_role: worker_role.into(),
            duration_minutes: None,
        }
    }

    pub fn start_time(&self) -> NaiveDateTime {
        self.work_date.and_time(self.work_time)
    }

    pub fn duration_minutes(&self) -> i64 {
        self.duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES)
    }
}
