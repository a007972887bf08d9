use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;
use tracing::{info, warn};

use crate::calendar::{CalendarError, MonthGrid};
use crate::search;
use crate::session::{Session, SessionProvider};
use crate::store::{NewWorkItem, StoreError, WorkItemFilter, WorkItemPatch, WorkItemStore};
use crate::timeline::{DayTimeline, TimelineWindow};
use crate::work_item::{WorkItem, WorkItemDraft, WorkItemId, WorkStatus};
use crate::work_item_validation::{self, WorkItemValidationError};

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("no active session")]
    Unauthenticated,

    #[error("{action} requires the admin role")]
    Forbidden { action: &'static str },

    #[error("invalid work item: {0}")]
    Invalid(#[from] WorkItemValidationError),

    #[error(transparent)]
    Calendar(#[from] CalendarError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type BoardResult<T> = Result<T, BoardError>;

/// Session-gated access to the work item store.
///
/// Any signed-in user may read; creating, editing and progressing items is
/// reserved for admins.
#[derive(Clone)]
pub struct WorkBoard {
    store: Arc<dyn WorkItemStore>,
    sessions: Arc<dyn SessionProvider>,
}

impl WorkBoard {
    pub fn new(store: Arc<dyn WorkItemStore>, sessions: Arc<dyn SessionProvider>) -> Self {
        Self { store, sessions }
    }

    pub fn session(&self, token: &str) -> BoardResult<Session> {
        self.sessions
            .current(token)
            .ok_or(BoardError::Unauthenticated)
    }

    pub fn refresh_session(&self, token: &str) -> BoardResult<Session> {
        self.sessions
            .refresh(token)
            .ok_or(BoardError::Unauthenticated)
    }

    pub fn sign_out(&self, token: &str) {
        self.sessions.sign_out(token);
    }

    fn require_admin(&self, token: &str, action: &'static str) -> BoardResult<Session> {
        let session = self.session(token)?;
        if !session.role.is_admin() {
            warn!(user_id = %session.user_id, action, "rejected non-admin mutation");
            return Err(BoardError::Forbidden { action });
        }
        Ok(session)
    }

    fn fetch(&self, id: WorkItemId) -> BoardResult<WorkItem> {
        self.store
            .get(id)?
            .ok_or(BoardError::Store(StoreError::NotFound(id)))
    }

    pub fn list(&self, token: &str, filter: &WorkItemFilter) -> BoardResult<Vec<WorkItem>> {
        self.session(token)?;
        Ok(self.store.list(filter)?)
    }

    pub fn get(&self, token: &str, id: WorkItemId) -> BoardResult<WorkItem> {
        self.session(token)?;
        self.fetch(id)
    }

    pub fn create(&self, token: &str, draft: WorkItemDraft) -> BoardResult<WorkItem> {
        let session = self.require_admin(token, "creating work items")?;
        work_item_validation::validate_draft(&draft)?;
        let item = self
            .store
            .insert(NewWorkItem::from_draft(draft, Some(session.user_id.clone())))?;
        info!(id = %item.id, user_id = %session.user_id, start = %item.start_time, "work item created");
        Ok(item)
    }

    pub fn edit(&self, token: &str, id: WorkItemId, draft: WorkItemDraft) -> BoardResult<WorkItem> {
        let session = self.require_admin(token, "editing work items")?;
        work_item_validation::validate_draft(&draft)?;
        self.store.update(id, WorkItemPatch::from_draft(draft))?;
        info!(%id, user_id = %session.user_id, "work item edited");
        self.fetch(id)
    }

    pub fn set_status(&self, token: &str, id: WorkItemId, status: WorkStatus) -> BoardResult<WorkItem> {
        let session = self.require_admin(token, "changing work status")?;
        self.store.update(id, WorkItemPatch::status(status))?;
        info!(%id, user_id = %session.user_id, %status, "work status changed");
        self.fetch(id)
    }

    pub fn day_timeline(
        &self,
        token: &str,
        date: NaiveDate,
        window: &TimelineWindow,
        now: NaiveDateTime,
    ) -> BoardResult<DayTimeline> {
        let items = self.list(token, &WorkItemFilter::on_date(date))?;
        Ok(DayTimeline::build(date, &items, window, now))
    }

    pub fn month(
        &self,
        token: &str,
        year: i32,
        month: u32,
        now: NaiveDateTime,
    ) -> BoardResult<MonthGrid> {
        let days = crate::calendar::days_in_month(year, month)?;
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or(CalendarError::InvalidMonth { year, month })?;
        let last = NaiveDate::from_ymd_opt(year, month, days)
            .ok_or(CalendarError::InvalidMonth { year, month })?;
        let items = self.list(token, &WorkItemFilter::between(first, last))?;
        Ok(MonthGrid::build(year, month, &items, now)?)
    }

    pub fn search_active(&self, token: &str, term: &str) -> BoardResult<Vec<WorkItem>> {
        let items = self.list(token, &WorkItemFilter::all())?;
        Ok(search::active_board(&items, term))
    }

    pub fn search_completed(&self, token: &str, term: &str) -> BoardResult<Vec<WorkItem>> {
        let items = self.list(token, &WorkItemFilter::all().with_status(WorkStatus::Complete))?;
        Ok(search::search_completed(&items, term))
    }
}
