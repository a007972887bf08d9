use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;
use thiserror::Error;

use crate::work_item::{Attention, WorkItem, WorkStatus};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    #[error("invalid month {year}-{month:02}")]
    InvalidMonth { year: i32, month: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthEntry {
    #[serde(flatten)]
    pub item: WorkItem,
    pub attention: Attention,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayCell {
    pub date: NaiveDate,
    pub is_today: bool,
    /// Open work (pending or in progress) starting that day, earliest first.
    pub items: Vec<MonthEntry>,
    /// All items starting that day, whatever their status.
    pub total: usize,
}

/// Month view: one cell per day, preceded by blank cells up to the first weekday.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    /// Blank cells before the 1st in a Sunday-first week.
    pub leading_blanks: u32,
    pub days: Vec<DayCell>,
}

impl MonthGrid {
    pub fn build(
        year: i32,
        month: u32,
        items: &[WorkItem],
        now: NaiveDateTime,
    ) -> Result<Self, CalendarError> {
        let first = first_of_month(year, month)?;
        let day_count = days_in_month(year, month)?;
        let today = now.date();

        let mut days = Vec::with_capacity(day_count as usize);
        for offset in 0..day_count {
            let date = first + Duration::days(i64::from(offset));
            let mut on_day: Vec<&WorkItem> =
                items.iter().filter(|item| item.date() == date).collect();
            on_day.sort_by_key(|item| item.start_time);

            let total = on_day.len();
            let open = on_day
                .into_iter()
                .filter(|item| item.status != WorkStatus::Complete)
                .map(|item| MonthEntry {
                    item: item.clone(),
                    attention: item.attention(now),
                })
                .collect();

            days.push(DayCell {
                date,
                is_today: date == today,
                items: open,
                total,
            });
        }

        Ok(Self {
            year,
            month,
            leading_blanks: first.weekday().num_days_from_sunday(),
            days,
        })
    }

    pub fn day(&self, day: u32) -> Option<&DayCell> {
        self.days.get(day.checked_sub(1)? as usize)
    }

    pub fn previous(&self) -> (i32, u32) {
        shift_month(self.year, self.month, -1)
    }

    pub fn next(&self) -> (i32, u32) {
        shift_month(self.year, self.month, 1)
    }
}

fn first_of_month(year: i32, month: u32) -> Result<NaiveDate, CalendarError> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or(CalendarError::InvalidMonth { year, month })
}

pub fn days_in_month(year: i32, month: u32) -> Result<u32, CalendarError> {
    let first = first_of_month(year, month)?;
    let (next_year, next_month) = shift_month(year, month, 1);
    let next_first = first_of_month(next_year, next_month)?;
    Ok((next_first - first).num_days() as u32)
}

/// Moves `delta` months from `year`/`month`, wrapping across years.
pub fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let index = year * 12 + month as i32 - 1 + delta;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}
