//! Text and date filters behind the work board and the completed-work panel.

use chrono::NaiveDate;

use crate::work_item::{WorkItem, WorkStatus};

/// How many completed items the panel shows when nothing is typed.
pub const LATEST_COMPLETED_LIMIT: usize = 5;

/// Years at or above this are read as Buddhist Era.
const BUDDHIST_ERA_THRESHOLD: i32 = 2300;
const BUDDHIST_ERA_OFFSET: i32 = 543;

fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Items for the main board, earliest first.
///
/// An empty term hides completed work. Any other term, whitespace included, is
/// matched verbatim against department, detail, worker or worker role
/// case-insensitively across every status.
pub fn active_board(items: &[WorkItem], term: &str) -> Vec<WorkItem> {
    let needle = term.to_lowercase();
    let mut matches: Vec<WorkItem> = items
        .iter()
        .filter(|item| {
            if needle.is_empty() {
                return item.status != WorkStatus::Complete;
            }
            contains_folded(&item.department, &needle)
                || contains_folded(&item.detail, &needle)
                || contains_folded(&item.worker, &needle)
                || contains_folded(&item.worker_role, &needle)
        })
        .cloned()
        .collect();
    matches.sort_by_key(|item| item.start_time);
    matches
}

/// Completed-work lookup.
///
/// A blank term yields the latest completed items. A `D/M/YYYY` term selects
/// that day; when it is not a date or the day has nothing, the term is matched
/// against detail, worker and department instead.
pub fn search_completed(items: &[WorkItem], term: &str) -> Vec<WorkItem> {
    let mut completed: Vec<&WorkItem> = items
        .iter()
        .filter(|item| item.status == WorkStatus::Complete)
        .collect();

    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        completed.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        return completed
            .into_iter()
            .take(LATEST_COMPLETED_LIMIT)
            .cloned()
            .collect();
    }

    if let Some(date) = parse_search_date(&needle) {
        let on_date: Vec<WorkItem> = completed
            .iter()
            .filter(|item| item.date() == date)
            .map(|item| (*item).clone())
            .collect();
        if !on_date.is_empty() {
            return on_date;
        }
    }

    completed
        .into_iter()
        .filter(|item| {
            contains_folded(&item.detail, &needle)
                || contains_folded(&item.worker, &needle)
                || contains_folded(&item.department, &needle)
        })
        .cloned()
        .collect()
}

/// Parses `D/M/YYYY` (one or two digit day and month, four digit year).
pub fn parse_search_date(term: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = term.trim().split('/').collect();
    let [day, month, year] = parts[..] else {
        return None;
    };

    let digits = |s: &str, min: usize, max: usize| {
        (min..=max).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit())
    };
    if !digits(day, 1, 2) || !digits(month, 1, 2) || !digits(year, 4, 4) {
        return None;
    }

    let day: u32 = day.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    let mut year: i32 = year.parse().ok()?;
    if year >= BUDDHIST_ERA_THRESHOLD {
        year -= BUDDHIST_ERA_OFFSET;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}
