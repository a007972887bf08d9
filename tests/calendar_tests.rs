use chrono::{NaiveDate, NaiveDateTime};
use work_calendar::{
    Attention, CalendarError, MonthGrid, WorkItem, WorkStatus, calendar::days_in_month,
    shift_month,
};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn at(day: NaiveDate, hour: u32) -> NaiveDateTime {
    day.and_hms_opt(hour, 0, 0).unwrap()
}

fn job(day: NaiveDate, hour: u32, detail: &str) -> WorkItem {
    WorkItem::new(at(day, hour), "Accounting", detail, "Somchai", "computer")
}

#[test]
fn month_grid_starts_on_the_right_weekday() {
    // 2025-03-01 is a Saturday
    let grid = MonthGrid::build(2025, 3, &[], at(d(2025, 3, 10), 9)).unwrap();
    assert_eq!(grid.leading_blanks, 6);
    assert_eq!(grid.days.len(), 31);
    assert_eq!(grid.days[0].date, d(2025, 3, 1));

    // 2025-06-01 is a Sunday
    let june = MonthGrid::build(2025, 6, &[], at(d(2025, 3, 10), 9)).unwrap();
    assert_eq!(june.leading_blanks, 0);
    assert_eq!(june.days.len(), 30);
}

#[test]
fn leap_february_has_twenty_nine_days() {
    assert_eq!(days_in_month(2024, 2).unwrap(), 29);
    assert_eq!(days_in_month(2025, 2).unwrap(), 28);
    assert_eq!(days_in_month(2025, 12).unwrap(), 31);
}

#[test]
fn invalid_month_is_rejected() {
    let err = MonthGrid::build(2025, 13, &[], at(d(2025, 3, 10), 9)).unwrap_err();
    assert_eq!(
        err,
        CalendarError::InvalidMonth {
            year: 2025,
            month: 13
        }
    );
    assert!(days_in_month(2025, 0).is_err());
}

#[test]
fn cells_list_open_work_and_count_everything() {
    let day = d(2025, 3, 7);
    let items = vec![
        job(day, 14, "afternoon"),
        job(day, 9, "morning"),
        job(day, 11, "finished").with_status(WorkStatus::Complete),
        job(d(2025, 4, 7), 9, "next month"),
    ];
    let now = at(d(2025, 3, 7), 12);
    let grid = MonthGrid::build(2025, 3, &items, now).unwrap();

    let cell = grid.day(7).unwrap();
    assert!(cell.is_today);
    assert_eq!(cell.total, 3);
    let details: Vec<&str> = cell.items.iter().map(|e| e.item.detail.as_str()).collect();
    assert_eq!(details, vec!["morning", "afternoon"]);
    assert_eq!(cell.items[0].attention, Attention::PastDue);
    assert_eq!(cell.items[1].attention, Attention::None);

    assert_eq!(grid.day(8).unwrap().total, 0);
    assert!(!grid.day(8).unwrap().is_today);
    assert!(grid.day(0).is_none());
    assert!(grid.day(32).is_none());
}

#[test]
fn in_progress_work_is_flagged() {
    let day = d(2025, 3, 3);
    let items = vec![job(day, 9, "busy").with_status(WorkStatus::InProgress)];
    let grid = MonthGrid::build(2025, 3, &items, at(d(2025, 3, 20), 9)).unwrap();
    assert_eq!(grid.day(3).unwrap().items[0].attention, Attention::InProgress);
}

#[test]
fn month_navigation_wraps_years() {
    assert_eq!(shift_month(2025, 1, -1), (2024, 12));
    assert_eq!(shift_month(2025, 12, 1), (2026, 1));
    assert_eq!(shift_month(2025, 3, 14), (2026, 5));
    assert_eq!(shift_month(2025, 3, -15), (2023, 12));

    let grid = MonthGrid::build(2025, 12, &[], at(d(2025, 12, 1), 9)).unwrap();
    assert_eq!(grid.previous(), (2025, 11));
    assert_eq!(grid.next(), (2026, 1));
}
