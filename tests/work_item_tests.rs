use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use work_calendar::{
    Attention, DEFAULT_DURATION_MINUTES, WorkItem, WorkItemDraft, WorkShift, WorkStatus,
};

fn at(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, 3)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

fn t(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

#[test]
fn new_item_is_pending_for_an_hour() {
    let item = WorkItem::new(at(9, 0), "IT", "Fix PC", "Nok", "computer");
    assert_eq!(item.status, WorkStatus::Pending);
    assert_eq!(item.duration_minutes, DEFAULT_DURATION_MINUTES);
    assert_eq!(item.estimated_end_time(), at(10, 0));
    assert_eq!(item.shift, WorkShift::Morning);
}

#[test]
fn shift_boundaries() {
    assert_eq!(WorkShift::from_time(t(4, 59)), WorkShift::Night);
    assert_eq!(WorkShift::from_time(t(5, 0)), WorkShift::Morning);
    assert_eq!(WorkShift::from_time(t(11, 59)), WorkShift::Morning);
    assert_eq!(WorkShift::from_time(t(12, 0)), WorkShift::Afternoon);
    assert_eq!(WorkShift::from_time(t(17, 59)), WorkShift::Afternoon);
    assert_eq!(WorkShift::from_time(t(18, 0)), WorkShift::Evening);
    assert_eq!(WorkShift::from_time(t(23, 59)), WorkShift::Evening);
    assert_eq!(WorkShift::from_time(t(0, 0)), WorkShift::Night);
}

#[test]
fn moving_the_start_rederives_the_shift() {
    let mut item = WorkItem::new(at(9, 0), "IT", "Fix PC", "Nok", "computer");
    item.set_start_time(at(19, 0));
    assert_eq!(item.shift, WorkShift::Evening);
}

#[test]
fn only_pending_work_can_be_past_due() {
    let now = at(12, 0);
    let earlier = WorkItem::new(at(9, 0), "IT", "Fix PC", "Nok", "computer");
    assert!(earlier.is_past_due(now));
    assert_eq!(earlier.attention(now), Attention::PastDue);

    let started = earlier.clone().with_status(WorkStatus::InProgress);
    assert!(!started.is_past_due(now));
    assert_eq!(started.attention(now), Attention::InProgress);

    let finished = earlier.clone().with_status(WorkStatus::Complete);
    assert_eq!(finished.attention(now), Attention::None);

    let later = WorkItem::new(at(15, 0), "IT", "Fix PC", "Nok", "computer");
    assert!(!later.is_past_due(now));
    // a job starting right now is not late yet
    assert!(!WorkItem::new(now, "IT", "x", "y", "z").is_past_due(now));
}

#[test]
fn status_labels_parse_leniently_but_serialize_canonically() {
    assert_eq!("pending".parse::<WorkStatus>().unwrap(), WorkStatus::Pending);
    assert_eq!("InProgress".parse::<WorkStatus>().unwrap(), WorkStatus::InProgress);
    assert_eq!("in_progress".parse::<WorkStatus>().unwrap(), WorkStatus::InProgress);
    assert_eq!("completed".parse::<WorkStatus>().unwrap(), WorkStatus::Complete);
    assert!("cancelled".parse::<WorkStatus>().is_err());

    assert_eq!(WorkStatus::InProgress.to_string(), "inprogress");
    assert_eq!(
        serde_json::to_string(&WorkStatus::Complete).unwrap(),
        "\"complete\""
    );

    assert_eq!(WorkStatus::from_stored(None), WorkStatus::Pending);
    assert_eq!(WorkStatus::from_stored(Some("bogus")), WorkStatus::Pending);
    assert_eq!(WorkStatus::from_stored(Some(" complete ")), WorkStatus::Complete);
}

#[test]
fn json_without_duration_or_status_uses_defaults() {
    let json = r#"{
        "id": "6f1c2d4e-8a3b-4c5d-9e6f-7a8b9c0d1e2f",
        "start_time": "2025-03-03T13:30:00",
        "department": "HR",
        "detail": "Replace bulb",
        "worker": "Anan",
        "worker_role": "electrician",
        "shift": "afternoon"
    }"#;
    let item: WorkItem = serde_json::from_str(json).unwrap();
    assert_eq!(item.duration_minutes, 60);
    assert_eq!(item.status, WorkStatus::Pending);
    assert_eq!(item.created_by, None);
}

#[test]
fn draft_combines_date_and_time() {
    let mut draft = WorkItemDraft::new(
        NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
        t(13, 30),
        "HR",
        "Replace bulb",
        "Anan",
        "electrician",
    );
    assert_eq!(draft.start_time(), at(13, 30));
    assert_eq!(draft.duration_minutes(), 60);
    draft.duration_minutes = Some(90);
    assert_eq!(draft.duration_minutes(), 90);
}

#[test]
fn end_time_saturates_instead_of_overflowing() {
    let huge = WorkItem::new(at(9, 0), "IT", "x", "y", "z").with_duration_minutes(i64::MAX);
    assert_eq!(huge.estimated_end_time(), NaiveDateTime::MAX);

    let negative = WorkItem::new(at(9, 0), "IT", "x", "y", "z").with_duration_minutes(i64::MIN);
    assert_eq!(negative.estimated_end_time(), NaiveDateTime::MIN);
    assert_eq!(work_calendar::timeline::occupied_end(&negative), at(9, 1));
}
