use chrono::{NaiveDate, NaiveDateTime};
use work_calendar::{WorkItem, assign_tracks, timeline::occupied_end, track_count};

fn at(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, 3)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

fn item(hour: u32, minute: u32) -> WorkItem {
    WorkItem::new(at(hour, minute), "IT", "job", "Somchai", "computer")
}

fn item_for(hour: u32, minute: u32, minutes: i64) -> WorkItem {
    item(hour, minute).with_duration_minutes(minutes)
}

/// Peak number of items running at the same instant.
fn peak_concurrency(items: &[WorkItem]) -> usize {
    let mut events: Vec<(NaiveDateTime, i32)> = Vec::new();
    for item in items {
        events.push((item.start_time, 1));
        events.push((occupied_end(item), -1));
    }
    // ends sort before starts at the same instant (end-exclusive)
    events.sort_by_key(|(time, delta)| (*time, *delta));
    let mut running = 0;
    let mut peak = 0;
    for (_, delta) in events {
        running += delta;
        peak = peak.max(running);
    }
    peak as usize
}

#[test]
fn empty_input_yields_empty_output_and_one_row() {
    let placed = assign_tracks::<WorkItem>(&[]);
    assert!(placed.is_empty());
    assert_eq!(track_count(&placed), 1);
}

#[test]
fn overlapping_pair_uses_two_tracks() {
    let first = item(9, 0);
    let second = item(9, 30);
    let placed = assign_tracks(&[first.clone(), second.clone()]);

    assert_eq!(placed.len(), 2);
    assert_eq!(placed[0].item.id, first.id);
    assert_eq!(placed[0].track, 0);
    assert_eq!(placed[1].item.id, second.id);
    assert_eq!(placed[1].track, 1);
    assert_eq!(track_count(&placed), 2);
}

#[test]
fn back_to_back_items_share_a_track() {
    let placed = assign_tracks(&[item(9, 0), item(10, 0)]);
    assert!(placed.iter().all(|p| p.track == 0));
    assert_eq!(track_count(&placed), 1);
}

#[test]
fn identical_starts_fan_out_in_input_order() {
    let items = vec![item(9, 0), item(9, 0), item(9, 0)];
    let placed = assign_tracks(&items);

    let tracks: Vec<usize> = placed.iter().map(|p| p.track).collect();
    assert_eq!(tracks, vec![0, 1, 2]);
    for (placed, original) in placed.iter().zip(&items) {
        assert_eq!(placed.item.id, original.id);
    }
}

#[test]
fn unsorted_input_is_laid_out_by_start_time() {
    let late = item(11, 0);
    let early = item(8, 0);
    let middle = item(8, 30);
    let placed = assign_tracks(&[late.clone(), early.clone(), middle.clone()]);

    let order: Vec<_> = placed.iter().map(|p| p.item.id).collect();
    assert_eq!(order, vec![early.id, middle.id, late.id]);
    assert_eq!(placed[0].track, 0);
    assert_eq!(placed[1].track, 1);
    // both lanes are free again by 11:00, lowest index wins
    assert_eq!(placed[2].track, 0);
}

#[test]
fn freed_lower_lane_is_reused_before_higher_one() {
    let items = vec![
        item_for(8, 0, 60),
        item_for(8, 30, 120),
        item_for(9, 0, 60),
        item_for(9, 15, 30),
    ];
    let placed = assign_tracks(&items);
    let tracks: Vec<usize> = placed.iter().map(|p| p.track).collect();
    // 09:00 goes back to lane 0, 09:15 needs a third lane
    assert_eq!(tracks, vec![0, 1, 0, 2]);
}

#[test]
fn same_track_items_never_overlap_and_lane_count_is_minimal() {
    let items = vec![
        item_for(8, 0, 60),
        item_for(8, 15, 30),
        item_for(8, 30, 90),
        item_for(8, 45, 60),
        item_for(9, 0, 60),
        item_for(9, 30, 15),
        item_for(10, 0, 60),
        item_for(10, 30, 60),
        item_for(12, 0, 60),
        item_for(12, 0, 60),
        item_for(13, 0, 60),
    ];
    let placed = assign_tracks(&items);

    for (i, a) in placed.iter().enumerate() {
        for b in placed.iter().skip(i + 1) {
            if a.track != b.track {
                continue;
            }
            let disjoint = occupied_end(&a.item) <= b.item.start_time
                || occupied_end(&b.item) <= a.item.start_time;
            assert!(disjoint, "items on track {} overlap", a.track);
        }
    }

    // hand count: 08:45-09:00 has 08:00, 08:30 and 08:45 running; at 09:30
    // 08:30, 08:45, 09:00 and 09:30 overlap
    assert_eq!(peak_concurrency(&items), 4);
    assert_eq!(track_count(&placed), 4);
}

#[test]
fn repeated_runs_give_identical_assignments() {
    let items = vec![item(9, 0), item(9, 0), item(9, 30), item(10, 0), item(10, 15)];
    let first: Vec<_> = assign_tracks(&items)
        .into_iter()
        .map(|p| (p.item.id, p.track))
        .collect();
    let second: Vec<_> = assign_tracks(&items)
        .into_iter()
        .map(|p| (p.item.id, p.track))
        .collect();
    assert_eq!(first, second);
}

#[test]
fn input_is_left_untouched() {
    let items = vec![item(10, 0), item(9, 0)];
    let before = items.clone();
    let _ = assign_tracks(&items);
    assert_eq!(items, before);
}

#[test]
fn zero_and_negative_durations_occupy_one_minute() {
    let broken = item_for(9, 0, 0);
    let negative = item_for(9, 0, -30);
    assert_eq!(occupied_end(&broken), at(9, 1));
    assert_eq!(occupied_end(&negative), at(9, 1));

    let placed = assign_tracks(&[broken, negative, item(9, 1)]);
    let tracks: Vec<usize> = placed.iter().map(|p| p.track).collect();
    // two one-minute items at 09:00 collide; 09:01 fits behind the first
    assert_eq!(tracks, vec![0, 1, 0]);
}

#[test]
fn end_time_comes_from_each_item() {
    let short = item_for(9, 0, 15);
    let placed = assign_tracks(&[short, item(9, 15)]);
    assert!(placed.iter().all(|p| p.track == 0));
}
