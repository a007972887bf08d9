use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use super::slots::{HourLabel, SlotPlacement, TimelineWindow};
use super::tracks::{assign_tracks, track_count};
use crate::work_item::{Attention, WorkItem};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEntry {
    #[serde(flatten)]
    pub item: WorkItem,
    pub track: usize,
    /// `None` when the item falls entirely outside the visible window.
    pub placement: Option<SlotPlacement>,
    pub attention: Attention,
}

/// Everything needed to draw one day as lanes over a slot grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayTimeline {
    pub date: NaiveDate,
    pub window: TimelineWindow,
    pub total_slots: u32,
    pub track_count: usize,
    pub hour_labels: Vec<HourLabel>,
    pub entries: Vec<TimelineEntry>,
}

impl DayTimeline {
    /// Lays out the items starting on `date`; others in `items` are ignored.
    pub fn build(
        date: NaiveDate,
        items: &[WorkItem],
        window: &TimelineWindow,
        now: NaiveDateTime,
    ) -> Self {
        let day_items: Vec<WorkItem> = items
            .iter()
            .filter(|item| item.date() == date)
            .cloned()
            .collect();
        let placed = assign_tracks(&day_items);
        let tracks = track_count(&placed);

        let entries = placed
            .into_iter()
            .map(|placed| {
                let placement = window.place_item(&placed.item);
                let attention = placed.item.attention(now);
                TimelineEntry {
                    item: placed.item,
                    track: placed.track,
                    placement,
                    attention,
                }
            })
            .collect();

        Self {
            date,
            window: *window,
            total_slots: window.total_slots(),
            track_count: tracks,
            hour_labels: window.hour_labels(),
            entries,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn track_entries(&self, track: usize) -> impl Iterator<Item = &TimelineEntry> {
        self.entries.iter().filter(move |entry| entry.track == track)
    }

    pub fn visible_entries(&self) -> impl Iterator<Item = (&TimelineEntry, SlotPlacement)> {
        self.entries
            .iter()
            .filter_map(|entry| entry.placement.map(|placement| (entry, placement)))
    }
}
