use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::work_item::WorkItem;

/// Anything that occupies a half-open `[start, end)` stretch of time.
pub trait TimeSpan {
    fn start_time(&self) -> NaiveDateTime;
    fn end_time(&self) -> NaiveDateTime;
}

/// An item annotated with the display lane it was assigned to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placed<T> {
    #[serde(flatten)]
    pub item: T,
    pub track: usize,
}

pub type PlacedWorkItem = Placed<WorkItem>;

/// End of the interval an item actually occupies on its lane.
///
/// Items whose end is not after their start are treated as one minute long so
/// they still claim a lane and stay visible.
pub fn occupied_end<T: TimeSpan>(item: &T) -> NaiveDateTime {
    let start = item.start_time();
    let end = item.end_time();
    if end > start {
        end
    } else {
        start
            .checked_add_signed(Duration::minutes(1))
            .unwrap_or(start)
    }
}

/// Greedy interval partitioning.
///
/// Items are visited in start order (stable, so equal starts keep their input
/// order) and each goes to the lowest-indexed lane that is free by the time it
/// starts; a new lane is opened only when none is. This uses the minimum
/// number of lanes, equal to the peak number of simultaneously running items.
pub fn assign_tracks<T: TimeSpan + Clone>(items: &[T]) -> Vec<Placed<T>> {
    let mut order: Vec<&T> = items.iter().collect();
    order.sort_by_key(|item| item.start_time());

    // last occupied end per lane, indexed by lane number
    let mut lane_ends: Vec<NaiveDateTime> = Vec::new();
    let mut placed = Vec::with_capacity(order.len());

    for item in order {
        let start = item.start_time();
        let end = occupied_end(item);
        let track = match lane_ends.iter().position(|last_end| *last_end <= start) {
            Some(track) => {
                lane_ends[track] = end;
                track
            }
            None => {
                lane_ends.push(end);
                lane_ends.len() - 1
            }
        };
        placed.push(Placed {
            item: item.clone(),
            track,
        });
    }

    placed
}

/// Number of lanes a layout needs; never zero so an empty day still has a row.
pub fn track_count<T>(placed: &[Placed<T>]) -> usize {
    placed
        .iter()
        .map(|entry| entry.track + 1)
        .max()
        .unwrap_or(1)
}
