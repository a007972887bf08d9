//! Day timeline layout: lane assignment and slot quantization.

pub mod day;
pub mod slots;
pub mod tracks;

pub use day::{DayTimeline, TimelineEntry};
pub use slots::{HourLabel, SlotPlacement, TimelineWindow};
pub use tracks::{Placed, PlacedWorkItem, TimeSpan, assign_tracks, occupied_end, track_count};
