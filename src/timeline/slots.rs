use chrono::{Duration, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};

use super::tracks::{TimeSpan, occupied_end};
use crate::config::ConfigError;

/// Visible part of a day and the width of one grid column.
///
/// Only constructed through [`TimelineWindow::new`] or deserialization, both of
/// which validate, so `slot_minutes` is never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimelineWindow {
    start_hour: u32,
    end_hour: u32,
    slot_minutes: u32,
}

impl<'de> Deserialize<'de> for TimelineWindow {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Fields {
            start_hour: u32,
            end_hour: u32,
            slot_minutes: u32,
        }

        let fields = Fields::deserialize(deserializer)?;
        TimelineWindow::new(fields.start_hour, fields.end_hour, fields.slot_minutes)
            .map_err(serde::de::Error::custom)
    }
}

impl Default for TimelineWindow {
    fn default() -> Self {
        Self {
            start_hour: 8,
            end_hour: 20,
            slot_minutes: 30,
        }
    }
}

/// Column position of an item on the slot grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotPlacement {
    pub slot_start: u32,
    pub slot_span: u32,
}

impl SlotPlacement {
    pub fn slot_end(&self) -> u32 {
        self.slot_start + self.slot_span
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourLabel {
    pub slot: u32,
    pub label: String,
}

impl TimelineWindow {
    pub fn new(start_hour: u32, end_hour: u32, slot_minutes: u32) -> Result<Self, ConfigError> {
        let window = Self {
            start_hour,
            end_hour,
            slot_minutes,
        };
        window.validate()?;
        Ok(window)
    }

    pub fn start_hour(&self) -> u32 {
        self.start_hour
    }

    pub fn end_hour(&self) -> u32 {
        self.end_hour
    }

    pub fn slot_minutes(&self) -> u32 {
        self.slot_minutes
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.end_hour > 24 {
            return Err(ConfigError::InvalidWindow(format!(
                "end_hour {} is past midnight",
                self.end_hour
            )));
        }
        if self.start_hour >= self.end_hour {
            return Err(ConfigError::InvalidWindow(format!(
                "start_hour {} must be before end_hour {}",
                self.start_hour, self.end_hour
            )));
        }
        if self.slot_minutes == 0 {
            return Err(ConfigError::InvalidWindow(
                "slot_minutes must be positive".to_string(),
            ));
        }
        Ok(())
    }

    fn window_minutes(&self) -> u32 {
        (self.end_hour - self.start_hour) * 60
    }

    /// Columns needed to cover the window; a trailing partial slot counts.
    pub fn total_slots(&self) -> u32 {
        self.window_minutes().div_ceil(self.slot_minutes)
    }

    /// Maps `[start, end)` onto the grid of the day `start` falls on.
    ///
    /// The interval is clipped to the window first. Returns `None` when nothing
    /// of it is visible. Spans round up so short items keep at least one column.
    pub fn place(&self, start: NaiveDateTime, end: NaiveDateTime) -> Option<SlotPlacement> {
        let midnight = start.date().and_time(NaiveTime::MIN);
        let window_start = midnight + Duration::hours(i64::from(self.start_hour));
        let window_end = midnight + Duration::hours(i64::from(self.end_hour));

        let clipped_start = start.max(window_start);
        let clipped_end = end.min(window_end);
        let duration_secs = (clipped_end - clipped_start).num_seconds();
        if duration_secs <= 0 {
            return None;
        }

        let slot_secs = i64::from(self.slot_minutes) * 60;
        let offset_secs = (clipped_start - window_start).num_seconds();
        let slot_start = offset_secs / slot_secs;
        let slot_span = ((duration_secs + slot_secs - 1) / slot_secs).max(1);

        Some(SlotPlacement {
            slot_start: u32::try_from(slot_start).ok()?,
            slot_span: u32::try_from(slot_span).ok()?,
        })
    }

    /// Like [`TimelineWindow::place`], using the interval the item occupies on its lane.
    pub fn place_item<T: TimeSpan>(&self, item: &T) -> Option<SlotPlacement> {
        self.place(item.start_time(), occupied_end(item))
    }

    pub fn hour_labels(&self) -> Vec<HourLabel> {
        (self.start_hour..self.end_hour)
            .map(|hour| HourLabel {
                slot: (hour - self.start_hour) * 60 / self.slot_minutes,
                label: format!("{hour:02}:00"),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_trailing_slot_is_counted() {
        let window = TimelineWindow::new(8, 9, 45).unwrap();
        assert_eq!(window.total_slots(), 2);
    }

    #[test]
    fn hour_labels_skip_half_hours() {
        let labels = TimelineWindow::default().hour_labels();
        assert_eq!(labels.len(), 12);
        assert_eq!(labels[0].label, "08:00");
        assert_eq!(labels[1].slot, 2);
        assert_eq!(labels[11].label, "19:00");
        assert_eq!(labels[11].slot, 22);
    }

    #[test]
    fn deserializing_validates_the_window() {
        let zero = serde_json::from_str::<TimelineWindow>(
            r#"{"start_hour": 8, "end_hour": 20, "slot_minutes": 0}"#,
        );
        assert!(zero.unwrap_err().to_string().contains("slot_minutes must be positive"));
        assert!(TimelineWindow::new(20, 8, 30).is_err());

        let ok: TimelineWindow =
            serde_json::from_str(r#"{"start_hour": 6, "end_hour": 22, "slot_minutes": 15}"#).unwrap();
        assert_eq!(ok.total_slots(), 64);
    }
}
