pub mod board;
pub mod calendar;
pub mod config;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod search;
pub mod session;
pub mod store;
pub mod telemetry;
pub mod timeline;
pub mod work_item;
pub(crate) mod work_item_validation;

pub use board::{BoardError, BoardResult, WorkBoard};
pub use calendar::{CalendarError, DayCell, MonthEntry, MonthGrid, shift_month};
pub use config::{AppConfig, ConfigError};
pub use session::{Role, Session, SessionProvider, StaticSessionProvider};
#[cfg(feature = "sqlite")]
pub use store::SqliteWorkItemStore;
pub use store::{
    InMemoryWorkItemStore, NewWorkItem, StoreError, StoreResult, WorkItemFilter, WorkItemPatch,
    WorkItemStore, load_items_from_csv, load_items_from_json, save_items_to_csv,
    save_items_to_json, validate_items,
};
pub use timeline::{
    DayTimeline, Placed, PlacedWorkItem, SlotPlacement, TimeSpan, TimelineEntry, TimelineWindow,
    assign_tracks, track_count,
};
pub use work_item::{
    Attention, DEFAULT_DURATION_MINUTES, MAX_DURATION_MINUTES, WorkItem, WorkItemDraft, WorkItemId, WorkShift,
    WorkStatus,
};
pub use work_item_validation::WorkItemValidationError;
