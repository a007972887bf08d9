use super::record::WorkItemRecord;
use super::{StoreResult, validate_items};
use crate::work_item::WorkItem;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use tracing::info;

const SNAPSHOT_VERSION: u32 = 1;

fn snapshot_version() -> u32 {
    SNAPSHOT_VERSION
}

#[derive(Serialize, Deserialize)]
struct WorkItemSnapshot {
    #[serde(default = "snapshot_version")]
    version: u32,
    items: Vec<WorkItem>,
}

pub fn save_items_to_json<P: AsRef<Path>>(items: &[WorkItem], path: P) -> StoreResult<()> {
    validate_items(items)?;
    let snapshot = WorkItemSnapshot {
        version: SNAPSHOT_VERSION,
        items: items.to_vec(),
    };
    let file = File::create(path.as_ref())?;
    serde_json::to_writer_pretty(file, &snapshot)?;
    info!(count = items.len(), path = %path.as_ref().display(), "exported work items to json");
    Ok(())
}

pub fn load_items_from_json<P: AsRef<Path>>(path: P) -> StoreResult<Vec<WorkItem>> {
    let file = File::open(path.as_ref())?;
    let snapshot: WorkItemSnapshot = serde_json::from_reader(file)?;
    validate_items(&snapshot.items)?;
    info!(count = snapshot.items.len(), path = %path.as_ref().display(), "imported work items from json");
    Ok(snapshot.items)
}

pub fn save_items_to_csv<P: AsRef<Path>>(items: &[WorkItem], path: P) -> StoreResult<()> {
    validate_items(items)?;
    let mut writer = csv::Writer::from_path(path.as_ref())?;
    for item in items {
        writer.serialize(WorkItemRecord::from(item))?;
    }
    writer.flush()?;
    info!(count = items.len(), path = %path.as_ref().display(), "exported work items to csv");
    Ok(())
}

pub fn load_items_from_csv<P: AsRef<Path>>(path: P) -> StoreResult<Vec<WorkItem>> {
    let mut reader = csv::Reader::from_path(path.as_ref())?;
    let mut items = Vec::new();
    for record in reader.deserialize::<WorkItemRecord>() {
        items.push(WorkItem::try_from(record?)?);
    }
    validate_items(&items)?;
    info!(count = items.len(), path = %path.as_ref().display(), "imported work items from csv");
    Ok(items)
}
