use parking_lot::RwLock;
use uuid::Uuid;

use super::{
    NewWorkItem, StoreError, StoreResult, WorkItemFilter, WorkItemPatch, WorkItemStore, now_local,
    validate_items, validate_row,
};
use crate::work_item::{WorkItem, WorkItemId};

#[derive(Debug, Default)]
pub struct InMemoryWorkItemStore {
    items: RwLock<Vec<WorkItem>>,
}

impl InMemoryWorkItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: Vec<WorkItem>) -> StoreResult<Self> {
        validate_items(&items)?;
        Ok(Self {
            items: RwLock::new(items),
        })
    }

    /// Swaps the whole contents, e.g. after loading a file.
    pub fn replace_all(&self, items: Vec<WorkItem>) -> StoreResult<()> {
        validate_items(&items)?;
        *self.items.write() = items;
        Ok(())
    }

    pub fn snapshot(&self) -> Vec<WorkItem> {
        self.items.read().clone()
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }
}

impl WorkItemStore for InMemoryWorkItemStore {
    fn list(&self, filter: &WorkItemFilter) -> StoreResult<Vec<WorkItem>> {
        let mut items: Vec<WorkItem> = self
            .items
            .read()
            .iter()
            .filter(|item| filter.matches(item))
            .cloned()
            .collect();
        items.sort_by_key(|item| item.start_time);
        Ok(items)
    }

    fn get(&self, id: WorkItemId) -> StoreResult<Option<WorkItem>> {
        Ok(self.items.read().iter().find(|item| item.id == id).cloned())
    }

    fn insert(&self, fields: NewWorkItem) -> StoreResult<WorkItem> {
        let item = fields.into_item(Uuid::new_v4(), now_local());
        validate_row(&item)?;
        self.items.write().push(item.clone());
        Ok(item)
    }

    fn update(&self, id: WorkItemId, fields: WorkItemPatch) -> StoreResult<()> {
        let mut items = self.items.write();
        let slot = items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(StoreError::NotFound(id))?;
        let mut updated = slot.clone();
        fields.apply(&mut updated);
        validate_row(&updated)?;
        *slot = updated;
        Ok(())
    }
}
