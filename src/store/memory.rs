use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use super::{ensure_value, ItemStore};
use crate::error::AppError;
use crate::model::{Item, ItemStatus};

/// Non-persistent store for targets without a database. Ids still start at 1
/// and are never handed out twice within one instance.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

struct MemoryState {
    items: BTreeMap<i64, Item>,
    next_id: i64,
}

impl Default for MemoryState {
    fn default() -> Self {
        Self {
            items: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ItemStore for MemoryStore {
    async fn initialize(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn add(&self, value: &str) -> Result<Item, AppError> {
        ensure_value(value)?;

        let mut state = self.state.lock().await;
        let id = state.next_id;
        state.next_id += 1;
        let item = Item {
            id,
            done: false,
            value: value.to_string(),
        };
        state.items.insert(id, item.clone());
        debug!(id, total = state.items.len(), "item added");
        Ok(item)
    }

    async fn list_by_status(&self, status: ItemStatus) -> Result<Vec<Item>, AppError> {
        let state = self.state.lock().await;
        Ok(state
            .items
            .values()
            .filter(|item| item.done == status.is_done())
            .cloned()
            .collect())
    }

    async fn mark_done(&self, id: i64) -> Result<bool, AppError> {
        let mut state = self.state.lock().await;
        let changed = match state.items.get_mut(&id) {
            Some(item) if !item.done => {
                item.done = true;
                true
            }
            _ => false,
        };
        debug!(id, changed, "mark done");
        Ok(changed)
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let removed = self.state.lock().await.items.remove(&id).is_some();
        debug!(id, removed, "delete");
        Ok(removed)
    }

    async fn close(&self) -> Result<(), AppError> {
        Ok(())
    }
}
