//! Item storage.
//!
//! Everything above this module talks to an [`ItemStore`] and never learns
//! which variant backs it: [`SqliteStore`] persists to a local database,
//! [`MemoryStore`] keeps items for the lifetime of the process only.

mod memory;
mod sqlite;

use async_trait::async_trait;

use crate::error::AppError;
use crate::model::{Item, ItemStatus};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Creates the item table when missing. Safe to call on every start.
    async fn initialize(&self) -> Result<(), AppError>;

    /// Inserts a pending item. Empty text is rejected with
    /// [`AppError::InvalidInput`] before storage is touched.
    async fn add(&self, value: &str) -> Result<Item, AppError>;

    /// Items in one partition, ordered by id.
    async fn list_by_status(&self, status: ItemStatus) -> Result<Vec<Item>, AppError>;

    /// Returns `false` when no pending item has this id.
    async fn mark_done(&self, id: i64) -> Result<bool, AppError>;

    /// Returns `false` when no item has this id.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;

    async fn close(&self) -> Result<(), AppError>;
}

pub(crate) fn ensure_value(value: &str) -> Result<(), AppError> {
    if value.is_empty() {
        return Err(AppError::InvalidInput(
            "item text cannot be empty".to_string(),
        ));
    }
    Ok(())
}
