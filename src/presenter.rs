use tracing::debug;

use crate::error::AppError;
use crate::model::{Item, ItemStatus};
use crate::store::ItemStore;
use crate::util::{format_section, COMPLETED_HEADING, PENDING_HEADING};

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum Partition {
    #[default]
    Unloaded,
    Loaded(Vec<Item>),
}

impl Partition {
    pub fn items(&self) -> &[Item] {
        match self {
            Self::Unloaded => &[],
            Self::Loaded(items) => items,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SubmitOutcome {
    Added(Item),
    Rejected,
}

/// Two live views over a store, pending and completed. Every successful
/// mutation re-fetches both partitions; nothing is patched in place.
pub struct ListPresenter<'a> {
    store: &'a dyn ItemStore,
    pending: Partition,
    completed: Partition,
    generation: u64,
}

impl<'a> ListPresenter<'a> {
    pub fn new(store: &'a dyn ItemStore) -> Self {
        Self {
            store,
            pending: Partition::Unloaded,
            completed: Partition::Unloaded,
            generation: 0,
        }
    }

    pub fn pending(&self) -> &Partition {
        &self.pending
    }

    pub fn completed(&self) -> &Partition {
        &self.completed
    }

    /// Number of refreshes since construction.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Initial fetch for partitions that have never been loaded.
    pub async fn load(&mut self) -> Result<(), AppError> {
        if !self.pending.is_loaded() {
            self.pending = self.fetch(ItemStatus::Pending).await?;
        }
        if !self.completed.is_loaded() {
            self.completed = self.fetch(ItemStatus::Done).await?;
        }
        Ok(())
    }

    pub async fn refresh(&mut self) -> Result<(), AppError> {
        self.pending = self.fetch(ItemStatus::Pending).await?;
        self.completed = self.fetch(ItemStatus::Done).await?;
        self.generation += 1;
        debug!(
            generation = self.generation,
            pending = self.pending.items().len(),
            completed = self.completed.items().len(),
            "refreshed"
        );
        Ok(())
    }

    /// A missing or empty text is rejected by the store and leaves both
    /// partitions exactly as they were.
    pub async fn submit_new(&mut self, text: Option<&str>) -> Result<SubmitOutcome, AppError> {
        match self.store.add(text.unwrap_or_default()).await {
            Ok(item) => {
                self.refresh().await?;
                Ok(SubmitOutcome::Added(item))
            }
            Err(AppError::InvalidInput(reason)) => {
                debug!(%reason, "submit rejected");
                Ok(SubmitOutcome::Rejected)
            }
            Err(err) => Err(err),
        }
    }

    pub async fn complete(&mut self, id: i64) -> Result<bool, AppError> {
        let changed = self.store.mark_done(id).await?;
        self.refresh().await?;
        Ok(changed)
    }

    /// Same operation whichever section the item is shown in.
    pub async fn remove(&mut self, id: i64) -> Result<bool, AppError> {
        let removed = self.store.delete(id).await?;
        self.refresh().await?;
        Ok(removed)
    }

    pub fn render(&self) -> String {
        [
            format_section(PENDING_HEADING, self.pending.items()),
            format_section(COMPLETED_HEADING, self.completed.items()),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join("\n\n")
    }

    async fn fetch(&self, status: ItemStatus) -> Result<Partition, AppError> {
        Ok(Partition::Loaded(self.store.list_by_status(status).await?))
    }
}
