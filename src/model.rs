use serde::{Deserialize, Serialize};

use crate::entities::item;
use crate::error::AppError;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Pending,
    Done,
}

impl ItemStatus {
    pub fn from_done(done: bool) -> Self {
        if done {
            Self::Done
        } else {
            Self::Pending
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Done => "done",
        }
    }
}

/// A single to-do entry as seen by everything above the storage layer.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub done: bool,
    pub value: String,
}

impl Item {
    pub fn status(&self) -> ItemStatus {
        ItemStatus::from_done(self.done)
    }
}

impl TryFrom<item::Model> for Item {
    type Error = AppError;

    fn try_from(row: item::Model) -> Result<Self, Self::Error> {
        let value = row
            .value
            .filter(|value| !value.is_empty())
            .ok_or_else(|| AppError::Decode(format!("item id {} has no text", row.id)))?;
        Ok(Self {
            id: row.id,
            done: row.done.unwrap_or(0) != 0,
            value,
        })
    }
}
