use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DatabaseTransaction, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::{debug, info};

use super::{ensure_value, ItemStore};
use crate::db;
use crate::entities::item;
use crate::error::AppError;
use crate::model::{Item, ItemStatus};

pub struct SqliteStore {
    db: DatabaseConnection,
}

impl SqliteStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ItemStore for SqliteStore {
    async fn initialize(&self) -> Result<(), AppError> {
        let txn = self.db.begin().await?;
        let result = db::ensure_schema(&txn).await;
        finalize_transaction(txn, result).await?;
        info!("item table ready");
        Ok(())
    }

    async fn add(&self, value: &str) -> Result<Item, AppError> {
        ensure_value(value)?;

        let txn = self.db.begin().await?;
        let result: Result<Item, AppError> = async {
            let active = item::ActiveModel {
                done: Set(Some(0)),
                value: Set(Some(value.to_string())),
                ..Default::default()
            };
            let insert = item::Entity::insert(active).exec(&txn).await?;
            let created = item::Entity::find_by_id(insert.last_insert_id)
                .one(&txn)
                .await?
                .ok_or_else(|| AppError::Decode("item not found after insert".to_string()))?;
            let total = item::Entity::find().count(&txn).await?;
            debug!(id = created.id, total, "item added");
            Item::try_from(created)
        }
        .await;

        finalize_transaction(txn, result).await
    }

    async fn list_by_status(&self, status: ItemStatus) -> Result<Vec<Item>, AppError> {
        let txn = self.db.begin().await?;
        let result: Result<Vec<Item>, AppError> = async {
            let rows = item::Entity::find()
                .filter(status_condition(status))
                .order_by_asc(item::Column::Id)
                .all(&txn)
                .await?;
            rows.into_iter().map(Item::try_from).collect::<Result<Vec<_>, _>>()
        }
        .await;

        let items = finalize_transaction(txn, result).await?;
        debug!(status = status.as_str(), count = items.len(), "listed");
        Ok(items)
    }

    async fn mark_done(&self, id: i64) -> Result<bool, AppError> {
        let txn = self.db.begin().await?;
        let result: Result<bool, AppError> = async {
            let update = item::Entity::update_many()
                .col_expr(item::Column::Done, Expr::value(1_i32))
                .filter(item::Column::Id.eq(id))
                .filter(status_condition(ItemStatus::Pending))
                .exec(&txn)
                .await?;
            Ok(update.rows_affected > 0)
        }
        .await;

        let changed = finalize_transaction(txn, result).await?;
        debug!(id, changed, "mark done");
        Ok(changed)
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let txn = self.db.begin().await?;
        let result: Result<bool, AppError> = async {
            let deleted = item::Entity::delete_by_id(id).exec(&txn).await?;
            Ok(deleted.rows_affected > 0)
        }
        .await;

        let removed = finalize_transaction(txn, result).await?;
        debug!(id, removed, "delete");
        Ok(removed)
    }

    async fn close(&self) -> Result<(), AppError> {
        self.db.clone().close().await?;
        Ok(())
    }
}

// Rows written by other tools may carry a NULL flag; those count as pending.
fn status_condition(status: ItemStatus) -> Condition {
    match status {
        ItemStatus::Done => Condition::all().add(item::Column::Done.ne(0)),
        ItemStatus::Pending => Condition::any()
            .add(item::Column::Done.eq(0))
            .add(item::Column::Done.is_null()),
    }
}

async fn finalize_transaction<T>(
    txn: DatabaseTransaction,
    result: Result<T, AppError>,
) -> Result<T, AppError> {
    match result {
        Ok(value) => {
            txn.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = txn.rollback().await {
                return Err(rollback_err.into());
            }
            Err(err)
        }
    }
}
