//! Dashboard pin management.

use chrono::NaiveDateTime;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::entity::pin::{ActiveModel, Column, Entity as Pin, Model};

use super::errors::Result;

/// Pin an issue. Re-pinning a soft-deleted pin revives it and keeps
/// the original creation timestamp.
pub async fn pin(db: &DatabaseConnection, node_id: &str, now: NaiveDateTime) -> Result<()> {
    Pin::insert(ActiveModel {
        node_id: Set(node_id.to_string()),
        deleted: Set(false),
        created_at: Set(now),
    })
    .on_conflict(
        OnConflict::column(Column::NodeId)
            .update_column(Column::Deleted)
            .to_owned(),
    )
    .exec_without_returning(db)
    .await?;
    Ok(())
}

/// Unpin an issue (soft delete). Returns true if a pin existed.
pub async fn unpin(db: &DatabaseConnection, node_id: &str) -> Result<bool> {
    let result = Pin::update_many()
        .col_expr(Column::Deleted, Expr::value(true))
        .filter(Column::NodeId.eq(node_id))
        .filter(Column::Deleted.eq(false))
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}

/// All live pins.
pub async fn list(db: &DatabaseConnection) -> Result<Vec<Model>> {
    Ok(Pin::find().filter(Column::Deleted.eq(false)).all(db).await?)
}
