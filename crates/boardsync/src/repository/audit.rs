//! Audit trail access.

use chrono::NaiveDateTime;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::entity::audit_run::{ActiveModel, Column, Entity as AuditRun, Model};

use super::errors::Result;

/// Append an audit row for a completed run.
pub async fn record(
    db: &DatabaseConnection,
    action: &str,
    start_time: NaiveDateTime,
    end_time: NaiveDateTime,
) -> Result<()> {
    ActiveModel {
        action: Set(action.to_string()),
        start_time: Set(start_time),
        end_time: Set(end_time),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(())
}

/// Most recent audit row for an action, if any run was recorded.
pub async fn last_run(db: &DatabaseConnection, action: &str) -> Result<Option<Model>> {
    Ok(AuditRun::find()
        .filter(Column::Action.eq(action))
        .order_by_desc(Column::EndTime)
        .order_by_desc(Column::Id)
        .one(db)
        .await?)
}
