//! Board-status row persistence.

use sea_orm::{ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};

use crate::entity::issue_project_status::{ActiveModel, Column, Entity as IssueProjectStatus, Model};

use super::errors::Result;

/// Delete every board-status row.
pub async fn clear(db: &DatabaseConnection) -> Result<()> {
    IssueProjectStatus::delete_many().exec(db).await?;
    Ok(())
}

/// Replace the rows for one (issue, project) pair.
///
/// Delete-then-insert keeps the operation idempotent even when the
/// import is re-run against a table that was not cleared first.
pub async fn replace_for_issue_project<C: ConnectionTrait>(
    db: &C,
    node_id: &str,
    project_id: &str,
    models: Vec<ActiveModel>,
) -> Result<u64> {
    IssueProjectStatus::delete_many()
        .filter(Column::NodeId.eq(node_id))
        .filter(Column::ProjectId.eq(project_id))
        .exec(db)
        .await?;

    if models.is_empty() {
        return Ok(0);
    }
    let written = IssueProjectStatus::insert_many(models)
        .exec_without_returning(db)
        .await?;
    Ok(written)
}

/// Board-status rows for one issue.
pub async fn find_by_issue(db: &DatabaseConnection, node_id: &str) -> Result<Vec<Model>> {
    Ok(IssueProjectStatus::find()
        .filter(Column::NodeId.eq(node_id))
        .all(db)
        .await?)
}

/// Total board-status rows.
pub async fn count(db: &DatabaseConnection) -> Result<u64> {
    Ok(IssueProjectStatus::find().count(db).await?)
}
