//! Issue and tag persistence.

use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter};

use crate::entity::issue::{ActiveModel, Column, Entity as Issue, Model};
use crate::entity::issue_tag;

use super::errors::Result;

/// Conflict clause for the idempotent issue upsert, keyed on node_id.
pub(crate) fn issue_upsert_on_conflict() -> OnConflict {
    OnConflict::column(Column::NodeId)
        .update_columns([
            Column::ExternalId,
            Column::Title,
            Column::Url,
            Column::Repo,
            Column::RepoUrl,
            Column::Assignee,
            Column::State,
            Column::AssignedDate,
            Column::ClosedAt,
            Column::LastUpdatedAt,
            Column::ProjectId,
            Column::ProjectTitle,
            Column::RawJson,
        ])
        .to_owned()
}

/// Insert or update one issue by node id.
///
/// Re-running a sync replays the same node ids; the conflict clause
/// makes that a refresh instead of a constraint error.
pub async fn upsert<C: ConnectionTrait>(db: &C, model: ActiveModel) -> Result<()> {
    Issue::insert(model)
        .on_conflict(issue_upsert_on_conflict())
        .exec_without_returning(db)
        .await?;
    Ok(())
}

/// Insert or refresh label rows for issues. Returns rows written.
pub async fn upsert_tags<C: ConnectionTrait>(
    db: &C,
    models: Vec<issue_tag::ActiveModel>,
) -> Result<u64> {
    if models.is_empty() {
        return Ok(0);
    }
    let written = issue_tag::Entity::insert_many(models)
        .on_conflict(
            OnConflict::columns([issue_tag::Column::NodeId, issue_tag::Column::Tag])
                .update_column(issue_tag::Column::Color)
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(written)
}

/// Delete every issue and tag row. Used by the truncate-and-reload
/// phase of a full sync.
pub async fn clear<C: ConnectionTrait>(db: &C) -> Result<()> {
    issue_tag::Entity::delete_many().exec(db).await?;
    Issue::delete_many().exec(db).await?;
    Ok(())
}

/// Find an issue by its node id.
pub async fn find_by_node_id<C: ConnectionTrait>(db: &C, node_id: &str) -> Result<Option<Model>> {
    Ok(Issue::find_by_id(node_id).one(db).await?)
}

/// Whether an issue with this node id is mirrored.
pub async fn exists<C: ConnectionTrait>(db: &C, node_id: &str) -> Result<bool> {
    Ok(Issue::find_by_id(node_id).count(db).await? > 0)
}

/// Count issues with no project linkage.
pub async fn count_unassigned<C: ConnectionTrait>(db: &C) -> Result<u64> {
    Ok(Issue::find()
        .filter(Column::ProjectId.is_null())
        .count(db)
        .await?)
}

/// Total mirrored issues.
pub async fn count<C: ConnectionTrait>(db: &C) -> Result<u64> {
    Ok(Issue::find().count(db).await?)
}
