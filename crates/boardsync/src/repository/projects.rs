//! Project row persistence.

use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};

use crate::entity::project::{ActiveModel, Column, Entity as Project, Model};

use super::errors::Result;

/// Delete every project row.
pub async fn clear(db: &DatabaseConnection) -> Result<()> {
    Project::delete_many().exec(db).await?;
    Ok(())
}

/// Insert project rows in bulk.
pub async fn insert_many(db: &DatabaseConnection, models: Vec<ActiveModel>) -> Result<()> {
    if models.is_empty() {
        return Ok(());
    }
    Project::insert_many(models).exec_without_returning(db).await?;
    Ok(())
}

/// Insert or refresh one project row by external id.
///
/// Used for the synthetic `UNASSIGNED` rollup, which is rewritten at
/// the end of every sync.
pub async fn upsert(db: &DatabaseConnection, model: ActiveModel) -> Result<()> {
    Project::insert(model)
        .on_conflict(
            OnConflict::column(Column::ExternalId)
                .update_columns([
                    Column::Title,
                    Column::Url,
                    Column::Closed,
                    Column::IssueCount,
                ])
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(())
}

/// All project rows, ordered by title.
pub async fn list(db: &DatabaseConnection) -> Result<Vec<Model>> {
    Ok(Project::find().order_by_asc(Column::Title).all(db).await?)
}
