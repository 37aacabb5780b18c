//! Dashboard read queries over the mirrored store.

use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::entity::issue::{Column, Entity as Issue, Model};
use crate::entity::project::UNASSIGNED;

use super::errors::Result;

/// Issues belonging to one project, newest assignment first.
///
/// The `UNASSIGNED` sentinel selects issues with no project linkage.
pub async fn find_by_project(db: &DatabaseConnection, project_title: &str) -> Result<Vec<Model>> {
    let query = if project_title == UNASSIGNED {
        Issue::find().filter(Column::ProjectId.is_null())
    } else {
        Issue::find().filter(Column::ProjectTitle.eq(project_title))
    };

    Ok(query.order_by_desc(Column::AssignedDate).all(db).await?)
}

/// Open-issue counts per assignee, alphabetical.
pub async fn count_by_assignee(db: &DatabaseConnection) -> Result<Vec<(String, i64)>> {
    Ok(Issue::find()
        .select_only()
        .column(Column::Assignee)
        .column_as(Column::NodeId.count(), "count")
        .filter(Column::State.eq("open"))
        .group_by(Column::Assignee)
        .order_by_asc(Column::Assignee)
        .into_tuple::<(String, i64)>()
        .all(db)
        .await?)
}
