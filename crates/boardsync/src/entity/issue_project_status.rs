//! Board field value for an issue on a project, written by the
//! board-status import pass.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "issue_project_status")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub node_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub project_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub field_id: String,
    pub field_name: String,
    /// Normalized field value (text, option name, number, or date).
    pub value: String,
    /// Option color for single-select fields; NULL for other types.
    pub color: Option<String>,
    /// Project item id the value was read from.
    pub item_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
