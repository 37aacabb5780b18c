//! GitHub project board, plus the synthetic `UNASSIGNED` rollup row.

use sea_orm::entity::prelude::*;

/// Sentinel id/title used for the rollup row of issues that belong to
/// no project board.
pub const UNASSIGNED: &str = "UNASSIGNED";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "project")]
pub struct Model {
    /// GraphQL node id of the project, or [`UNASSIGNED`].
    #[sea_orm(primary_key, auto_increment = false)]
    pub external_id: String,
    pub title: String,
    pub url: String,
    pub closed: bool,
    /// Number of mirrored issues mapped to this project.
    pub issue_count: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
