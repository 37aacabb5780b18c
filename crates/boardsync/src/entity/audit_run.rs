//! Audit trail of synchronization runs.

use sea_orm::entity::prelude::*;

/// Action recorded by the full issue sync.
pub const ACTION_RETRIEVE: &str = "RETRIEVE FROM GITHUB";
/// Action recorded by the board-status import.
pub const ACTION_BOARD_IMPORT: &str = "PROJECT_BOARD_STATUS_IMPORT";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "audit_run")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub action: String,
    pub start_time: DateTime,
    pub end_time: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
