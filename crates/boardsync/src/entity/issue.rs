//! Mirrored GitHub issue.
//!
//! One row per issue fetched from the organization's REST issue feed.
//! The GraphQL node id is the natural primary key; the full API payload
//! is retained in `raw_json` so new columns can be backfilled without
//! another crawl.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "issues")]
pub struct Model {
    /// GraphQL node id (stable across renames and transfers).
    #[sea_orm(primary_key, auto_increment = false)]
    pub node_id: String,
    /// Numeric REST id.
    pub external_id: i64,
    pub title: String,
    /// HTML URL of the issue.
    pub url: String,
    /// Repository name the issue belongs to.
    pub repo: String,
    /// HTML URL of the repository.
    pub repo_url: String,
    /// First assignee login, or the `UNASSIGNED` sentinel.
    pub assignee: String,
    /// Issue state as reported by the REST API (`open` / `closed`).
    pub state: String,
    /// Date the issue was opened.
    pub assigned_date: Option<Date>,
    /// Date the issue was closed, if it is closed.
    pub closed_at: Option<Date>,
    pub last_updated_at: Option<DateTime>,
    /// Owning project board (node id), from the project mapper.
    pub project_id: Option<String>,
    pub project_title: Option<String>,
    /// Full REST payload as returned by the API.
    pub raw_json: Json,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::issue_tag::Entity")]
    IssueTag,
}

impl Related<super::issue_tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::IssueTag.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
