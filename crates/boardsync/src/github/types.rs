//! GitHub API data types shared across the client modules.

use std::collections::HashMap;

use serde::Deserialize;

/// Relay-style pagination info returned by GraphQL connections.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

/// A projectsV2 board as listed by the organization projects query.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectNode {
    /// GraphQL node id.
    pub id: String,
    /// Human-facing project number, used by per-project queries.
    pub number: i64,
    pub title: String,
    pub url: String,
    pub closed: bool,
}

/// Project linkage for one issue, produced by the project mapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRef {
    pub project_id: String,
    pub project_title: String,
}

/// Output of the project mapping phase.
///
/// `degraded` is set when the top-level projects query failed entirely;
/// the sync then proceeds without project linkage instead of aborting.
#[derive(Debug, Default)]
pub struct ProjectCatalog {
    /// Open projects, in listing order.
    pub projects: Vec<ProjectNode>,
    /// Issue node id -> owning project (last project wins on overlap).
    pub issue_projects: HashMap<String, ProjectRef>,
    pub degraded: bool,
    /// Per-project walk failures, already logged, kept for the summary.
    pub warnings: Vec<String>,
}

/// One normalized board field value, ready for persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardStatusRow {
    pub issue_node_id: String,
    pub project_id: String,
    pub item_id: String,
    pub field_id: String,
    pub field_name: String,
    pub value: String,
    /// Option color for single-select values; None for other types.
    pub color: Option<String>,
}
