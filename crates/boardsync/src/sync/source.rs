//! The upstream issue source abstraction.

use async_trait::async_trait;

use crate::github::{
    BoardStatusRow, GitHubClient, GitHubError, ProjectCatalog, ProjectNode, fetch_board_rows,
    fetch_project_catalog, fetch_projects,
};

/// Upstream source of issues, projects, and board data.
///
/// The engine is generic over this trait so tests can drive a full run
/// from canned data without a network.
#[async_trait]
pub trait IssueSource: Send + Sync {
    /// Organization login the source is scoped to.
    fn org(&self) -> &str;

    /// List the organization's projects, open and closed alike.
    async fn projects(&self) -> Result<Vec<ProjectNode>, GitHubError>;

    /// Build the issue -> project map across all open projects.
    ///
    /// Infallible by contract: listing failures degrade the catalog
    /// instead of aborting the sync.
    async fn project_catalog(&self, page_limit: u32) -> ProjectCatalog;

    /// One page of the organization issue feed (1-indexed).
    async fn issues_page(
        &self,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<serde_json::Value>, GitHubError>;

    /// Normalized board field values for one project.
    async fn board_rows(
        &self,
        project: &ProjectNode,
        page_limit: u32,
    ) -> Result<Vec<BoardStatusRow>, GitHubError>;
}

#[async_trait]
impl IssueSource for GitHubClient {
    fn org(&self) -> &str {
        GitHubClient::org(self)
    }

    async fn projects(&self) -> Result<Vec<ProjectNode>, GitHubError> {
        fetch_projects(self).await
    }

    async fn project_catalog(&self, page_limit: u32) -> ProjectCatalog {
        fetch_project_catalog(self, page_limit).await
    }

    async fn issues_page(
        &self,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<serde_json::Value>, GitHubError> {
        GitHubClient::issues_page(self, page, per_page).await
    }

    async fn board_rows(
        &self,
        project: &ProjectNode,
        page_limit: u32,
    ) -> Result<Vec<BoardStatusRow>, GitHubError> {
        fetch_board_rows(self, project, page_limit).await
    }
}
