//! GitHub API access: REST issue feed, GraphQL projects and boards.

pub mod board;
pub mod client;
pub mod error;
pub mod pagination;
pub mod projects;
pub mod types;

pub use board::fetch_board_rows;
pub use client::{ClientConfig, DEFAULT_API_BASE, GitHubClient};
pub use error::{GitHubError, short_error_message};
pub use pagination::{MAX_PAGES, Page, walk_cursor_with};
pub use projects::{fetch_project_catalog, fetch_projects};
pub use types::{BoardStatusRow, PageInfo, ProjectCatalog, ProjectNode, ProjectRef};
