//! Boardsync - a GitHub issue dashboard mirror.
//!
//! This library keeps a local relational mirror of an organization's
//! issues, labels, project boards, and board field values, and offers
//! a tag-filter query layer over the mirror for dashboard views.
//!
//! # Features
//!
//! - `migrate` - Enables database migration support. When enabled, you
//!   can use [`connect_and_migrate`] to automatically run migrations on
//!   connection.
//!
//! # Example
//!
//! ```ignore
//! use boardsync::{ClientConfig, GitHubClient, SyncEngine, connect_and_migrate};
//!
//! let db = connect_and_migrate("sqlite://boardsync.db?mode=rwc").await?;
//! let client = GitHubClient::new(ClientConfig::new(token, "acme", "boardsync"))?;
//!
//! let engine = SyncEngine::new(db, client);
//! let summary = engine.run_full(None).await?;
//! println!("saved {} issues", summary.issues_saved);
//! ```

pub mod db;
pub mod entity;
pub mod github;
pub mod repository;
pub mod sync;

#[cfg(feature = "migrate")]
pub mod migration;

pub use db::connect;
#[cfg(feature = "migrate")]
pub use db::connect_and_migrate;
pub use entity::prelude::*;
pub use github::{ClientConfig, GitHubClient, GitHubError};
pub use repository::{FilteredIssue, IssueFilter, RepositoryError, StateFilter};
pub use sync::{
    BoardSummary, IssueSource, RunState, SyncEngine, SyncError, SyncOptions, SyncProgress,
    SyncSummary,
};
