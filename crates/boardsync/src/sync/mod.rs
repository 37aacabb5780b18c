//! Synchronization of the local mirror with the upstream tracker.

pub mod engine;
pub mod ingest;
pub mod progress;
pub mod source;
pub mod types;

pub use engine::SyncEngine;
pub use ingest::{IngestError, IssueBundle, UNASSIGNED_ASSIGNEE, convert_issue};
pub use progress::{ProgressCallback, SyncProgress};
pub use source::IssueSource;
pub use types::{
    BoardSummary, REST_PAGE_SIZE, RunState, SyncError, SyncOptions, SyncSummary,
};
