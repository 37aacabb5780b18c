//! Shared sync types and constants.

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::github::GitHubError;
use crate::repository::RepositoryError;

/// Page size requested from the REST issue feed.
pub const REST_PAGE_SIZE: u32 = 99;

/// State machine of a sync run.
///
/// A run moves Idle -> Running -> Succeeded or Failed; the engine
/// rejects a second run while one is Running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Idle,
    Running,
    Succeeded,
    Failed,
}

impl RunState {
    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Running,
            2 => Self::Succeeded,
            3 => Self::Failed,
            _ => Self::Idle,
        }
    }

    pub(crate) fn as_u8(self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::Running => 1,
            Self::Succeeded => 2,
            Self::Failed => 3,
        }
    }
}

/// Options for a sync run.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// REST page size.
    pub per_page: u32,
    /// Safety ceiling on pages per walk (REST and GraphQL alike).
    pub page_limit: u32,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            per_page: REST_PAGE_SIZE,
            page_limit: crate::github::MAX_PAGES,
        }
    }
}

/// Structured result of a full sync run.
///
/// Failures are folded in as strings; callers never see a raw panic or
/// an unwrapped transport error.
#[derive(Debug, Default)]
pub struct SyncSummary {
    pub state: RunState,
    /// Open projects written (excluding the UNASSIGNED rollup).
    pub projects: usize,
    pub issues_saved: usize,
    pub pull_requests_skipped: usize,
    pub issues_errored: usize,
    /// REST pages that failed past the first and were skipped.
    pub pages_errored: usize,
    pub tags_saved: u64,
    /// Issues with no project linkage, rolled into UNASSIGNED.
    pub unassigned: u64,
    /// Set when the project map could not be fetched at all.
    pub degraded: bool,
    /// Non-fatal degradations: skipped pages, bad issue rows, a missing
    /// project map. The run still counts as succeeded.
    pub warnings: Vec<String>,
    /// Set only when the run aborted; non-empty exactly when `state` is
    /// [`RunState::Failed`].
    pub errors: Vec<String>,
    pub started_at: Option<NaiveDateTime>,
    pub finished_at: Option<NaiveDateTime>,
}

/// Structured result of a board-status import run.
#[derive(Debug, Default)]
pub struct BoardSummary {
    pub state: RunState,
    pub projects_processed: usize,
    pub rows_written: u64,
    /// Board items whose issue is not in the mirror.
    pub missing_issues: usize,
    /// Per-project failures that were isolated and skipped.
    pub warnings: Vec<String>,
    /// Set only when the import aborted; non-empty exactly when `state`
    /// is [`RunState::Failed`].
    pub errors: Vec<String>,
    pub started_at: Option<NaiveDateTime>,
    pub finished_at: Option<NaiveDateTime>,
}

/// Errors that abort a run before or while it executes.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The run-level mutex is held by another run.
    #[error("a synchronization run is already in progress")]
    AlreadyRunning,

    #[error(transparent)]
    GitHub(#[from] GitHubError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
