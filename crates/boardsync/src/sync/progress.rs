//! Progress reporting for sync operations.

/// Progress events emitted during sync and board-import runs.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum SyncProgress {
    /// Starting the project mapping phase.
    MappingProjects {
        /// Organization being mapped.
        org: String,
    },

    /// Project map built (possibly degraded).
    ProjectMapReady {
        /// Open projects found.
        projects: usize,
        /// Issues linked to a project.
        mapped_issues: usize,
        /// True when the projects listing itself failed.
        degraded: bool,
    },

    /// Fetching one page of the REST issue feed.
    FetchingIssuePage {
        /// Page number (1-indexed).
        page: u32,
    },

    /// Fetched a page of issues.
    FetchedIssuePage {
        page: u32,
        /// Raw objects on this page (before the pull-request skip).
        count: usize,
        /// Running total of raw objects fetched.
        total_so_far: usize,
    },

    /// Issue ingest finished.
    IssuesPersisted {
        saved: usize,
        skipped_pull_requests: usize,
        errors: usize,
    },

    /// Writing project rows and the UNASSIGNED rollup.
    ReconcilingProjects {
        /// Project rows about to be written.
        projects: usize,
    },

    /// Starting the board walk for one project.
    BoardProjectStart { title: String },

    /// Finished the board walk for one project.
    BoardProjectDone {
        title: String,
        /// Normalized rows extracted.
        rows: usize,
    },

    /// Warning message (non-fatal).
    Warning { message: String },

    /// The run finished and its audit row was written.
    RunComplete { succeeded: bool },
}

/// Callback for progress updates.
pub type ProgressCallback = Box<dyn Fn(SyncProgress) + Send + Sync>;

/// Emit a progress event if a callback is provided.
#[inline]
pub fn emit(on_progress: Option<&ProgressCallback>, event: SyncProgress) {
    if let Some(cb) = on_progress {
        cb(event);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn emit_with_callback_invokes_it() {
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = Arc::clone(&count);

        let callback: ProgressCallback = Box::new(move |_event| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        emit(
            Some(&callback),
            SyncProgress::MappingProjects {
                org: "acme".to_string(),
            },
        );
        emit(
            Some(&callback),
            SyncProgress::RunComplete { succeeded: true },
        );

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn emit_without_callback_is_a_no_op() {
        emit(
            None,
            SyncProgress::FetchedIssuePage {
                page: 1,
                count: 99,
                total_so_far: 99,
            },
        );
    }

    #[test]
    fn events_are_debuggable() {
        let event = SyncProgress::BoardProjectDone {
            title: "Delivery".to_string(),
            rows: 42,
        };
        let debug = format!("{event:?}");
        assert!(debug.contains("Delivery"));
        assert!(debug.contains("42"));
    }
}
