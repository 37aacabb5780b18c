//! Progress reporting for sync operations.
//!
//! Two modes:
//! - Interactive mode (TTY): an animated spinner using indicatif
//! - Logging mode (non-TTY): structured logging using tracing

use std::sync::Arc;
use std::time::Duration;

use boardsync::sync::{ProgressCallback, SyncProgress};
use console::Term;
use indicatif::{ProgressBar, ProgressStyle};

/// Progress reporter that handles both interactive and logging modes.
pub enum ProgressReporter {
    /// Interactive spinner for TTY.
    Interactive(InteractiveReporter),
    /// Structured logging for non-TTY (CI, pipes, cron).
    Logging(LoggingReporter),
}

impl ProgressReporter {
    /// Create a new progress reporter, auto-detecting TTY mode.
    pub fn new() -> Self {
        if Term::stdout().is_term() {
            Self::Interactive(InteractiveReporter::new())
        } else {
            Self::Logging(LoggingReporter)
        }
    }

    /// Handle a progress event.
    pub fn handle(&self, event: SyncProgress) {
        match self {
            Self::Interactive(r) => r.handle(event),
            Self::Logging(r) => r.handle(event),
        }
    }

    /// Convert to a ProgressCallback for the library.
    pub fn as_callback(self: &Arc<Self>) -> ProgressCallback {
        let reporter = Arc::clone(self);
        Box::new(move |event| {
            reporter.handle(event);
        })
    }

    /// Finish the spinner (interactive mode only).
    pub fn finish(&self) {
        if let Self::Interactive(r) = self {
            r.finish();
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Spinner-based reporter for interactive terminals.
pub struct InteractiveReporter {
    bar: ProgressBar,
}

impl InteractiveReporter {
    fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    fn handle(&self, event: SyncProgress) {
        match event {
            SyncProgress::MappingProjects { org } => {
                self.bar.set_message(format!("Mapping projects for {org}..."));
            }
            SyncProgress::ProjectMapReady {
                projects,
                mapped_issues,
                degraded,
            } => {
                if degraded {
                    self.bar
                        .println("warning: project listing failed, continuing without linkage");
                }
                self.bar.set_message(format!(
                    "Mapped {mapped_issues} issues across {projects} projects"
                ));
            }
            SyncProgress::FetchingIssuePage { page } => {
                self.bar.set_message(format!("Fetching issue page {page}..."));
            }
            SyncProgress::FetchedIssuePage { total_so_far, .. } => {
                self.bar
                    .set_message(format!("Fetched {total_so_far} issues"));
            }
            SyncProgress::IssuesPersisted {
                saved,
                skipped_pull_requests,
                errors,
            } => {
                self.bar.set_message(format!(
                    "Saved {saved} issues ({skipped_pull_requests} pull requests skipped, {errors} errors)"
                ));
            }
            SyncProgress::ReconcilingProjects { projects } => {
                self.bar
                    .set_message(format!("Writing {projects} project rows..."));
            }
            SyncProgress::BoardProjectStart { title } => {
                self.bar.set_message(format!("Importing board '{title}'..."));
            }
            SyncProgress::BoardProjectDone { title, rows } => {
                self.bar
                    .println(format!("  {title}: {rows} board values"));
            }
            SyncProgress::Warning { message } => {
                self.bar.println(format!("warning: {message}"));
            }
            SyncProgress::RunComplete { succeeded } => {
                if succeeded {
                    self.bar.set_message("Done");
                } else {
                    self.bar.set_message("Finished with errors");
                }
            }
            _ => {}
        }
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

/// Tracing-based reporter for non-interactive runs.
pub struct LoggingReporter;

impl LoggingReporter {
    fn handle(&self, event: SyncProgress) {
        match event {
            SyncProgress::MappingProjects { org } => {
                tracing::info!(%org, "mapping projects");
            }
            SyncProgress::ProjectMapReady {
                projects,
                mapped_issues,
                degraded,
            } => {
                tracing::info!(projects, mapped_issues, degraded, "project map ready");
            }
            SyncProgress::FetchingIssuePage { page } => {
                tracing::debug!(page, "fetching issue page");
            }
            SyncProgress::FetchedIssuePage {
                page,
                count,
                total_so_far,
            } => {
                tracing::info!(page, count, total_so_far, "fetched issue page");
            }
            SyncProgress::IssuesPersisted {
                saved,
                skipped_pull_requests,
                errors,
            } => {
                tracing::info!(saved, skipped_pull_requests, errors, "issues persisted");
            }
            SyncProgress::ReconcilingProjects { projects } => {
                tracing::info!(projects, "writing project rows");
            }
            SyncProgress::BoardProjectStart { title } => {
                tracing::info!(%title, "importing board");
            }
            SyncProgress::BoardProjectDone { title, rows } => {
                tracing::info!(%title, rows, "board imported");
            }
            SyncProgress::Warning { message } => {
                tracing::warn!("{message}");
            }
            SyncProgress::RunComplete { succeeded } => {
                tracing::info!(succeeded, "run complete");
            }
            _ => {}
        }
    }
}
