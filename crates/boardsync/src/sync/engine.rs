//! The synchronization engine.
//!
//! Two entry points: [`SyncEngine::run_full`] mirrors projects, issues,
//! and labels (truncate and reload), [`SyncEngine::run_board_status`]
//! refreshes the board field values for every open project. Both hold
//! the same run lock, always write an audit row, and fold non-fatal
//! failures into their summary instead of aborting.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU8, Ordering};

use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::entity::{audit_run, issue_project_status, project};
use crate::github::{BoardStatusRow, GitHubError, ProjectNode, short_error_message};
use crate::repository::{RepositoryError, audit, issues, projects, status};

use super::ingest::{IssueBundle, convert_issue};
use super::progress::{ProgressCallback, SyncProgress, emit};
use super::source::IssueSource;
use super::types::{BoardSummary, RunState, SyncError, SyncOptions, SyncSummary};

/// Orchestrates sync runs against one database and one issue source.
pub struct SyncEngine<S: IssueSource> {
    db: DatabaseConnection,
    source: S,
    options: SyncOptions,
    run_lock: tokio::sync::Mutex<()>,
    state: AtomicU8,
}

impl<S: IssueSource> SyncEngine<S> {
    pub fn new(db: DatabaseConnection, source: S) -> Self {
        Self::with_options(db, source, SyncOptions::default())
    }

    pub fn with_options(db: DatabaseConnection, source: S, options: SyncOptions) -> Self {
        Self {
            db,
            source,
            options,
            run_lock: tokio::sync::Mutex::new(()),
            state: AtomicU8::new(RunState::Idle.as_u8()),
        }
    }

    /// Current run state, readable concurrently with a run.
    pub fn state(&self) -> RunState {
        RunState::from_u8(self.state.load(Ordering::SeqCst))
    }

    pub fn database(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Full mirror refresh: project map, truncate, issue feed, project
    /// rows, UNASSIGNED rollup.
    ///
    /// Returns `Err` only when another run already holds the lock. An
    /// error that aborts the run lands in the summary with state
    /// [`RunState::Failed`]; recoverable hiccups (a skipped page, a bad
    /// row, a missing project map) land in its warnings and leave the
    /// run succeeded. The audit row is written either way.
    pub async fn run_full(
        &self,
        on_progress: Option<&ProgressCallback>,
    ) -> Result<SyncSummary, SyncError> {
        let _guard = self
            .run_lock
            .try_lock()
            .map_err(|_| SyncError::AlreadyRunning)?;
        self.state
            .store(RunState::Running.as_u8(), Ordering::SeqCst);

        let started = Utc::now().naive_utc();
        let mut summary = SyncSummary {
            state: RunState::Running,
            started_at: Some(started),
            ..Default::default()
        };

        let outcome = self.execute_full(&mut summary, on_progress).await;

        let finished = Utc::now().naive_utc();
        summary.finished_at = Some(finished);
        // Failed is reserved for an aborted run; skipped pages, bad
        // rows, and a missing project map are warnings on a run that
        // still succeeded.
        summary.state = match outcome {
            Ok(()) => RunState::Succeeded,
            Err(e) => {
                tracing::error!(error = %e, "sync run failed");
                summary.errors.push(e.to_string());
                RunState::Failed
            }
        };
        self.state.store(summary.state.as_u8(), Ordering::SeqCst);

        // The audit row is written even for failed runs; the dashboard
        // shows when the mirror was last touched, not only when it was
        // last clean.
        if let Err(e) = audit::record(&self.db, audit_run::ACTION_RETRIEVE, started, finished).await
        {
            tracing::error!(error = %e, "failed to record audit row");
            summary.warnings.push(format!("audit record failed: {e}"));
        }

        emit(
            on_progress,
            SyncProgress::RunComplete {
                succeeded: summary.state == RunState::Succeeded,
            },
        );
        Ok(summary)
    }

    async fn execute_full(
        &self,
        summary: &mut SyncSummary,
        on_progress: Option<&ProgressCallback>,
    ) -> Result<(), SyncError> {
        emit(
            on_progress,
            SyncProgress::MappingProjects {
                org: self.source.org().to_string(),
            },
        );

        let catalog = self.source.project_catalog(self.options.page_limit).await;
        summary.degraded = catalog.degraded;
        for warning in &catalog.warnings {
            emit(
                on_progress,
                SyncProgress::Warning {
                    message: warning.clone(),
                },
            );
        }
        summary.warnings.extend(catalog.warnings.iter().cloned());
        emit(
            on_progress,
            SyncProgress::ProjectMapReady {
                projects: catalog.projects.len(),
                mapped_issues: catalog.issue_projects.len(),
                degraded: catalog.degraded,
            },
        );

        // Truncate and reload. The feed has no incremental marker, so a
        // full refresh is the only consistent shape.
        issues::clear(&self.db).await?;
        projects::clear(&self.db).await?;

        let mut project_counts: HashMap<String, i32> = HashMap::new();
        let mut total_fetched = 0usize;

        let mut page = 1u32;
        loop {
            if page > self.options.page_limit {
                return Err(GitHubError::PageLimitExceeded {
                    limit: self.options.page_limit,
                }
                .into());
            }
            emit(on_progress, SyncProgress::FetchingIssuePage { page });
            // A failed page past the first yields no data for that page
            // and the walk moves on; only a first-page failure aborts
            // the phase.
            let batch = match self.source.issues_page(page, self.options.per_page).await {
                Ok(batch) => batch,
                Err(e) if page > 1 => {
                    tracing::warn!(page, error = %e, "issue page fetch failed, skipping page");
                    summary.pages_errored += 1;
                    let message = format!("page {page}: {}", short_error_message(&e));
                    emit(
                        on_progress,
                        SyncProgress::Warning {
                            message: message.clone(),
                        },
                    );
                    summary.warnings.push(message);
                    page += 1;
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            if batch.is_empty() {
                break;
            }
            total_fetched += batch.len();
            emit(
                on_progress,
                SyncProgress::FetchedIssuePage {
                    page,
                    count: batch.len(),
                    total_so_far: total_fetched,
                },
            );

            for raw in &batch {
                let node_id = raw.get("node_id").and_then(serde_json::Value::as_str);
                let project = node_id.and_then(|id| catalog.issue_projects.get(id));

                match convert_issue(raw, project) {
                    Ok(None) => summary.pull_requests_skipped += 1,
                    Ok(Some(bundle)) => match self.persist_bundle(bundle).await {
                        Ok(tags) => {
                            summary.issues_saved += 1;
                            summary.tags_saved += tags;
                            if let Some(p) = project {
                                *project_counts.entry(p.project_id.clone()).or_insert(0) += 1;
                            }
                        }
                        Err(e) => {
                            tracing::warn!(node_id = ?node_id, error = %e, "issue persist failed");
                            summary.issues_errored += 1;
                            summary.warnings.push(format!("persist failed: {e}"));
                        }
                    },
                    Err(e) => {
                        tracing::warn!(node_id = ?node_id, error = %e, "issue conversion failed");
                        summary.issues_errored += 1;
                        summary.warnings.push(format!("conversion failed: {e}"));
                    }
                }
            }
            page += 1;
        }

        emit(
            on_progress,
            SyncProgress::ReconcilingProjects {
                projects: catalog.projects.len(),
            },
        );
        let rows = project_rows(&catalog.projects, &project_counts);
        summary.projects = rows.len();
        projects::insert_many(&self.db, rows)
            .await?;

        let unassigned = issues::count_unassigned(&self.db)
            .await?;
        summary.unassigned = unassigned;
        projects::upsert(&self.db, unassigned_row(self.source.org(), unassigned))
            .await?;

        emit(
            on_progress,
            SyncProgress::IssuesPersisted {
                saved: summary.issues_saved,
                skipped_pull_requests: summary.pull_requests_skipped,
                errors: summary.issues_errored,
            },
        );
        Ok(())
    }

    /// Write one issue and its tags atomically.
    async fn persist_bundle(&self, bundle: IssueBundle) -> Result<u64, RepositoryError> {
        let txn = self.db.begin().await.map_err(RepositoryError::Database)?;
        issues::upsert(&txn, bundle.issue).await?;
        let tags = issues::upsert_tags(&txn, bundle.tags).await?;
        txn.commit().await.map_err(RepositoryError::Database)?;
        Ok(tags)
    }

    /// Replace one (issue, project) group of board rows atomically, so
    /// a reader never sees the pair between its delete and reinsert.
    async fn replace_status(
        &self,
        node_id: &str,
        project_id: &str,
        models: Vec<issue_project_status::ActiveModel>,
    ) -> Result<u64, RepositoryError> {
        let txn = self.db.begin().await.map_err(RepositoryError::Database)?;
        let written = status::replace_for_issue_project(&txn, node_id, project_id, models).await?;
        txn.commit().await.map_err(RepositoryError::Database)?;
        Ok(written)
    }

    /// Refresh board field values for every open project.
    ///
    /// Clears the status table first, then walks projects one at a
    /// time; a failing project is recorded and skipped so the rest of
    /// the board still imports.
    pub async fn run_board_status(
        &self,
        on_progress: Option<&ProgressCallback>,
    ) -> Result<BoardSummary, SyncError> {
        let _guard = self
            .run_lock
            .try_lock()
            .map_err(|_| SyncError::AlreadyRunning)?;
        self.state
            .store(RunState::Running.as_u8(), Ordering::SeqCst);

        let started = Utc::now().naive_utc();
        let mut summary = BoardSummary {
            state: RunState::Running,
            started_at: Some(started),
            ..Default::default()
        };

        let outcome = self.execute_board(&mut summary, on_progress).await;

        let finished = Utc::now().naive_utc();
        summary.finished_at = Some(finished);
        summary.state = match outcome {
            Ok(()) => RunState::Succeeded,
            Err(e) => {
                tracing::error!(error = %e, "board import failed");
                summary.errors.push(e.to_string());
                RunState::Failed
            }
        };
        self.state.store(summary.state.as_u8(), Ordering::SeqCst);

        if let Err(e) =
            audit::record(&self.db, audit_run::ACTION_BOARD_IMPORT, started, finished).await
        {
            tracing::error!(error = %e, "failed to record audit row");
            summary.warnings.push(format!("audit record failed: {e}"));
        }

        emit(
            on_progress,
            SyncProgress::RunComplete {
                succeeded: summary.state == RunState::Succeeded,
            },
        );
        Ok(summary)
    }

    async fn execute_board(
        &self,
        summary: &mut BoardSummary,
        on_progress: Option<&ProgressCallback>,
    ) -> Result<(), SyncError> {
        let all = self.source.projects().await?;
        let open: Vec<ProjectNode> = all.into_iter().filter(|p| !p.closed).collect();

        status::clear(&self.db).await?;

        for project in &open {
            emit(
                on_progress,
                SyncProgress::BoardProjectStart {
                    title: project.title.clone(),
                },
            );

            let rows = match self
                .source
                .board_rows(project, self.options.page_limit)
                .await
            {
                Ok(rows) => rows,
                Err(e) => {
                    tracing::warn!(project = %project.title, error = %e, "board walk failed");
                    summary.warnings.push(format!(
                        "project '{}': {}",
                        project.title,
                        short_error_message(&e)
                    ));
                    continue;
                }
            };
            let row_count = rows.len();

            let mut by_issue: HashMap<String, Vec<BoardStatusRow>> = HashMap::new();
            for row in rows {
                by_issue.entry(row.issue_node_id.clone()).or_default().push(row);
            }

            for (node_id, group) in by_issue {
                if !issues::exists(&self.db, &node_id).await? {
                    tracing::warn!(node_id = %node_id, "board item refers to an unmirrored issue");
                    summary.missing_issues += 1;
                    continue;
                }
                let models = group.into_iter().map(status_model).collect();
                let written = self.replace_status(&node_id, &project.id, models).await?;
                summary.rows_written += written;
            }

            summary.projects_processed += 1;
            emit(
                on_progress,
                SyncProgress::BoardProjectDone {
                    title: project.title.clone(),
                    rows: row_count,
                },
            );
        }
        Ok(())
    }
}

fn status_model(row: BoardStatusRow) -> issue_project_status::ActiveModel {
    issue_project_status::ActiveModel {
        node_id: Set(row.issue_node_id),
        project_id: Set(row.project_id),
        field_id: Set(row.field_id),
        field_name: Set(row.field_name),
        value: Set(row.value),
        color: Set(row.color),
        item_id: Set(row.item_id),
    }
}

fn project_rows(
    nodes: &[ProjectNode],
    counts: &HashMap<String, i32>,
) -> Vec<project::ActiveModel> {
    nodes
        .iter()
        .map(|p| project::ActiveModel {
            external_id: Set(p.id.clone()),
            title: Set(p.title.clone()),
            url: Set(p.url.clone()),
            closed: Set(p.closed),
            issue_count: Set(counts.get(&p.id).copied().unwrap_or(0)),
        })
        .collect()
}

fn unassigned_row(org: &str, count: u64) -> project::ActiveModel {
    project::ActiveModel {
        external_id: Set(project::UNASSIGNED.to_string()),
        title: Set(project::UNASSIGNED.to_string()),
        url: Set(format!("https://github.com/orgs/{org}")),
        closed: Set(false),
        issue_count: Set(count as i32),
    }
}
