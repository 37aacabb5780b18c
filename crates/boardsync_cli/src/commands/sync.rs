use std::sync::Arc;

use boardsync::db;
use boardsync::github::{ClientConfig, GitHubClient};
use boardsync::sync::{RunState, SyncEngine, SyncOptions, SyncSummary};
use console::Term;

use crate::config::Config;
use crate::progress::ProgressReporter;

/// Build a GitHub client from the loaded configuration.
pub(crate) fn client_from_config(config: &Config) -> Result<GitHubClient, Box<dyn std::error::Error>> {
    let token = config.github_token().ok_or(
        "No GitHub token configured. Set BOARDSYNC_GITHUB_TOKEN or add [github] token to the config file.",
    )?;
    let org = config.github_org().ok_or(
        "No organization configured. Set BOARDSYNC_GITHUB_ORG or add [github] org to the config file.",
    )?;
    Ok(GitHubClient::new(ClientConfig::new(
        token,
        org,
        config.github.app_name.clone(),
    ))?)
}

pub(crate) fn options_from_config(config: &Config, page_limit: Option<u32>) -> SyncOptions {
    SyncOptions {
        per_page: config.sync.per_page,
        page_limit: page_limit.unwrap_or(config.sync.page_limit),
    }
}

pub(crate) async fn handle_sync(
    config: &Config,
    database_url: &str,
    page_limit: Option<u32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = client_from_config(config)?;
    let db = db::connect(database_url).await?;
    let engine = SyncEngine::with_options(db, client, options_from_config(config, page_limit));

    let reporter = Arc::new(ProgressReporter::new());
    let callback = reporter.as_callback();

    let summary = engine.run_full(Some(&callback)).await?;
    reporter.finish();

    print_summary(&summary);

    if summary.state == RunState::Failed {
        return Err(format!("sync finished with {} error(s)", summary.errors.len()).into());
    }
    Ok(())
}

fn print_summary(summary: &SyncSummary) {
    let is_tty = Term::stdout().is_term();
    if is_tty {
        println!("Sync complete.");
        println!("  projects:       {}", summary.projects);
        println!("  issues saved:   {}", summary.issues_saved);
        println!("  tags saved:     {}", summary.tags_saved);
        println!("  unassigned:     {}", summary.unassigned);
        println!("  PRs skipped:    {}", summary.pull_requests_skipped);
        if summary.issues_errored > 0 {
            println!("  issue errors:   {}", summary.issues_errored);
        }
        if summary.pages_errored > 0 {
            println!("  pages skipped:  {}", summary.pages_errored);
        }
        if summary.degraded {
            println!("  NOTE: project map unavailable, issues mirrored without linkage");
        }
        for warning in &summary.warnings {
            println!("  warning: {warning}");
        }
        for error in &summary.errors {
            println!("  error: {error}");
        }
    } else {
        tracing::info!(
            projects = summary.projects,
            issues_saved = summary.issues_saved,
            tags_saved = summary.tags_saved,
            unassigned = summary.unassigned,
            pull_requests_skipped = summary.pull_requests_skipped,
            issues_errored = summary.issues_errored,
            pages_errored = summary.pages_errored,
            degraded = summary.degraded,
            warnings = summary.warnings.len(),
            errors = summary.errors.len(),
            "sync complete"
        );
        for warning in &summary.warnings {
            tracing::warn!("{warning}");
        }
        for error in &summary.errors {
            tracing::error!("{error}");
        }
    }
}
