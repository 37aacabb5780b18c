use std::sync::Arc;

use boardsync::db;
use boardsync::sync::{BoardSummary, RunState, SyncEngine};
use console::Term;

use crate::commands::sync::{client_from_config, options_from_config};
use crate::config::Config;
use crate::progress::ProgressReporter;

pub(crate) async fn handle_board(
    config: &Config,
    database_url: &str,
    page_limit: Option<u32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = client_from_config(config)?;
    let db = db::connect(database_url).await?;
    let engine = SyncEngine::with_options(db, client, options_from_config(config, page_limit));

    let reporter = Arc::new(ProgressReporter::new());
    let callback = reporter.as_callback();

    let summary = engine.run_board_status(Some(&callback)).await?;
    reporter.finish();

    print_summary(&summary);

    if summary.state == RunState::Failed {
        return Err(format!("board import finished with {} error(s)", summary.errors.len()).into());
    }
    Ok(())
}

fn print_summary(summary: &BoardSummary) {
    let is_tty = Term::stdout().is_term();
    if is_tty {
        println!("Board import complete.");
        println!("  projects:       {}", summary.projects_processed);
        println!("  values written: {}", summary.rows_written);
        if summary.missing_issues > 0 {
            println!("  missing issues: {}", summary.missing_issues);
        }
        for warning in &summary.warnings {
            println!("  warning: {warning}");
        }
        for error in &summary.errors {
            println!("  error: {error}");
        }
    } else {
        tracing::info!(
            projects = summary.projects_processed,
            rows_written = summary.rows_written,
            missing_issues = summary.missing_issues,
            warnings = summary.warnings.len(),
            errors = summary.errors.len(),
            "board import complete"
        );
        for warning in &summary.warnings {
            tracing::warn!("{warning}");
        }
        for error in &summary.errors {
            tracing::error!("{error}");
        }
    }
}
