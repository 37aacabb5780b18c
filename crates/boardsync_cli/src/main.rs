//! Boardsync CLI - command-line interface for the issue dashboard mirror.

mod commands;
mod config;
mod progress;

use clap::{Parser, Subcommand};
use console::Term;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "boardsync")]
#[command(version)]
#[command(about = "A GitHub issue dashboard mirror")]
#[command(
    long_about = "Boardsync mirrors an organization's GitHub issues, labels, projects, and \
project board field values into a local database, and answers dashboard \
queries (tag filters, per-project listings, assignee workloads) from the \
mirror instead of the API."
)]
#[command(after_long_help = r#"EXAMPLES
    Mirror all issues and projects for the configured organization:
        $ boardsync sync

    Import board field values (Status columns etc.):
        $ boardsync board

    List open issues carrying both tags:
        $ boardsync issues --tag bug --tag urgent --state open

    Issues carrying at least one of several tags:
        $ boardsync issues --any-tag bug --any-tag chore

    Issues closed in June (open issues always included):
        $ boardsync issues --closed-from 2026-06-01 --closed-to 2026-06-30

    Pin an issue to the top of every listing:
        $ boardsync pin I_kwDOAbc123

CONFIGURATION
    Boardsync reads configuration from:
      1. ~/.config/boardsync/config.toml (or $XDG_CONFIG_HOME/boardsync/config.toml)
      2. ./boardsync.toml
      3. Environment variables (BOARDSYNC_* prefix)
      4. .env file in current directory

ENVIRONMENT VARIABLES
    BOARDSYNC_DATABASE_URL    Database connection string (default: ~/.local/state/boardsync/boardsync.db)
    BOARDSYNC_GITHUB_TOKEN    GitHub personal access token
    BOARDSYNC_GITHUB_ORG      Organization to mirror
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },
    /// Mirror issues, labels, and projects from GitHub
    Sync {
        /// Override the configured page ceiling
        #[arg(long)]
        page_limit: Option<u32>,
    },
    /// Import project board field values
    Board {
        /// Override the configured page ceiling
        #[arg(long)]
        page_limit: Option<u32>,
    },
    /// List mirrored issues, optionally filtered by tags, state, and closed date
    Issues {
        /// Require every one of these tags (repeatable)
        #[arg(short = 't', long = "tag")]
        tags: Vec<String>,

        /// Require at least one of these tags (repeatable)
        #[arg(long = "any-tag")]
        any_tags: Vec<String>,

        /// Restrict to open or closed issues
        #[arg(short, long, value_enum, default_value_t = StateArg::All)]
        state: StateArg,

        /// Start of the closed-date window (YYYY-MM-DD, inclusive)
        #[arg(long, requires = "closed_to")]
        closed_from: Option<chrono::NaiveDate>,

        /// End of the closed-date window (YYYY-MM-DD, inclusive)
        #[arg(long, requires = "closed_from")]
        closed_to: Option<chrono::NaiveDate>,

        /// Only issues belonging to this project (UNASSIGNED for none)
        #[arg(short, long)]
        project: Option<String>,
    },
    /// Show mirror status: row counts, projects, and last runs
    Status,
    /// Pin an issue to the top of listings
    Pin {
        /// Issue node id (shown by `boardsync issues`)
        node_id: String,
    },
    /// Remove a pin
    Unpin {
        /// Issue node id
        node_id: String,
    },
    /// Open-issue counts per assignee
    Workload,
}

#[derive(Subcommand)]
enum MigrateAction {
    /// Apply all pending migrations
    Up,
    /// Rollback the last migration
    Down,
    /// Show migration status
    Status,
    /// Fresh install - drop all tables and reapply migrations
    Fresh,
}

/// Issue state restriction, as a CLI flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum StateArg {
    All,
    Open,
    Closed,
}

impl From<StateArg> for boardsync::StateFilter {
    fn from(value: StateArg) -> Self {
        match value {
            StateArg::All => Self::All,
            StateArg::Open => Self::Open,
            StateArg::Closed => Self::Closed,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing for non-TTY mode (structured logging)
    if !Term::stdout().is_term() {
        let env_filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::new("boardsync=info,boardsync_cli=info"),
        };

        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .init();
    }

    // Load configuration (config file -> env vars -> defaults)
    let config = config::Config::load();

    let cli = Cli::parse();

    let database_url = config
        .database_url()
        .expect("Failed to determine database URL - this should not happen");

    // Ensure the database directory exists for SQLite
    if database_url.starts_with("sqlite://") {
        let db_path = database_url.trim_start_matches("sqlite://");
        // Strip query parameters (e.g., ?mode=rwc) before path operations
        let db_path = db_path.split('?').next().unwrap_or(db_path);
        let db_path = std::path::Path::new(db_path);

        if db_path.is_relative() && !db_path.as_os_str().is_empty() {
            tracing::warn!(
                "Database path '{}' is relative - behavior depends on current directory. \
                 Consider using an absolute path.",
                db_path.display()
            );
        }

        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
    }

    match cli.command {
        Commands::Migrate { action } => {
            commands::migrate::handle_migrate(action, &database_url).await?;
        }
        Commands::Sync { page_limit } => {
            commands::sync::handle_sync(&config, &database_url, page_limit).await?;
        }
        Commands::Board { page_limit } => {
            commands::board::handle_board(&config, &database_url, page_limit).await?;
        }
        Commands::Issues {
            tags,
            any_tags,
            state,
            closed_from,
            closed_to,
            project,
        } => {
            let filter = boardsync::IssueFilter {
                and_tags: tags,
                or_tags: any_tags,
                state: state.into(),
                closed_between: closed_from.zip(closed_to),
            };
            commands::issues::handle_issues(&database_url, filter, project).await?;
        }
        Commands::Status => {
            commands::status::handle_status(&database_url).await?;
        }
        Commands::Pin { node_id } => {
            commands::pins::handle_pin(&database_url, &node_id).await?;
        }
        Commands::Unpin { node_id } => {
            commands::pins::handle_unpin(&database_url, &node_id).await?;
        }
        Commands::Workload => {
            commands::status::handle_workload(&database_url).await?;
        }
    }

    Ok(())
}
