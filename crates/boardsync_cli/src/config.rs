//! Configuration file support for boardsync.
//!
//! Configuration is loaded with the following precedence (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (prefixed with `BOARDSYNC_`, e.g., `BOARDSYNC_GITHUB_TOKEN`)
//! 3. Config file (~/.config/boardsync/config.toml or ./boardsync.toml)
//! 4. Built-in defaults
//!
//! The database URL defaults to `sqlite://~/.local/state/boardsync/boardsync.db`
//! on Linux (using the XDG state directory) if not explicitly configured.
//!
//! Example config file:
//! ```toml
//! [database]
//! url = "sqlite://~/.local/state/boardsync/boardsync.db"  # optional, this is the default
//!
//! [github]
//! token = "ghp_..."   # or use BOARDSYNC_GITHUB_TOKEN env var
//! org = "my-org"      # or use BOARDSYNC_GITHUB_ORG env var
//!
//! [sync]
//! per_page = 99
//! page_limit = 50
//! ```

use std::path::PathBuf;

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// GitHub configuration.
    pub github: GitHubConfig,
    /// Default sync options.
    pub sync: SyncConfig,
}

/// Database configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database connection URL.
    /// Defaults to `sqlite://~/.local/state/boardsync/boardsync.db` if not specified.
    pub url: Option<String>,
}

/// GitHub configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// GitHub API token.
    /// Can also be set via BOARDSYNC_GITHUB_TOKEN environment variable.
    pub token: Option<String>,
    /// Organization whose issues are mirrored.
    /// Can also be set via BOARDSYNC_GITHUB_ORG environment variable.
    pub org: Option<String>,
    /// User-Agent header sent on API calls.
    pub app_name: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            org: None,
            app_name: "boardsync".to_string(),
        }
    }
}

/// Default sync options.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// REST page size for the issue feed.
    pub per_page: u32,
    /// Safety ceiling on pages fetched per walk.
    pub page_limit: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            per_page: boardsync::sync::REST_PAGE_SIZE,
            page_limit: 50,
        }
    }
}

impl Config {
    /// Load configuration using the config crate's layered approach.
    ///
    /// Sources are loaded in order (later sources override earlier):
    /// 1. Built-in defaults
    /// 2. XDG config file (~/.config/boardsync/config.toml)
    /// 3. Local config file (./boardsync.toml)
    /// 4. Environment variables with BOARDSYNC_ prefix
    pub fn load() -> Self {
        let mut builder = ConfigBuilder::builder();

        if let Some(proj_dirs) = ProjectDirs::from("", "", "boardsync") {
            let xdg_config = proj_dirs.config_dir().join("config.toml");
            if xdg_config.exists() {
                tracing::debug!("Loading config from {:?}", xdg_config);
                builder = builder.add_source(
                    File::from(xdg_config)
                        .format(FileFormat::Toml)
                        .required(false),
                );
            }
        }

        // Local config file (higher priority than XDG)
        let local_config = PathBuf::from("boardsync.toml");
        if local_config.exists() {
            tracing::debug!("Loading config from ./boardsync.toml");
            builder = builder.add_source(
                File::from(local_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        // BOARDSYNC_ prefixed environment variables
        // e.g., BOARDSYNC_DATABASE_URL -> database.url
        builder = builder.add_source(
            Environment::with_prefix("BOARDSYNC")
                .separator("_")
                .try_parsing(true),
        );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<Config>() {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Failed to deserialize config: {}", e);
                    Config::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to build config: {}", e);
                Config::default()
            }
        }
    }

    /// Get the database URL, falling back to the default state directory path.
    ///
    /// The `mode=rwc` parameter enables read-write access and creates the
    /// file if it doesn't exist.
    pub fn database_url(&self) -> Option<String> {
        self.database.url.clone().or_else(|| {
            Self::default_state_dir().map(|state_dir| {
                let db_path = state_dir.join("boardsync.db");
                format!("sqlite://{}?mode=rwc", db_path.display())
            })
        })
    }

    /// Get the GitHub token.
    pub fn github_token(&self) -> Option<String> {
        self.github.token.clone()
    }

    /// Get the configured organization.
    pub fn github_org(&self) -> Option<String> {
        self.github.org.clone()
    }

    /// Default state directory (~/.local/state/boardsync on Linux).
    fn default_state_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "boardsync").map(|dirs| {
            dirs.state_dir()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| dirs.data_dir().to_path_buf())
        })
    }
}
