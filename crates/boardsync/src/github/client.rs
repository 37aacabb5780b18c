//! HTTP client for the GitHub REST and GraphQL APIs.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use url::Url;

use super::error::{GitHubError, Result};

/// Default GitHub API base.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Request timeout applied to every API call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Connect timeout applied to every API call.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Explicit client configuration. Nothing is read from the
/// environment; callers pass everything in.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Personal access token sent as a bearer credential.
    pub token: String,
    /// Organization whose issues and projects are mirrored.
    pub org: String,
    /// Application name, sent as the User-Agent (GitHub requires one).
    pub app_name: String,
    /// API base URL; override for GitHub Enterprise.
    pub api_base: Url,
}

impl ClientConfig {
    /// Config with the public GitHub API base.
    pub fn new(token: impl Into<String>, org: impl Into<String>, app_name: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            org: org.into(),
            app_name: app_name.into(),
            // The constant is a valid URL.
            api_base: Url::parse(DEFAULT_API_BASE).expect("default API base parses"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GraphQlEnvelope {
    data: Option<serde_json::Value>,
    errors: Option<Vec<GraphQlErrorEntry>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlErrorEntry {
    message: String,
}

/// Client for the GitHub API, covering the GraphQL endpoint and the
/// organization issues REST feed.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl GitHubClient {
    /// Build a client with the fixed request and connect timeouts.
    ///
    /// # Errors
    /// Returns `GitHubError::Network` if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;

        Ok(Self { http, config })
    }

    /// The configured organization login.
    pub fn org(&self) -> &str {
        &self.config.org
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.config.api_base.join(path).map_err(|e| GitHubError::Url {
            message: format!("{path}: {e}"),
        })
    }

    /// Execute a GraphQL query and deserialize the `data` payload.
    ///
    /// A 200 response carrying a non-empty `errors` array fails with
    /// [`GitHubError::GraphQl`]; this is an API-level rejection, not a
    /// transport failure, and callers treat the two differently.
    pub async fn graphql<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T> {
        let url = self.endpoint("graphql")?;
        let response = self
            .http
            .post(url)
            .header(AUTHORIZATION, format!("Bearer {}", self.config.token))
            .header(USER_AGENT, &self.config.app_name)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(GitHubError::Status {
                status: status.as_u16(),
            });
        }

        let envelope: GraphQlEnvelope = response.json().await?;
        if let Some(errors) = envelope.errors
            && !errors.is_empty()
        {
            return Err(GitHubError::GraphQl {
                messages: errors.into_iter().map(|e| e.message).collect(),
            });
        }

        let data = envelope
            .data
            .ok_or_else(|| GitHubError::decode("GraphQL response carried no data"))?;
        serde_json::from_value(data).map_err(|e| GitHubError::decode(e.to_string()))
    }

    /// Fetch one page of the organization issue feed.
    ///
    /// Uses `filter=all&state=all` so every issue in the org is
    /// visible, not just ones assigned to the token's user. Returns raw
    /// JSON objects; the ingest pipeline owns the field extraction and
    /// keeps the payload for the `raw_json` column.
    pub async fn issues_page(&self, page: u32, per_page: u32) -> Result<Vec<serde_json::Value>> {
        let url = self.endpoint(&format!("orgs/{}/issues", self.config.org))?;
        let response = self
            .http
            .get(url)
            .header(AUTHORIZATION, format!("Bearer {}", self.config.token))
            .header(USER_AGENT, &self.config.app_name)
            .header(ACCEPT, "application/vnd.github+json")
            .query(&[
                ("filter", "all".to_string()),
                ("state", "all".to_string()),
                ("per_page", per_page.to_string()),
                ("page", page.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GitHubError::Status {
                status: status.as_u16(),
            });
        }

        Ok(response.json().await?)
    }
}
