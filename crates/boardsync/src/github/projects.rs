//! Project mapper: projectsV2 listing and issue -> project linkage.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::json;

use super::client::GitHubClient;
use super::error::{Result, short_error_message};
use super::pagination::{Page, walk_cursor_with};
use super::types::{PageInfo, ProjectCatalog, ProjectNode, ProjectRef};

const PROJECTS_QUERY: &str = r"
query($org: String!) {
    organization(login: $org) {
        projectsV2(first: 80) {
            nodes { id number title url closed }
        }
    }
}";

const PROJECT_ITEMS_QUERY: &str = r"
query($org: String!, $number: Int!, $cursor: String) {
    organization(login: $org) {
        projectV2(number: $number) {
            items(first: 100, after: $cursor) {
                pageInfo { hasNextPage endCursor }
                nodes {
                    id
                    content { ... on Issue { id closed } }
                }
            }
        }
    }
}";

#[derive(Debug, Deserialize)]
struct ProjectsData {
    organization: Option<ProjectsOrg>,
}

#[derive(Debug, Deserialize)]
struct ProjectsOrg {
    #[serde(rename = "projectsV2")]
    projects_v2: ProjectsConn,
}

#[derive(Debug, Deserialize)]
struct ProjectsConn {
    #[serde(default)]
    nodes: Vec<ProjectNode>,
}

#[derive(Debug, Deserialize)]
struct ItemsData {
    organization: Option<ItemsOrg>,
}

#[derive(Debug, Deserialize)]
struct ItemsOrg {
    #[serde(rename = "projectV2")]
    project_v2: Option<ItemsProject>,
}

#[derive(Debug, Deserialize)]
struct ItemsProject {
    items: ItemsConn,
}

#[derive(Debug, Deserialize)]
struct ItemsConn {
    #[serde(rename = "pageInfo")]
    page_info: PageInfo,
    #[serde(default)]
    nodes: Vec<ItemNode>,
}

#[derive(Debug, Deserialize)]
struct ItemNode {
    #[allow(dead_code)]
    id: String,
    content: Option<ItemContent>,
}

/// Inline fragment payload. Draft items and pull requests deserialize
/// as an empty object, leaving `id` unset.
#[derive(Debug, Default, Deserialize)]
struct ItemContent {
    id: Option<String>,
    #[serde(default)]
    closed: bool,
}

/// List every projectsV2 board of the configured organization.
pub async fn fetch_projects(client: &GitHubClient) -> Result<Vec<ProjectNode>> {
    let data: ProjectsData = client
        .graphql(PROJECTS_QUERY, json!({ "org": client.org() }))
        .await?;
    Ok(data
        .organization
        .map(|org| org.projects_v2.nodes)
        .unwrap_or_default())
}

async fn fetch_items_page(
    client: &GitHubClient,
    number: i64,
    cursor: Option<String>,
) -> Result<Page<ItemNode>> {
    let data: ItemsData = client
        .graphql(
            PROJECT_ITEMS_QUERY,
            json!({ "org": client.org(), "number": number, "cursor": cursor }),
        )
        .await?;

    let items = data
        .organization
        .and_then(|org| org.project_v2)
        .map(|project| project.items)
        .ok_or_else(|| super::error::GitHubError::decode("projectV2 missing from items response"))?;

    Ok(Page {
        nodes: items.nodes,
        has_next: items.page_info.has_next_page,
        end_cursor: items.page_info.end_cursor,
    })
}

fn apply_item_nodes(
    map: &mut HashMap<String, ProjectRef>,
    project: &ProjectNode,
    nodes: Vec<ItemNode>,
) {
    for item in nodes {
        let Some(content) = item.content else {
            continue;
        };
        let Some(issue_id) = content.id else {
            continue;
        };
        if content.closed {
            continue;
        }
        // Last write wins when an issue sits on several boards.
        map.insert(
            issue_id,
            ProjectRef {
                project_id: project.id.clone(),
                project_title: project.title.clone(),
            },
        );
    }
}

/// Build the issue -> project map for every open project.
///
/// Failure modes are deliberately uneven:
/// - the top-level listing failing degrades the whole phase (empty map,
///   `degraded` set) so the issue sync can still run;
/// - one project's item walk failing keeps whatever pages were already
///   applied for it, records a warning, and moves on to the next
///   project.
pub async fn fetch_project_catalog(client: &GitHubClient, page_limit: u32) -> ProjectCatalog {
    let mut catalog = ProjectCatalog::default();

    let all = match fetch_projects(client).await {
        Ok(all) => all,
        Err(e) => {
            tracing::warn!(error = %e, "projects listing failed, continuing without project map");
            catalog.degraded = true;
            catalog
                .warnings
                .push(format!("projects listing failed: {}", short_error_message(&e)));
            return catalog;
        }
    };

    catalog.projects = all.into_iter().filter(|p| !p.closed).collect();

    for project in &catalog.projects {
        let walked = walk_cursor_with(
            page_limit,
            |cursor| fetch_items_page(client, project.number, cursor),
            |nodes| apply_item_nodes(&mut catalog.issue_projects, project, nodes),
        )
        .await;

        if let Err(e) = walked {
            tracing::warn!(project = %project.title, error = %e, "project item walk failed");
            catalog.warnings.push(format!(
                "project '{}': {}",
                project.title,
                short_error_message(&e)
            ));
        }
    }

    catalog
}
