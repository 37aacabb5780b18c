use boardsync::db;
use boardsync::entity::project::UNASSIGNED;
use boardsync::repository::{FilteredIssue, IssueFilter, find_filtered};
use chrono::Utc;

/// One row of the issue listing table.
#[derive(Debug, Clone, tabled::Tabled)]
struct IssueRow {
    #[tabled(rename = "")]
    pin: String,
    #[tabled(rename = "Node ID")]
    node_id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Repo")]
    repo: String,
    #[tabled(rename = "Assignee")]
    assignee: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Project")]
    project: String,
    #[tabled(rename = "Tags")]
    tags: String,
    #[tabled(rename = "Age (days)")]
    age: String,
}

impl IssueRow {
    fn from_filtered(issue: &FilteredIssue, today: chrono::NaiveDate) -> Self {
        Self {
            pin: if issue.pinned { "*".to_string() } else { String::new() },
            node_id: issue.node_id.clone(),
            title: truncate(&issue.title, 50),
            repo: issue.repo.clone(),
            assignee: issue.assignee.clone(),
            state: issue.state.clone(),
            project: issue.project_title.clone().unwrap_or_default(),
            tags: issue.tags.clone().unwrap_or_default(),
            age: issue
                .aging_days(today)
                .map(|d| d.to_string())
                .unwrap_or_default(),
        }
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let head: String = text.chars().take(max - 1).collect();
        format!("{head}\u{2026}")
    }
}

/// Whether a row belongs to the requested project.
///
/// The `UNASSIGNED` sentinel selects issues with no project linkage.
fn in_project(issue: &FilteredIssue, project: &str) -> bool {
    if project == UNASSIGNED {
        issue.project_title.is_none()
    } else {
        issue.project_title.as_deref() == Some(project)
    }
}

pub(crate) async fn handle_issues(
    database_url: &str,
    filter: IssueFilter,
    project: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = db::connect(database_url).await?;

    let mut rows = find_filtered(&db, &filter).await?;
    if let Some(project) = &project {
        rows.retain(|issue| in_project(issue, project));
    }

    if rows.is_empty() {
        println!("No issues match.");
        return Ok(());
    }

    let today = Utc::now().date_naive();
    let display: Vec<IssueRow> = rows
        .iter()
        .map(|issue| IssueRow::from_filtered(issue, today))
        .collect();

    let mut table = tabled::Table::new(display);
    table.with(tabled::settings::Style::rounded());
    println!("{table}");
    println!("{} issue(s)", rows.len());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(project_title: Option<&str>) -> FilteredIssue {
        FilteredIssue {
            node_id: "I_1".to_string(),
            title: "t".to_string(),
            url: "u".to_string(),
            repo: "r".to_string(),
            assignee: "a".to_string(),
            state: "open".to_string(),
            assigned_date: None,
            closed_at: None,
            project_title: project_title.map(str::to_string),
            tags: None,
            pinned: false,
        }
    }

    #[test]
    fn unassigned_sentinel_selects_unlinked_rows() {
        assert!(in_project(&issue(None), UNASSIGNED));
        assert!(!in_project(&issue(Some("Delivery")), UNASSIGNED));
        assert!(in_project(&issue(Some("Delivery")), "Delivery"));
        assert!(!in_project(&issue(None), "Delivery"));
    }

    #[test]
    fn truncate_keeps_short_titles() {
        assert_eq!(truncate("short", 50), "short");
        let long = "x".repeat(60);
        let cut = truncate(&long, 50);
        assert_eq!(cut.chars().count(), 50);
        assert!(cut.ends_with('\u{2026}'));
    }
}
