//! Conversion of raw issue feed objects into persistable rows.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use sea_orm::ActiveValue::Set;
use serde_json::Value;
use thiserror::Error;

use crate::entity::{issue, issue_tag};
use crate::github::ProjectRef;

/// Sentinel assignee for issues with nobody assigned.
pub const UNASSIGNED_ASSIGNEE: &str = "UNASSIGNED";

/// Default label color when the feed omits one.
const DEFAULT_TAG_COLOR: &str = "ededed";

/// Errors converting one raw feed object.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("issue object is missing required field `{0}`")]
    MissingField(&'static str),

    #[error("issue field `{field}` holds an unparseable timestamp: {value}")]
    InvalidTimestamp { field: &'static str, value: String },
}

/// An issue row plus its label rows, ready to persist together.
#[derive(Debug)]
pub struct IssueBundle {
    pub issue: issue::ActiveModel,
    pub tags: Vec<issue_tag::ActiveModel>,
}

fn required_str<'a>(raw: &'a Value, field: &'static str) -> Result<&'a str, IngestError> {
    raw.get(field)
        .and_then(Value::as_str)
        .ok_or(IngestError::MissingField(field))
}

fn parse_timestamp(field: &'static str, value: &str) -> Result<NaiveDateTime, IngestError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.naive_utc())
        .map_err(|_| IngestError::InvalidTimestamp {
            field,
            value: value.to_string(),
        })
}

fn optional_date(raw: &Value, field: &'static str) -> Result<Option<NaiveDate>, IngestError> {
    match raw.get(field).and_then(Value::as_str) {
        Some(value) => Ok(Some(parse_timestamp(field, value)?.date())),
        None => Ok(None),
    }
}

/// First assignee's login, or the UNASSIGNED sentinel.
fn assignee_login(raw: &Value) -> String {
    raw.get("assignees")
        .and_then(Value::as_array)
        .and_then(|list| list.first())
        .and_then(|a| a.get("login"))
        .and_then(Value::as_str)
        .unwrap_or(UNASSIGNED_ASSIGNEE)
        .to_string()
}

/// Repository name, taken from the last path segment of repository_url.
fn repo_name(repository_url: &str) -> String {
    repository_url
        .rsplit('/')
        .next()
        .unwrap_or(repository_url)
        .to_string()
}

/// Repository web URL, derived from the issue's html_url.
fn repo_web_url(html_url: &str) -> String {
    match html_url.split_once("/issues/") {
        Some((repo, _)) => repo.to_string(),
        None => html_url.to_string(),
    }
}

fn tag_models(raw: &Value, node_id: &str) -> Vec<issue_tag::ActiveModel> {
    let Some(labels) = raw.get("labels").and_then(Value::as_array) else {
        return Vec::new();
    };
    labels
        .iter()
        .filter_map(|label| {
            let name = label.get("name").and_then(Value::as_str)?;
            let color = label
                .get("color")
                .and_then(Value::as_str)
                .unwrap_or(DEFAULT_TAG_COLOR);
            Some(issue_tag::ActiveModel {
                node_id: Set(node_id.to_string()),
                tag: Set(name.to_string()),
                color: Set(color.to_string()),
            })
        })
        .collect()
}

/// Convert one raw feed object into a persistable bundle.
///
/// Returns `Ok(None)` for pull requests: the organization issue feed
/// mixes them in, marked by a `pull_request` key.
pub fn convert_issue(
    raw: &Value,
    project: Option<&ProjectRef>,
) -> Result<Option<IssueBundle>, IngestError> {
    if raw.get("pull_request").is_some() {
        return Ok(None);
    }

    let node_id = required_str(raw, "node_id")?.to_string();
    let external_id = raw
        .get("id")
        .and_then(Value::as_i64)
        .ok_or(IngestError::MissingField("id"))?;
    let title = required_str(raw, "title")?.to_string();
    let html_url = required_str(raw, "html_url")?;
    let repository_url = required_str(raw, "repository_url")?;
    let state = required_str(raw, "state")?.to_string();

    let assigned_date = optional_date(raw, "created_at")?;
    let closed_at = optional_date(raw, "closed_at")?;
    let last_updated_at = match raw.get("updated_at").and_then(Value::as_str) {
        Some(value) => Some(parse_timestamp("updated_at", value)?),
        None => None,
    };

    let tags = tag_models(raw, &node_id);

    let issue = issue::ActiveModel {
        node_id: Set(node_id),
        external_id: Set(external_id),
        title: Set(title),
        url: Set(html_url.to_string()),
        repo: Set(repo_name(repository_url)),
        repo_url: Set(repo_web_url(html_url)),
        assignee: Set(assignee_login(raw)),
        state: Set(state),
        assigned_date: Set(assigned_date),
        closed_at: Set(closed_at),
        last_updated_at: Set(last_updated_at),
        project_id: Set(project.map(|p| p.project_id.clone())),
        project_title: Set(project.map(|p| p.project_title.clone())),
        raw_json: Set(raw.clone()),
    };

    Ok(Some(IssueBundle { issue, tags }))
}

#[cfg(test)]
mod tests {
    use sea_orm::ActiveValue;
    use serde_json::json;

    use super::*;

    fn sample_issue() -> Value {
        json!({
            "node_id": "I_abc123",
            "id": 987654,
            "title": "Login page times out",
            "html_url": "https://github.com/acme/webapp/issues/42",
            "repository_url": "https://api.github.com/repos/acme/webapp",
            "state": "open",
            "created_at": "2026-07-01T09:30:00Z",
            "updated_at": "2026-07-02T15:00:00Z",
            "closed_at": null,
            "assignees": [{ "login": "mtorres" }, { "login": "second" }],
            "labels": [
                { "name": "bug", "color": "d73a4a" },
                { "name": "backend" }
            ]
        })
    }

    fn unwrap_set<T: Clone>(value: &ActiveValue<T>) -> T
    where
        T: Into<sea_orm::Value>,
    {
        match value {
            ActiveValue::Set(v) => v.clone(),
            _ => panic!("expected Set value"),
        }
    }

    #[test]
    fn converts_a_full_issue() {
        let raw = sample_issue();
        let bundle = convert_issue(&raw, None).unwrap().unwrap();

        assert_eq!(unwrap_set(&bundle.issue.node_id), "I_abc123");
        assert_eq!(unwrap_set(&bundle.issue.external_id), 987654);
        assert_eq!(unwrap_set(&bundle.issue.repo), "webapp");
        assert_eq!(
            unwrap_set(&bundle.issue.repo_url),
            "https://github.com/acme/webapp"
        );
        assert_eq!(unwrap_set(&bundle.issue.assignee), "mtorres");
        assert_eq!(
            unwrap_set(&bundle.issue.assigned_date),
            Some(NaiveDate::from_ymd_opt(2026, 7, 1).unwrap())
        );
        assert_eq!(unwrap_set(&bundle.issue.closed_at), None);
        assert_eq!(bundle.tags.len(), 2);
        assert_eq!(unwrap_set(&bundle.tags[0].tag), "bug");
        assert_eq!(unwrap_set(&bundle.tags[0].color), "d73a4a");
        assert_eq!(unwrap_set(&bundle.tags[1].color), DEFAULT_TAG_COLOR);
    }

    #[test]
    fn pull_requests_are_skipped() {
        let mut raw = sample_issue();
        raw["pull_request"] = json!({ "url": "https://api.github.com/..." });
        assert!(convert_issue(&raw, None).unwrap().is_none());
    }

    #[test]
    fn no_assignees_uses_the_sentinel() {
        let mut raw = sample_issue();
        raw["assignees"] = json!([]);
        let bundle = convert_issue(&raw, None).unwrap().unwrap();
        assert_eq!(unwrap_set(&bundle.issue.assignee), UNASSIGNED_ASSIGNEE);
    }

    #[test]
    fn project_linkage_is_applied() {
        let raw = sample_issue();
        let project = ProjectRef {
            project_id: "PVT_1".to_string(),
            project_title: "Delivery".to_string(),
        };
        let bundle = convert_issue(&raw, Some(&project)).unwrap().unwrap();
        assert_eq!(
            unwrap_set(&bundle.issue.project_id),
            Some("PVT_1".to_string())
        );
        assert_eq!(
            unwrap_set(&bundle.issue.project_title),
            Some("Delivery".to_string())
        );
    }

    #[test]
    fn missing_node_id_is_an_error() {
        let mut raw = sample_issue();
        raw.as_object_mut().unwrap().remove("node_id");
        let err = convert_issue(&raw, None).unwrap_err();
        assert!(matches!(err, IngestError::MissingField("node_id")));
    }

    #[test]
    fn bad_timestamp_is_an_error() {
        let mut raw = sample_issue();
        raw["created_at"] = json!("yesterday");
        let err = convert_issue(&raw, None).unwrap_err();
        assert!(matches!(
            err,
            IngestError::InvalidTimestamp {
                field: "created_at",
                ..
            }
        ));
    }

    #[test]
    fn closed_issue_keeps_closed_date() {
        let mut raw = sample_issue();
        raw["state"] = json!("closed");
        raw["closed_at"] = json!("2026-08-10T12:00:00Z");
        let bundle = convert_issue(&raw, None).unwrap().unwrap();
        assert_eq!(
            unwrap_set(&bundle.issue.closed_at),
            Some(NaiveDate::from_ymd_opt(2026, 8, 10).unwrap())
        );
    }

    #[test]
    fn html_url_without_issue_segment_is_kept_as_is() {
        assert_eq!(
            repo_web_url("https://github.com/acme/webapp"),
            "https://github.com/acme/webapp"
        );
    }
}
