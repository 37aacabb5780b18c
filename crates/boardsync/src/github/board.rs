//! Board-status extractor: typed projectsV2 field values per issue.
//!
//! This is a heavier pass than the project mapper and runs separately:
//! it pulls every field definition and every item's typed field values
//! for one project, and normalizes them into flat
//! [`BoardStatusRow`](super::types::BoardStatusRow)s.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::json;

use super::client::GitHubClient;
use super::error::{GitHubError, Result};
use super::pagination::{Page, walk_cursor_with};
use super::types::{BoardStatusRow, PageInfo, ProjectNode};

const BOARD_FIELDS_QUERY: &str = r"
query($org: String!, $number: Int!) {
    organization(login: $org) {
        projectV2(number: $number) {
            fields(first: 20) {
                nodes {
                    ... on ProjectV2Field { id name dataType }
                    ... on ProjectV2SingleSelectField { id name options { id name color } }
                }
            }
        }
    }
}";

const BOARD_ITEMS_QUERY: &str = r"
query($org: String!, $number: Int!, $cursor: String) {
    organization(login: $org) {
        projectV2(number: $number) {
            items(first: 100, after: $cursor) {
                pageInfo { hasNextPage endCursor }
                nodes {
                    id
                    content { ... on Issue { id closed } }
                    fieldValues(first: 20) {
                        nodes {
                            ... on ProjectV2ItemFieldTextValue {
                                text
                                field { ... on ProjectV2FieldCommon { id name } }
                            }
                            ... on ProjectV2ItemFieldSingleSelectValue {
                                name
                                optionId
                                field { ... on ProjectV2FieldCommon { id name } }
                            }
                            ... on ProjectV2ItemFieldNumberValue {
                                number
                                field { ... on ProjectV2FieldCommon { id name } }
                            }
                            ... on ProjectV2ItemFieldDateValue {
                                date
                                field { ... on ProjectV2FieldCommon { id name } }
                            }
                        }
                    }
                }
            }
        }
    }
}";

#[derive(Debug, Deserialize)]
struct FieldsData {
    organization: Option<FieldsOrg>,
}

#[derive(Debug, Deserialize)]
struct FieldsOrg {
    #[serde(rename = "projectV2")]
    project_v2: Option<FieldsProject>,
}

#[derive(Debug, Deserialize)]
struct FieldsProject {
    fields: FieldConn,
}

#[derive(Debug, Deserialize)]
struct FieldConn {
    #[serde(default)]
    nodes: Vec<FieldNode>,
}

/// Field definition. Non-matching union members arrive as `{}`.
#[derive(Debug, Default, Deserialize)]
struct FieldNode {
    id: Option<String>,
    #[allow(dead_code)]
    name: Option<String>,
    options: Option<Vec<FieldOption>>,
}

#[derive(Debug, Deserialize)]
struct FieldOption {
    id: String,
    #[allow(dead_code)]
    name: String,
    color: String,
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
    nodes: Vec<BoardItem>,
}

#[derive(Debug, Deserialize)]
struct BoardItem {
    id: String,
    content: Option<BoardItemContent>,
    #[serde(rename = "fieldValues")]
    field_values: ValueConn,
}

#[derive(Debug, Default, Deserialize)]
struct BoardItemContent {
    id: Option<String>,
    #[serde(default)]
    closed: bool,
}

#[derive(Debug, Deserialize)]
struct ValueConn {
    #[serde(default)]
    nodes: Vec<FieldValueNode>,
}

/// One typed field value. Exactly one of the value members is set,
/// depending on which inline fragment matched; unmatched members (and
/// the whole node for unhandled value types) come back empty.
#[derive(Debug, Default, Deserialize)]
struct FieldValueNode {
    text: Option<String>,
    name: Option<String>,
    #[serde(rename = "optionId")]
    option_id: Option<String>,
    number: Option<f64>,
    date: Option<String>,
    field: Option<FieldRef>,
}

#[derive(Debug, Deserialize)]
struct FieldRef {
    id: String,
    name: String,
}

/// (field id, option id) -> option color, for single-select lookups.
type OptionColors = HashMap<(String, String), String>;

fn option_color_index(fields: &[FieldNode]) -> OptionColors {
    let mut colors = OptionColors::new();
    for field in fields {
        let (Some(field_id), Some(options)) = (&field.id, &field.options) else {
            continue;
        };
        for option in options {
            colors.insert((field_id.clone(), option.id.clone()), option.color.clone());
        }
    }
    colors
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

fn normalize_item(
    project: &ProjectNode,
    colors: &OptionColors,
    item: BoardItem,
) -> Vec<BoardStatusRow> {
    // Same skip policy as the project mapper: no content, or a closed
    // issue, contributes no rows.
    let Some(content) = item.content else {
        return Vec::new();
    };
    if content.closed {
        return Vec::new();
    }
    let Some(issue_id) = content.id else {
        return Vec::new();
    };

    let mut rows = Vec::new();
    for value in item.field_values.nodes {
        let Some(field) = value.field else {
            continue;
        };

        let (rendered, color) = if let Some(text) = value.text {
            (text, None)
        } else if let Some(name) = value.name {
            let color = value
                .option_id
                .and_then(|option_id| colors.get(&(field.id.clone(), option_id)).cloned());
            (name, color)
        } else if let Some(number) = value.number {
            (format_number(number), None)
        } else if let Some(date) = value.date {
            (date, None)
        } else {
            continue;
        };

        rows.push(BoardStatusRow {
            issue_node_id: issue_id.clone(),
            project_id: project.id.clone(),
            item_id: item.id.clone(),
            field_id: field.id,
            field_name: field.name,
            value: rendered,
            color,
        });
    }
    rows
}

async fn fetch_fields(client: &GitHubClient, number: i64) -> Result<Vec<FieldNode>> {
    let data: FieldsData = client
        .graphql(
            BOARD_FIELDS_QUERY,
            json!({ "org": client.org(), "number": number }),
        )
        .await?;

    data.organization
        .and_then(|org| org.project_v2)
        .map(|project| project.fields.nodes)
        .ok_or_else(|| GitHubError::decode("projectV2 missing from fields response"))
}

async fn fetch_items_page(
    client: &GitHubClient,
    number: i64,
    cursor: Option<String>,
) -> Result<Page<BoardItem>> {
    let data: ItemsData = client
        .graphql(
            BOARD_ITEMS_QUERY,
            json!({ "org": client.org(), "number": number, "cursor": cursor }),
        )
        .await?;

    let items = data
        .organization
        .and_then(|org| org.project_v2)
        .map(|project| project.items)
        .ok_or_else(|| GitHubError::decode("projectV2 missing from items response"))?;

    Ok(Page {
        nodes: items.nodes,
        has_next: items.page_info.has_next_page,
        end_cursor: items.page_info.end_cursor,
    })
}

/// Extract every normalized field value for one project's items.
pub async fn fetch_board_rows(
    client: &GitHubClient,
    project: &ProjectNode,
    page_limit: u32,
) -> Result<Vec<BoardStatusRow>> {
    let fields = fetch_fields(client, project.number).await?;
    let colors = option_color_index(&fields);

    let mut rows = Vec::new();
    walk_cursor_with(
        page_limit,
        |cursor| fetch_items_page(client, project.number, cursor),
        |items| {
            for item in items {
                rows.extend(normalize_item(project, &colors, item));
            }
        },
    )
    .await?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_project() -> ProjectNode {
        ProjectNode {
            id: "PVT_1".to_string(),
            number: 7,
            title: "Delivery".to_string(),
            url: "https://github.com/orgs/acme/projects/7".to_string(),
            closed: false,
        }
    }

    fn select_field() -> FieldNode {
        FieldNode {
            id: Some("F_status".to_string()),
            name: Some("Status".to_string()),
            options: Some(vec![
                FieldOption {
                    id: "opt_todo".to_string(),
                    name: "Todo".to_string(),
                    color: "GRAY".to_string(),
                },
                FieldOption {
                    id: "opt_done".to_string(),
                    name: "Done".to_string(),
                    color: "GREEN".to_string(),
                },
            ]),
        }
    }

    #[test]
    fn option_index_covers_only_single_select_fields() {
        let fields = vec![
            select_field(),
            FieldNode {
                id: Some("F_title".to_string()),
                name: Some("Title".to_string()),
                options: None,
            },
        ];

        let colors = option_color_index(&fields);
        assert_eq!(colors.len(), 2);
        assert_eq!(
            colors[&("F_status".to_string(), "opt_done".to_string())],
            "GREEN"
        );
    }

    #[test]
    fn normalize_resolves_single_select_color() {
        let colors = option_color_index(&[select_field()]);
        let item = BoardItem {
            id: "PVTI_1".to_string(),
            content: Some(BoardItemContent {
                id: Some("I_1".to_string()),
                closed: false,
            }),
            field_values: ValueConn {
                nodes: vec![FieldValueNode {
                    name: Some("Done".to_string()),
                    option_id: Some("opt_done".to_string()),
                    field: Some(FieldRef {
                        id: "F_status".to_string(),
                        name: "Status".to_string(),
                    }),
                    ..Default::default()
                }],
            },
        };

        let rows = normalize_item(&test_project(), &colors, item);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].value, "Done");
        assert_eq!(rows[0].color.as_deref(), Some("GREEN"));
        assert_eq!(rows[0].field_name, "Status");
        assert_eq!(rows[0].issue_node_id, "I_1");
    }

    #[test]
    fn normalize_handles_text_number_and_date() {
        let item = BoardItem {
            id: "PVTI_2".to_string(),
            content: Some(BoardItemContent {
                id: Some("I_2".to_string()),
                closed: false,
            }),
            field_values: ValueConn {
                nodes: vec![
                    FieldValueNode {
                        text: Some("needs triage".to_string()),
                        field: Some(FieldRef {
                            id: "F_note".to_string(),
                            name: "Note".to_string(),
                        }),
                        ..Default::default()
                    },
                    FieldValueNode {
                        number: Some(5.0),
                        field: Some(FieldRef {
                            id: "F_points".to_string(),
                            name: "Points".to_string(),
                        }),
                        ..Default::default()
                    },
                    FieldValueNode {
                        date: Some("2026-08-01".to_string()),
                        field: Some(FieldRef {
                            id: "F_due".to_string(),
                            name: "Due".to_string(),
                        }),
                        ..Default::default()
                    },
                    // Unmatched fragment, arrives as an empty object.
                    FieldValueNode::default(),
                ],
            },
        };

        let rows = normalize_item(&test_project(), &OptionColors::new(), item);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].value, "needs triage");
        assert_eq!(rows[1].value, "5");
        assert_eq!(rows[2].value, "2026-08-01");
        assert!(rows.iter().all(|r| r.color.is_none()));
    }

    #[test]
    fn normalize_skips_non_issue_items() {
        let item = BoardItem {
            id: "PVTI_3".to_string(),
            content: None,
            field_values: ValueConn {
                nodes: vec![FieldValueNode {
                    text: Some("orphan".to_string()),
                    field: Some(FieldRef {
                        id: "F".to_string(),
                        name: "F".to_string(),
                    }),
                    ..Default::default()
                }],
            },
        };

        assert!(normalize_item(&test_project(), &OptionColors::new(), item).is_empty());
    }

    #[test]
    fn normalize_skips_closed_issues() {
        let colors = option_color_index(&[select_field()]);
        let item = BoardItem {
            id: "PVTI_4".to_string(),
            content: Some(BoardItemContent {
                id: Some("I_closed".to_string()),
                closed: true,
            }),
            field_values: ValueConn {
                nodes: vec![FieldValueNode {
                    name: Some("Done".to_string()),
                    option_id: Some("opt_done".to_string()),
                    field: Some(FieldRef {
                        id: "F_status".to_string(),
                        name: "Status".to_string(),
                    }),
                    ..Default::default()
                }],
            },
        };

        assert!(normalize_item(&test_project(), &colors, item).is_empty());
    }

    #[test]
    fn format_number_drops_integral_fraction() {
        assert_eq!(format_number(5.0), "5");
        assert_eq!(format_number(2.5), "2.5");
    }

    #[test]
    fn fields_response_parses_mixed_field_kinds() {
        let raw = r#"{
            "organization": {
                "projectV2": {
                    "fields": {
                        "nodes": [
                            {"id": "F_1", "name": "Title", "dataType": "TITLE"},
                            {"id": "F_2", "name": "Status",
                             "options": [{"id": "o1", "name": "Todo", "color": "GRAY"}]},
                            {}
                        ]
                    }
                }
            }
        }"#;

        let data: FieldsData = serde_json::from_str(raw).expect("fields payload parses");
        let nodes = data
            .organization
            .expect("org")
            .project_v2
            .expect("project")
            .fields
            .nodes;
        assert_eq!(nodes.len(), 3);
        assert!(nodes[1].options.is_some());
        assert!(nodes[2].id.is_none());
    }
}
