//! Integration tests for repository operations.
//!
//! These tests require the `migrate` feature and use an in-memory
//! SQLite database.

#![cfg(feature = "migrate")]

use boardsync::connect_and_migrate;
use boardsync::entity::{issue, issue_tag, project};
use boardsync::repository::{
    IssueFilter, StateFilter, audit, find_filtered, issues, pins, projects, query, status,
};
use chrono::{NaiveDate, Utc};
use sea_orm::{DatabaseConnection, Set};
use serde_json::json;

async fn setup_test_db() -> DatabaseConnection {
    connect_and_migrate("sqlite::memory:")
        .await
        .expect("Failed to create test database")
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn test_issue(node_id: &str, title: &str) -> issue::ActiveModel {
    issue::ActiveModel {
        node_id: Set(node_id.to_string()),
        external_id: Set(node_id.len() as i64),
        title: Set(title.to_string()),
        url: Set(format!("https://github.com/acme/webapp/issues/{node_id}")),
        repo: Set("webapp".to_string()),
        repo_url: Set("https://github.com/acme/webapp".to_string()),
        assignee: Set("mtorres".to_string()),
        state: Set("open".to_string()),
        assigned_date: Set(Some(date(2026, 8, 1))),
        closed_at: Set(None),
        last_updated_at: Set(None),
        project_id: Set(None),
        project_title: Set(None),
        raw_json: Set(json!({ "node_id": node_id })),
    }
}

fn tag(node_id: &str, name: &str) -> issue_tag::ActiveModel {
    issue_tag::ActiveModel {
        node_id: Set(node_id.to_string()),
        tag: Set(name.to_string()),
        color: Set("ededed".to_string()),
    }
}

async fn seed_issue(db: &DatabaseConnection, model: issue::ActiveModel, tags: &[&str]) {
    let node_id = match &model.node_id {
        sea_orm::ActiveValue::Set(id) => id.clone(),
        _ => panic!("node_id must be set"),
    };
    issues::upsert(db, model).await.unwrap();
    let tag_models = tags.iter().map(|t| tag(&node_id, t)).collect();
    issues::upsert_tags(db, tag_models).await.unwrap();
}

// ─── Upsert Tests ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_issue_upsert_is_idempotent() {
    let db = setup_test_db().await;

    issues::upsert(&db, test_issue("I_1", "first title")).await.unwrap();
    issues::upsert(&db, test_issue("I_1", "updated title")).await.unwrap();

    assert_eq!(issues::count(&db).await.unwrap(), 1);
    let stored = issues::find_by_node_id(&db, "I_1").await.unwrap().unwrap();
    assert_eq!(stored.title, "updated title");
}

#[tokio::test]
async fn test_tag_upsert_refreshes_color() {
    let db = setup_test_db().await;
    issues::upsert(&db, test_issue("I_1", "t")).await.unwrap();

    issues::upsert_tags(&db, vec![tag("I_1", "bug")]).await.unwrap();
    let mut recolored = tag("I_1", "bug");
    recolored.color = Set("d73a4a".to_string());
    issues::upsert_tags(&db, vec![recolored]).await.unwrap();

    let rows = find_filtered(&db, &IssueFilter::default()).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].tags.as_deref(), Some("bug"));
}

#[tokio::test]
async fn test_clear_removes_issues_and_tags() {
    let db = setup_test_db().await;
    seed_issue(&db, test_issue("I_1", "t"), &["bug"]).await;

    issues::clear(&db).await.unwrap();

    assert_eq!(issues::count(&db).await.unwrap(), 0);
    let rows = find_filtered(&db, &IssueFilter::default()).await.unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_count_unassigned() {
    let db = setup_test_db().await;
    let mut linked = test_issue("I_1", "linked");
    linked.project_id = Set(Some("PVT_1".to_string()));
    linked.project_title = Set(Some("Delivery".to_string()));
    issues::upsert(&db, linked).await.unwrap();
    issues::upsert(&db, test_issue("I_2", "loose")).await.unwrap();

    assert_eq!(issues::count_unassigned(&db).await.unwrap(), 1);
}

// ─── Filter Tests ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_and_tags_require_every_tag() {
    let db = setup_test_db().await;
    seed_issue(&db, test_issue("I_1", "both"), &["bug", "urgent"]).await;
    seed_issue(&db, test_issue("I_2", "only bug"), &["bug"]).await;
    seed_issue(&db, test_issue("I_3", "untagged"), &[]).await;

    let filter = IssueFilter {
        and_tags: vec!["bug".to_string(), "urgent".to_string()],
        ..Default::default()
    };
    let rows = find_filtered(&db, &filter).await.unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].node_id, "I_1");
}

#[tokio::test]
async fn test_or_tags_match_any_without_duplicates() {
    let db = setup_test_db().await;
    seed_issue(&db, test_issue("I_1", "both"), &["bug", "chore"]).await;
    seed_issue(&db, test_issue("I_2", "chore"), &["chore"]).await;
    seed_issue(&db, test_issue("I_3", "neither"), &["docs"]).await;

    let filter = IssueFilter {
        or_tags: vec!["bug".to_string(), "chore".to_string()],
        ..Default::default()
    };
    let rows = find_filtered(&db, &filter).await.unwrap();

    // I_1 carries both requested tags but must appear once.
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.node_id != "I_3"));
}

#[tokio::test]
async fn test_state_filter() {
    let db = setup_test_db().await;
    issues::upsert(&db, test_issue("I_1", "open one")).await.unwrap();
    let mut closed = test_issue("I_2", "closed one");
    closed.state = Set("closed".to_string());
    closed.closed_at = Set(Some(date(2026, 8, 5)));
    issues::upsert(&db, closed).await.unwrap();

    let open = find_filtered(
        &db,
        &IssueFilter {
            state: StateFilter::Open,
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].node_id, "I_1");

    let all = find_filtered(&db, &IssueFilter::default()).await.unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn test_closed_window_keeps_open_issues() {
    let db = setup_test_db().await;
    issues::upsert(&db, test_issue("I_open", "never closed")).await.unwrap();

    let mut inside = test_issue("I_inside", "closed in window");
    inside.state = Set("closed".to_string());
    inside.closed_at = Set(Some(date(2026, 6, 15)));
    issues::upsert(&db, inside).await.unwrap();

    let mut outside = test_issue("I_outside", "closed after window");
    outside.state = Set("closed".to_string());
    outside.closed_at = Set(Some(date(2026, 8, 1)));
    issues::upsert(&db, outside).await.unwrap();

    let filter = IssueFilter {
        closed_between: Some((date(2026, 6, 1), date(2026, 6, 30))),
        ..Default::default()
    };
    let rows = find_filtered(&db, &filter).await.unwrap();

    let ids: Vec<&str> = rows.iter().map(|r| r.node_id.as_str()).collect();
    assert!(ids.contains(&"I_open"));
    assert!(ids.contains(&"I_inside"));
    assert!(!ids.contains(&"I_outside"));
}

#[tokio::test]
async fn test_filter_aggregates_tags_per_row() {
    let db = setup_test_db().await;
    seed_issue(&db, test_issue("I_1", "tagged"), &["bug", "backend"]).await;

    let rows = find_filtered(&db, &IssueFilter::default()).await.unwrap();
    assert_eq!(rows.len(), 1);
    let tags = rows[0].tags.as_deref().expect("tags aggregated");
    assert!(tags.contains("bug"));
    assert!(tags.contains("backend"));
}

#[tokio::test]
async fn test_pinned_issues_sort_first() {
    let db = setup_test_db().await;

    let mut old = test_issue("I_old", "old but pinned");
    old.assigned_date = Set(Some(date(2026, 1, 1)));
    issues::upsert(&db, old).await.unwrap();

    let mut new = test_issue("I_new", "newer, unpinned");
    new.assigned_date = Set(Some(date(2026, 8, 10)));
    issues::upsert(&db, new).await.unwrap();

    pins::pin(&db, "I_old", Utc::now().naive_utc()).await.unwrap();

    let rows = find_filtered(&db, &IssueFilter::default()).await.unwrap();
    assert_eq!(rows[0].node_id, "I_old");
    assert!(rows[0].pinned);
    assert_eq!(rows[1].node_id, "I_new");
    assert!(!rows[1].pinned);
}

#[tokio::test]
async fn test_unpinned_issue_loses_priority() {
    let db = setup_test_db().await;

    let mut old = test_issue("I_old", "old");
    old.assigned_date = Set(Some(date(2026, 1, 1)));
    issues::upsert(&db, old).await.unwrap();
    let mut new = test_issue("I_new", "new");
    new.assigned_date = Set(Some(date(2026, 8, 10)));
    issues::upsert(&db, new).await.unwrap();

    pins::pin(&db, "I_old", Utc::now().naive_utc()).await.unwrap();
    assert!(pins::unpin(&db, "I_old").await.unwrap());

    let rows = find_filtered(&db, &IssueFilter::default()).await.unwrap();
    assert_eq!(rows[0].node_id, "I_new");
    assert!(!rows[0].pinned);
}

// ─── Pin Tests ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_repin_revives_soft_deleted_pin() {
    let db = setup_test_db().await;
    issues::upsert(&db, test_issue("I_1", "t")).await.unwrap();

    let first = Utc::now().naive_utc();
    pins::pin(&db, "I_1", first).await.unwrap();
    pins::unpin(&db, "I_1").await.unwrap();
    assert!(pins::list(&db).await.unwrap().is_empty());

    pins::pin(&db, "I_1", first + chrono::Duration::hours(1)).await.unwrap();
    let live = pins::list(&db).await.unwrap();
    assert_eq!(live.len(), 1);
    // Revival keeps the original creation timestamp.
    assert_eq!(live[0].created_at, first);
}

#[tokio::test]
async fn test_unpin_without_pin_reports_false() {
    let db = setup_test_db().await;
    assert!(!pins::unpin(&db, "I_missing").await.unwrap());
}

// ─── Project and Read-Query Tests ────────────────────────────────────────────

#[tokio::test]
async fn test_find_by_project_unassigned_sentinel() {
    let db = setup_test_db().await;
    let mut linked = test_issue("I_1", "linked");
    linked.project_id = Set(Some("PVT_1".to_string()));
    linked.project_title = Set(Some("Delivery".to_string()));
    issues::upsert(&db, linked).await.unwrap();
    issues::upsert(&db, test_issue("I_2", "loose")).await.unwrap();

    let loose = query::find_by_project(&db, project::UNASSIGNED).await.unwrap();
    assert_eq!(loose.len(), 1);
    assert_eq!(loose[0].node_id, "I_2");

    let linked = query::find_by_project(&db, "Delivery").await.unwrap();
    assert_eq!(linked.len(), 1);
    assert_eq!(linked[0].node_id, "I_1");
}

#[tokio::test]
async fn test_count_by_assignee_counts_open_only() {
    let db = setup_test_db().await;
    issues::upsert(&db, test_issue("I_1", "a")).await.unwrap();
    issues::upsert(&db, test_issue("I_2", "b")).await.unwrap();

    let mut other = test_issue("I_3", "c");
    other.assignee = Set("jsmith".to_string());
    issues::upsert(&db, other).await.unwrap();

    let mut closed = test_issue("I_4", "d");
    closed.state = Set("closed".to_string());
    issues::upsert(&db, closed).await.unwrap();

    let counts = query::count_by_assignee(&db).await.unwrap();
    assert_eq!(
        counts,
        vec![("jsmith".to_string(), 1), ("mtorres".to_string(), 2)]
    );
}

#[tokio::test]
async fn test_project_upsert_refreshes_rollup() {
    let db = setup_test_db().await;

    let rollup = |count: i32| project::ActiveModel {
        external_id: Set(project::UNASSIGNED.to_string()),
        title: Set(project::UNASSIGNED.to_string()),
        url: Set("https://github.com/orgs/acme".to_string()),
        closed: Set(false),
        issue_count: Set(count),
    };
    projects::upsert(&db, rollup(3)).await.unwrap();
    projects::upsert(&db, rollup(7)).await.unwrap();

    let all = projects::list(&db).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].issue_count, 7);
}

// ─── Status and Audit Tests ──────────────────────────────────────────────────

#[tokio::test]
async fn test_status_replace_for_issue_project() {
    let db = setup_test_db().await;
    issues::upsert(&db, test_issue("I_1", "t")).await.unwrap();

    let row = |field_id: &str, value: &str| {
        boardsync::entity::issue_project_status::ActiveModel {
            node_id: Set("I_1".to_string()),
            project_id: Set("PVT_1".to_string()),
            field_id: Set(field_id.to_string()),
            field_name: Set("Status".to_string()),
            value: Set(value.to_string()),
            color: Set(None),
            item_id: Set("PVTI_1".to_string()),
        }
    };

    status::replace_for_issue_project(&db, "I_1", "PVT_1", vec![row("F_1", "Todo")])
        .await
        .unwrap();
    status::replace_for_issue_project(&db, "I_1", "PVT_1", vec![row("F_1", "Done")])
        .await
        .unwrap();

    let rows = status::find_by_issue(&db, "I_1").await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].value, "Done");
}

#[tokio::test]
async fn test_audit_last_run_picks_latest_for_action() {
    let db = setup_test_db().await;
    let base = date(2026, 8, 1).and_hms_opt(9, 0, 0).unwrap();

    audit::record(&db, "RETRIEVE FROM GITHUB", base, base + chrono::Duration::minutes(5))
        .await
        .unwrap();
    audit::record(
        &db,
        "RETRIEVE FROM GITHUB",
        base + chrono::Duration::hours(2),
        base + chrono::Duration::hours(2) + chrono::Duration::minutes(4),
    )
    .await
    .unwrap();
    audit::record(&db, "PROJECT_BOARD_STATUS_IMPORT", base, base).await.unwrap();

    let last = audit::last_run(&db, "RETRIEVE FROM GITHUB").await.unwrap().unwrap();
    assert_eq!(last.start_time, base + chrono::Duration::hours(2));

    assert!(
        audit::last_run(&db, "SOMETHING ELSE").await.unwrap().is_none(),
        "unknown action has no runs"
    );
}

#[tokio::test]
async fn test_repository_error_on_duplicate_plain_insert() {
    let db = setup_test_db().await;
    issues::upsert(&db, test_issue("I_1", "t")).await.unwrap();

    // A second upsert must not error; the conflict clause absorbs it.
    let result = issues::upsert(&db, test_issue("I_1", "t2")).await;
    assert!(result.is_ok());
}
