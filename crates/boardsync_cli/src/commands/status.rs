use boardsync::db;
use boardsync::entity::audit_run::{ACTION_BOARD_IMPORT, ACTION_RETRIEVE};
use boardsync::repository::{audit, issues, pins, projects, query, status};

/// One project row of the status table.
#[derive(Debug, Clone, tabled::Tabled)]
struct ProjectRow {
    #[tabled(rename = "Project")]
    title: String,
    #[tabled(rename = "Issues")]
    issues: i32,
    #[tabled(rename = "URL")]
    url: String,
}

#[derive(Debug, Clone, tabled::Tabled)]
struct WorkloadRow {
    #[tabled(rename = "Assignee")]
    assignee: String,
    #[tabled(rename = "Open Issues")]
    open_issues: i64,
}

pub(crate) async fn handle_status(database_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let db = db::connect(database_url).await?;

    let issue_count = issues::count(&db).await?;
    let status_count = status::count(&db).await?;
    let pin_count = pins::list(&db).await?.len();

    println!("Mirror status");
    println!("  issues:        {issue_count}");
    println!("  board values:  {status_count}");
    println!("  pins:          {pin_count}");

    match audit::last_run(&db, ACTION_RETRIEVE).await? {
        Some(run) => println!("  last sync:     {}", run.end_time),
        None => println!("  last sync:     never"),
    }
    match audit::last_run(&db, ACTION_BOARD_IMPORT).await? {
        Some(run) => println!("  last board:    {}", run.end_time),
        None => println!("  last board:    never"),
    }

    let all_projects = projects::list(&db).await?;
    if !all_projects.is_empty() {
        let rows: Vec<ProjectRow> = all_projects
            .into_iter()
            .map(|p| ProjectRow {
                title: p.title,
                issues: p.issue_count,
                url: p.url,
            })
            .collect();
        let mut table = tabled::Table::new(rows);
        table.with(tabled::settings::Style::rounded());
        println!("{table}");
    }

    Ok(())
}

pub(crate) async fn handle_workload(database_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let db = db::connect(database_url).await?;

    let counts = query::count_by_assignee(&db).await?;
    if counts.is_empty() {
        println!("No open issues.");
        return Ok(());
    }

    let rows: Vec<WorkloadRow> = counts
        .into_iter()
        .map(|(assignee, open_issues)| WorkloadRow {
            assignee,
            open_issues,
        })
        .collect();
    let mut table = tabled::Table::new(rows);
    table.with(tabled::settings::Style::rounded());
    println!("{table}");

    Ok(())
}
