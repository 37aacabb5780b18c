use boardsync::db;
use boardsync::repository::{issues, pins};
use chrono::Utc;

pub(crate) async fn handle_pin(
    database_url: &str,
    node_id: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = db::connect(database_url).await?;

    if !issues::exists(&db, node_id).await? {
        return Err(format!("no mirrored issue with node id '{node_id}'").into());
    }

    pins::pin(&db, node_id, Utc::now().naive_utc()).await?;
    println!("Pinned {node_id}.");
    Ok(())
}

pub(crate) async fn handle_unpin(
    database_url: &str,
    node_id: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = db::connect(database_url).await?;

    if pins::unpin(&db, node_id).await? {
        println!("Unpinned {node_id}.");
    } else {
        println!("{node_id} was not pinned.");
    }
    Ok(())
}
