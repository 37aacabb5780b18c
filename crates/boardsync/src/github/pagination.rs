//! Generic cursor walker with runaway-loop protection.
//!
//! GraphQL connections paginate with opaque cursors. The walker
//! enforces a page ceiling so a misbehaving endpoint cannot spin
//! forever and detects a cursor that fails to advance. The REST issue
//! feed paginates by 1-based page number instead; that loop lives in
//! the sync engine, which needs per-page failure handling the generic
//! walker does not.

use std::future::Future;

use super::error::{GitHubError, Result};

/// Default safety ceiling on pages fetched by a single walk.
pub const MAX_PAGES: u32 = 50;

/// One page of a cursor-paginated GraphQL connection.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub nodes: Vec<T>,
    pub has_next: bool,
    pub end_cursor: Option<String>,
}

/// Walk a cursor-paginated connection, handing each page of nodes to
/// `on_page` as it arrives.
///
/// Pages applied before a failure stay applied; callers that want
/// partial results on error accumulate inside `on_page`.
///
/// # Errors
/// - `PaginationStalled` if the endpoint returns the cursor it was just
///   given while claiming more pages exist.
/// - `PageLimitExceeded` once `page_limit` pages have been fetched.
pub async fn walk_cursor_with<T, F, Fut>(
    page_limit: u32,
    mut fetch: F,
    mut on_page: impl FnMut(Vec<T>),
) -> Result<()>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut cursor: Option<String> = None;
    let mut pages = 0u32;

    loop {
        if pages >= page_limit {
            return Err(GitHubError::PageLimitExceeded { limit: page_limit });
        }
        let page = fetch(cursor.clone()).await?;
        pages += 1;
        on_page(page.nodes);

        if !page.has_next {
            return Ok(());
        }
        match page.end_cursor {
            Some(next) => {
                if cursor.as_deref() == Some(next.as_str()) {
                    return Err(GitHubError::PaginationStalled { cursor: next });
                }
                cursor = Some(next);
            }
            None => {
                return Err(GitHubError::decode(
                    "hasNextPage set but endCursor missing",
                ));
            }
        }
    }
}
