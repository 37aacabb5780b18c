//! Tag filter query builder.
//!
//! Compiles an [`IssueFilter`] into a single parameterized SELECT.
//! Filter values are always bound, never interpolated into the SQL
//! text. AND-tags use a grouped subquery with
//! `HAVING COUNT(DISTINCT tag) = n` so an issue must carry every
//! requested tag; OR-tags use a distinct existence join.

use chrono::NaiveDate;
use sea_orm::sea_query::{
    Alias, Cond, Expr, Func, JoinType, Order, Query, SelectStatement,
};
use sea_orm::{ConnectionTrait, DatabaseConnection, DeriveIden, FromQueryResult};

use crate::entity::{issue, issue_tag, pin};

use super::errors::{RepositoryError, Result};

#[derive(DeriveIden)]
#[sea_orm(iden = "group_concat")]
struct GroupConcat;

/// Issue state restriction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StateFilter {
    #[default]
    All,
    Open,
    Closed,
}

impl StateFilter {
    fn as_column_value(self) -> Option<&'static str> {
        match self {
            Self::All => None,
            Self::Open => Some("open"),
            Self::Closed => Some("closed"),
        }
    }
}

/// Declarative issue filter, compiled by [`find_filtered`].
#[derive(Debug, Clone, Default)]
pub struct IssueFilter {
    /// Issue must carry every one of these tags.
    pub and_tags: Vec<String>,
    /// Issue must carry at least one of these tags.
    pub or_tags: Vec<String>,
    pub state: StateFilter,
    /// Inclusive closed-date window. Issues that are still open (NULL
    /// closed_at) always pass this predicate.
    pub closed_between: Option<(NaiveDate, NaiveDate)>,
}

/// One row of a filtered listing.
#[derive(Debug, Clone, FromQueryResult)]
pub struct FilteredIssue {
    pub node_id: String,
    pub title: String,
    pub url: String,
    pub repo: String,
    pub assignee: String,
    pub state: String,
    pub assigned_date: Option<NaiveDate>,
    pub closed_at: Option<NaiveDate>,
    pub project_title: Option<String>,
    /// Comma-joined tag list, NULL for untagged issues.
    pub tags: Option<String>,
    pub pinned: bool,
}

impl FilteredIssue {
    /// Days the issue has been open, relative to `today`.
    pub fn aging_days(&self, today: NaiveDate) -> Option<i64> {
        self.assigned_date.map(|d| (today - d).num_days())
    }
}

fn tags_subquery() -> SelectStatement {
    Query::select()
        .column(issue_tag::Column::NodeId)
        .expr_as(
            Func::cust(GroupConcat).arg(Expr::col(issue_tag::Column::Tag)),
            Alias::new("tags"),
        )
        .from(issue_tag::Entity)
        .group_by_col(issue_tag::Column::NodeId)
        .to_owned()
}

fn and_tags_subquery(tags: &[String]) -> SelectStatement {
    Query::select()
        .column(issue_tag::Column::NodeId)
        .from(issue_tag::Entity)
        .and_where(Expr::col(issue_tag::Column::Tag).is_in(tags.iter().cloned()))
        .group_by_col(issue_tag::Column::NodeId)
        .and_having(
            Expr::expr(Func::count_distinct(Expr::col(issue_tag::Column::Tag)))
                .eq(tags.len() as i32),
        )
        .to_owned()
}

fn or_tags_subquery(tags: &[String]) -> SelectStatement {
    Query::select()
        .column(issue_tag::Column::NodeId)
        .distinct()
        .from(issue_tag::Entity)
        .and_where(Expr::col(issue_tag::Column::Tag).is_in(tags.iter().cloned()))
        .to_owned()
}

pub(crate) fn build_filter_query(filter: &IssueFilter) -> SelectStatement {
    let tag_list = Alias::new("tag_list");
    let mut select = Query::select();

    select
        .columns([
            (issue::Entity, issue::Column::NodeId),
            (issue::Entity, issue::Column::Title),
            (issue::Entity, issue::Column::Url),
            (issue::Entity, issue::Column::Repo),
            (issue::Entity, issue::Column::Assignee),
            (issue::Entity, issue::Column::State),
            (issue::Entity, issue::Column::AssignedDate),
            (issue::Entity, issue::Column::ClosedAt),
            (issue::Entity, issue::Column::ProjectTitle),
        ])
        .expr_as(
            Expr::col((tag_list.clone(), Alias::new("tags"))),
            Alias::new("tags"),
        )
        .expr_as(
            Expr::col((pin::Entity, pin::Column::NodeId)).is_not_null(),
            Alias::new("pinned"),
        )
        .from(issue::Entity)
        .join_subquery(
            JoinType::LeftJoin,
            tags_subquery(),
            tag_list.clone(),
            Expr::col((tag_list.clone(), issue_tag::Column::NodeId))
                .equals((issue::Entity, issue::Column::NodeId)),
        )
        .join(
            JoinType::LeftJoin,
            pin::Entity,
            Cond::all()
                .add(
                    Expr::col((pin::Entity, pin::Column::NodeId))
                        .equals((issue::Entity, issue::Column::NodeId)),
                )
                .add(Expr::col((pin::Entity, pin::Column::Deleted)).eq(false)),
        );

    if !filter.and_tags.is_empty() {
        let and_match = Alias::new("and_match");
        select.join_subquery(
            JoinType::InnerJoin,
            and_tags_subquery(&filter.and_tags),
            and_match.clone(),
            Expr::col((and_match, issue_tag::Column::NodeId))
                .equals((issue::Entity, issue::Column::NodeId)),
        );
    }

    if !filter.or_tags.is_empty() {
        let or_match = Alias::new("or_match");
        select.join_subquery(
            JoinType::InnerJoin,
            or_tags_subquery(&filter.or_tags),
            or_match.clone(),
            Expr::col((or_match, issue_tag::Column::NodeId))
                .equals((issue::Entity, issue::Column::NodeId)),
        );
    }

    if let Some(state) = filter.state.as_column_value() {
        select.and_where(Expr::col((issue::Entity, issue::Column::State)).eq(state));
    }

    if let Some((from, to)) = filter.closed_between {
        select.cond_where(
            Cond::any()
                .add(
                    Cond::all()
                        .add(Expr::col((issue::Entity, issue::Column::ClosedAt)).gte(from))
                        .add(Expr::col((issue::Entity, issue::Column::ClosedAt)).lte(to)),
                )
                .add(Expr::col((issue::Entity, issue::Column::ClosedAt)).is_null()),
        );
    }

    // Pinned rows first (a live pin join is non-NULL), then newest
    // assignments.
    select
        .order_by_expr(
            Expr::col((pin::Entity, pin::Column::NodeId)).is_null(),
            Order::Asc,
        )
        .order_by((issue::Entity, issue::Column::AssignedDate), Order::Desc);

    select.to_owned()
}

/// Run a compiled filter against the store.
pub async fn find_filtered(
    db: &DatabaseConnection,
    filter: &IssueFilter,
) -> Result<Vec<FilteredIssue>> {
    let select = build_filter_query(filter);
    let stmt = db.get_database_backend().build(&select);
    FilteredIssue::find_by_statement(stmt)
        .all(db)
        .await
        .map_err(RepositoryError::from)
}
