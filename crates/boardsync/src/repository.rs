//! Persistence layer over the mirrored issue store.
//!
//! Write operations are grouped by table ([`issues`], [`projects`],
//! [`status`], [`audit`], [`pins`]); the read side lives in [`query`]
//! and the tag-filter compiler in [`filter`].

pub mod audit;
pub mod filter;
pub mod issues;
pub mod pins;
pub mod projects;
pub mod query;
pub mod status;

mod errors;

pub use errors::{RepositoryError, Result};
pub use filter::{FilteredIssue, IssueFilter, StateFilter, find_filtered};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_database_from_db_err() {
        let db_err = sea_orm::DbErr::RecordNotFound("x".to_string());
        let err: RepositoryError = db_err.into();
        assert!(err.to_string().contains("Database error"));
    }
}
