//! SeaORM entity definitions for the boardsync database schema.

pub mod audit_run;
pub mod issue;
pub mod issue_project_status;
pub mod issue_tag;
pub mod pin;
pub mod prelude;
pub mod project;
