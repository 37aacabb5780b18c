//! Common re-exports for convenient entity usage.

pub use super::audit_run::{
    ActiveModel as AuditRunActiveModel, Column as AuditRunColumn, Entity as AuditRun,
    Model as AuditRunModel,
};
pub use super::issue::{
    ActiveModel as IssueActiveModel, Column as IssueColumn, Entity as Issue, Model as IssueModel,
};
pub use super::issue_project_status::{
    ActiveModel as IssueProjectStatusActiveModel, Column as IssueProjectStatusColumn,
    Entity as IssueProjectStatus, Model as IssueProjectStatusModel,
};
pub use super::issue_tag::{
    ActiveModel as IssueTagActiveModel, Column as IssueTagColumn, Entity as IssueTag,
    Model as IssueTagModel,
};
pub use super::pin::{
    ActiveModel as PinActiveModel, Column as PinColumn, Entity as Pin, Model as PinModel,
};
pub use super::project::{
    ActiveModel as ProjectActiveModel, Column as ProjectColumn, Entity as Project,
    Model as ProjectModel,
};
