//! Initial schema: issues, projects, tags, board status, pins, audit.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Issues::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Issues::NodeId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Issues::ExternalId).big_integer().not_null())
                    .col(ColumnDef::new(Issues::Title).string().not_null())
                    .col(ColumnDef::new(Issues::Url).string().not_null())
                    .col(ColumnDef::new(Issues::Repo).string().not_null())
                    .col(ColumnDef::new(Issues::RepoUrl).string().not_null())
                    .col(ColumnDef::new(Issues::Assignee).string().not_null())
                    .col(ColumnDef::new(Issues::State).string().not_null())
                    .col(ColumnDef::new(Issues::AssignedDate).date())
                    .col(ColumnDef::new(Issues::ClosedAt).date())
                    .col(ColumnDef::new(Issues::LastUpdatedAt).date_time())
                    .col(ColumnDef::new(Issues::ProjectId).string())
                    .col(ColumnDef::new(Issues::ProjectTitle).string())
                    .col(ColumnDef::new(Issues::RawJson).json().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_issues_project_id")
                    .table(Issues::Table)
                    .col(Issues::ProjectId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_issues_assignee")
                    .table(Issues::Table)
                    .col(Issues::Assignee)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Project::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Project::ExternalId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Project::Title).string().not_null())
                    .col(ColumnDef::new(Project::Url).string().not_null())
                    .col(ColumnDef::new(Project::Closed).boolean().not_null())
                    .col(ColumnDef::new(Project::IssueCount).integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(IssueTags::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(IssueTags::NodeId).string().not_null())
                    .col(ColumnDef::new(IssueTags::Tag).string().not_null())
                    .col(ColumnDef::new(IssueTags::Color).string().not_null())
                    .primary_key(
                        Index::create()
                            .col(IssueTags::NodeId)
                            .col(IssueTags::Tag),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_issue_tags_tag")
                    .table(IssueTags::Table)
                    .col(IssueTags::Tag)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(IssueProjectStatus::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(IssueProjectStatus::NodeId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(IssueProjectStatus::ProjectId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(IssueProjectStatus::FieldId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(IssueProjectStatus::FieldName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(IssueProjectStatus::Value).string().not_null())
                    .col(ColumnDef::new(IssueProjectStatus::Color).string())
                    .col(
                        ColumnDef::new(IssueProjectStatus::ItemId)
                            .string()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(IssueProjectStatus::NodeId)
                            .col(IssueProjectStatus::ProjectId)
                            .col(IssueProjectStatus::FieldId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Pins::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Pins::NodeId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Pins::Deleted).boolean().not_null())
                    .col(ColumnDef::new(Pins::CreatedAt).date_time().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AuditRun::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AuditRun::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AuditRun::Action).string().not_null())
                    .col(ColumnDef::new(AuditRun::StartTime).date_time().not_null())
                    .col(ColumnDef::new(AuditRun::EndTime).date_time().not_null())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AuditRun::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Pins::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(IssueProjectStatus::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(IssueTags::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Project::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Issues::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Issues {
    Table,
    NodeId,
    ExternalId,
    Title,
    Url,
    Repo,
    RepoUrl,
    Assignee,
    State,
    AssignedDate,
    ClosedAt,
    LastUpdatedAt,
    ProjectId,
    ProjectTitle,
    RawJson,
}

#[derive(DeriveIden)]
enum Project {
    Table,
    ExternalId,
    Title,
    Url,
    Closed,
    IssueCount,
}

#[derive(DeriveIden)]
enum IssueTags {
    Table,
    NodeId,
    Tag,
    Color,
}

#[derive(DeriveIden)]
enum IssueProjectStatus {
    Table,
    NodeId,
    ProjectId,
    FieldId,
    FieldName,
    Value,
    Color,
    ItemId,
}

#[derive(DeriveIden)]
enum Pins {
    Table,
    NodeId,
    Deleted,
    CreatedAt,
}

#[derive(DeriveIden)]
enum AuditRun {
    Table,
    Id,
    Action,
    StartTime,
    EndTime,
}
