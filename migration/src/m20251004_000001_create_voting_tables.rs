use sea_orm_migration::prelude::*;

/// Events (投票轮次，约定同一时间最多一个 active)
#[derive(DeriveIden)]
enum Events {
    Table,
    Id,
    Name,
    Active,
    CreatedAt,
}

/// Locations (可投票的 场地/艺术家，由外部管理流程维护)
#[derive(DeriveIden)]
enum Locations {
    Table,
    Id,
    Name,
    Artist,
    Weight,
    EventId,
}

/// Submissions (每次投票行为一条)
#[derive(DeriveIden)]
enum Submissions {
    Table,
    Id,
    EventId,
    SubmissionToken,
    SubmittedAt,
}

/// Votes (一次投票内每个地点的得分)
#[derive(DeriveIden)]
enum Votes {
    Table,
    Id,
    SubmissionId,
    LocationId,
    Points,
    Comment,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Events::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Events::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Events::Name).string().not_null())
                    .col(
                        ColumnDef::new(Events::Active)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Events::CreatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Locations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Locations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Locations::Name).string().not_null())
                    .col(ColumnDef::new(Locations::Artist).string().not_null())
                    .col(
                        ColumnDef::new(Locations::Weight)
                            .double()
                            .not_null()
                            .default(1.0),
                    )
                    .col(ColumnDef::new(Locations::EventId).integer())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_locations_event_id")
                            .from(Locations::Table, Locations::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Submissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Submissions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Submissions::EventId).integer())
                    .col(
                        ColumnDef::new(Submissions::SubmissionToken)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Submissions::SubmittedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_submissions_event_id")
                            .from(Submissions::Table, Submissions::EventId)
                            .to(Events::Table, Events::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Votes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Votes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Votes::SubmissionId).integer().not_null())
                    .col(ColumnDef::new(Votes::LocationId).integer().not_null())
                    .col(ColumnDef::new(Votes::Points).integer().not_null())
                    .col(ColumnDef::new(Votes::Comment).text())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_votes_submission_id")
                            .from(Votes::Table, Votes::SubmissionId)
                            .to(Submissions::Table, Submissions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_votes_location_id")
                            .from(Votes::Table, Votes::LocationId)
                            .to(Locations::Table, Locations::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // 一次投票内同一地点只能出现一次
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_votes_submission_location_unique")
                    .table(Votes::Table)
                    .col(Votes::SubmissionId)
                    .col(Votes::LocationId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_votes_location_id")
                    .table(Votes::Table)
                    .col(Votes::LocationId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_locations_event_id")
                    .table(Locations::Table)
                    .col(Locations::EventId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Votes::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Submissions::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Locations::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Events::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}
