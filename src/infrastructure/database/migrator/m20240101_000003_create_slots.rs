//! Create slots table

use sea_orm_migration::prelude::*;

use super::m20240101_000002_create_courts::Courts;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Slots::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Slots::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Slots::CourtId).integer().not_null())
                    .col(ColumnDef::new(Slots::Date).date().not_null())
                    .col(ColumnDef::new(Slots::StartTime).time().not_null())
                    .col(ColumnDef::new(Slots::EndTime).time().not_null())
                    .col(
                        ColumnDef::new(Slots::Price)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Slots::Period)
                            .string_len(20)
                            .not_null()
                            .default("Daytime"),
                    )
                    .col(
                        ColumnDef::new(Slots::Status)
                            .string_len(20)
                            .not_null()
                            .default("Available"),
                    )
                    .col(ColumnDef::new(Slots::ReservationItemId).integer())
                    .col(
                        ColumnDef::new(Slots::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Slots::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_slots_court")
                            .from(Slots::Table, Slots::CourtId)
                            .to(Courts::Table, Courts::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_slots_court_date")
                    .table(Slots::Table)
                    .col(Slots::CourtId)
                    .col(Slots::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_slots_status")
                    .table(Slots::Table)
                    .col(Slots::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Slots::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Slots {
    Table,
    Id,
    CourtId,
    Date,
    StartTime,
    EndTime,
    Price,
    Period,
    Status,
    ReservationItemId,
    CreatedAt,
    UpdatedAt,
}
