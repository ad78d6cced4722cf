//! Create reservations and reservation_items tables
//!
//! `reservation_items.active_slot_id` carries a unique index: it holds the
//! slot id while the item is active and NULL once released, so a slot can be
//! bound by at most one active item.

use sea_orm_migration::prelude::*;

use super::m20240101_000003_create_slots::Slots;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reservations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reservations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reservations::UserId).string().not_null())
                    .col(
                        ColumnDef::new(Reservations::State)
                            .string_len(20)
                            .not_null()
                            .default("Pending"),
                    )
                    .col(
                        ColumnDef::new(Reservations::Total)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Reservations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reservations::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_user")
                    .table(Reservations::Table)
                    .col(Reservations::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ReservationItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ReservationItems::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ReservationItems::ReservationId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ReservationItems::SlotId).integer().not_null())
                    .col(
                        ColumnDef::new(ReservationItems::LockedPrice)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ReservationItems::ActiveSlotId).integer())
                    .col(ColumnDef::new(ReservationItems::ReleasedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservation_items_reservation")
                            .from(ReservationItems::Table, ReservationItems::ReservationId)
                            .to(Reservations::Table, Reservations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservation_items_slot")
                            .from(ReservationItems::Table, ReservationItems::SlotId)
                            .to(Slots::Table, Slots::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reservation_items_active_slot")
                    .table(ReservationItems::Table)
                    .col(ReservationItems::ActiveSlotId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reservation_items_reservation")
                    .table(ReservationItems::Table)
                    .col(ReservationItems::ReservationId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ReservationItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Reservations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Reservations {
    Table,
    Id,
    UserId,
    State,
    Total,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub enum ReservationItems {
    Table,
    Id,
    ReservationId,
    SlotId,
    LockedPrice,
    ActiveSlotId,
    ReleasedAt,
}
