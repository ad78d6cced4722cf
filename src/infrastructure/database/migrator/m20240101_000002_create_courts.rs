//! Create courts table
//!
//! A court either belongs to a complex or carries its own admin.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_complexes::Complexes;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Courts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Courts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Courts::Name).string().not_null())
                    .col(ColumnDef::new(Courts::ComplexId).integer())
                    .col(ColumnDef::new(Courts::AdminId).string())
                    .col(ColumnDef::new(Courts::DaytimeRate).big_integer())
                    .col(ColumnDef::new(Courts::NighttimeRate).big_integer())
                    .col(ColumnDef::new(Courts::CutoffHour).integer())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_courts_complex")
                            .from(Courts::Table, Courts::ComplexId)
                            .to(Complexes::Table, Complexes::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Courts::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Courts {
    Table,
    Id,
    Name,
    ComplexId,
    AdminId,
    DaytimeRate,
    NighttimeRate,
    CutoffHour,
}
