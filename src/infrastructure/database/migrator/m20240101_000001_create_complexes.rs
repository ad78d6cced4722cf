//! Create complexes table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Complexes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Complexes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Complexes::Name).string().not_null())
                    .col(ColumnDef::new(Complexes::AdminId).string().not_null())
                    .col(ColumnDef::new(Complexes::DaytimeRate).big_integer())
                    .col(ColumnDef::new(Complexes::NighttimeRate).big_integer())
                    .col(ColumnDef::new(Complexes::CutoffHour).integer())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Complexes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Complexes {
    Table,
    Id,
    Name,
    AdminId,
    DaytimeRate,
    NighttimeRate,
    CutoffHour,
}
