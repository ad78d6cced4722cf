//! Slot entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Slot occupancy as stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum SlotStatus {
    #[sea_orm(string_value = "Available")]
    Available,
    #[sea_orm(string_value = "Reserved")]
    Reserved,
    #[sea_orm(string_value = "Blocked")]
    Blocked,
}

/// Tariff period as stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum Period {
    #[sea_orm(string_value = "Daytime")]
    Daytime,
    #[sea_orm(string_value = "Nighttime")]
    Nighttime,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "slots")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub court_id: i32,
    pub date: Date,
    pub start_time: Time,
    /// `end_time <= start_time` means the slot runs past midnight
    pub end_time: Time,

    /// Price in the smallest currency unit
    pub price: i64,
    pub period: Period,
    pub status: SlotStatus,

    /// Active reservation item holding the slot, set iff `status` is Reserved
    #[sea_orm(nullable)]
    pub reservation_item_id: Option<i32>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::court::Entity",
        from = "Column::CourtId",
        to = "super::court::Column::Id"
    )]
    Court,
}

impl Related<super::court::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Court.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
