//! Court entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "courts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    #[sea_orm(nullable)]
    pub complex_id: Option<i32>,

    /// Administrator of a standalone court
    #[sea_orm(nullable)]
    pub admin_id: Option<String>,

    #[sea_orm(nullable)]
    pub daytime_rate: Option<i64>,
    #[sea_orm(nullable)]
    pub nighttime_rate: Option<i64>,

    #[sea_orm(nullable)]
    pub cutoff_hour: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::complex::Entity",
        from = "Column::ComplexId",
        to = "super::complex::Column::Id"
    )]
    Complex,
    #[sea_orm(has_many = "super::slot::Entity")]
    Slots,
}

impl Related<super::complex::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Complex.def()
    }
}

impl Related<super::slot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Slots.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
