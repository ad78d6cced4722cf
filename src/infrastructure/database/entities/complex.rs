//! Complex entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "complexes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    /// Administrator of every court in the complex
    pub admin_id: String,

    /// Hourly rates in the smallest currency unit
    #[sea_orm(nullable)]
    pub daytime_rate: Option<i64>,
    #[sea_orm(nullable)]
    pub nighttime_rate: Option<i64>,

    #[sea_orm(nullable)]
    pub cutoff_hour: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::court::Entity")]
    Courts,
}

impl Related<super::court::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Courts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
