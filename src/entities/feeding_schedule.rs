use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::livestock::LivestockType;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "feedingSchedules")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    /// Time of day the feeding recurs.
    pub time: Time,
    pub food_type: String,
    pub quantity: f64,
    pub unit: String,
    /// `None` targets every livestock type.
    pub livestock_type: Option<LivestockType>,
    pub kandang: Option<String>,
    pub notify_before_minutes: Option<i32>,
    pub is_active: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
