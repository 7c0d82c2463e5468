use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// `planned -> pregnant -> {delivered, failed}`, but any value may be set at any time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Deserialize, Serialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum BreedingStatus {
    #[sea_orm(string_value = "planned")]
    Planned,
    #[sea_orm(string_value = "pregnant")]
    Pregnant,
    #[sea_orm(string_value = "delivered")]
    Delivered,
    #[sea_orm(string_value = "failed")]
    Failed,
}

impl BreedingStatus {
    pub fn is_active(self) -> bool {
        matches!(self, BreedingStatus::Planned | BreedingStatus::Pregnant)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "breeding_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub mother_id: i32,
    pub father_id: Option<i32>,
    pub breeding_date: Date,
    pub expected_delivery_date: Date,
    pub actual_delivery_date: Option<Date>,
    pub status: BreedingStatus,
    pub number_of_offspring: Option<i32>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
