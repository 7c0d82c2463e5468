use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Deserialize, Serialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum LivestockType {
    #[sea_orm(string_value = "cattle")]
    Cattle,
    #[sea_orm(string_value = "goat")]
    Goat,
    #[sea_orm(string_value = "sheep")]
    Sheep,
    #[sea_orm(string_value = "other")]
    Other,
}

impl LivestockType {
    /// Prefix of the human-facing `animal_id` display code.
    pub fn code_prefix(self) -> &'static str {
        match self {
            LivestockType::Cattle => "CTL",
            LivestockType::Goat => "GOT",
            LivestockType::Sheep => "SHP",
            LivestockType::Other => "OTH",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Deserialize, Serialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[sea_orm(string_value = "male")]
    Male,
    #[sea_orm(string_value = "female")]
    Female,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Deserialize, Serialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum LivestockStatus {
    #[sea_orm(string_value = "healthy")]
    Healthy,
    #[sea_orm(string_value = "sick")]
    Sick,
    #[sea_orm(string_value = "quarantine")]
    Quarantine,
    #[sea_orm(string_value = "deceased")]
    Deceased,
    // Only set by the checkout workflow.
    #[sea_orm(string_value = "sold")]
    Sold,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "animals")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub tag_id: String,
    pub animal_id: Option<String>,
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub livestock_type: LivestockType,
    pub breed: String,
    pub gender: Gender,
    pub date_of_birth: Date,
    pub weight: f64,
    pub status: LivestockStatus,
    /// Name of the kandang the animal lives in. Matched by string, never enforced.
    pub location: String,
    pub photo_url: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub purchase_date: Option<Date>,
    pub purchase_price: Option<f64>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
