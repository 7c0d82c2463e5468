use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Deserialize, Serialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum HealthRecordType {
    #[sea_orm(string_value = "vaccination")]
    Vaccination,
    #[sea_orm(string_value = "treatment")]
    Treatment,
    #[sea_orm(string_value = "checkup")]
    Checkup,
    #[sea_orm(string_value = "diagnosis")]
    Diagnosis,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Deserialize, Serialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum HealthRecordStatus {
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "ongoing")]
    Ongoing,
    #[sea_orm(string_value = "scheduled")]
    Scheduled,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "health_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub livestock_id: i32,
    pub date: Date,
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub record_type: HealthRecordType,
    pub status: HealthRecordStatus,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub next_checkup: Option<Date>,
    pub veterinarian: Option<String>,
    pub medication: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
