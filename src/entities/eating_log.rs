use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "eating_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub tag_id: String,
    pub kandang: Option<String>,
    pub started_at: DateTime,
    pub duration_seconds: i32,
    pub amount: Option<f64>,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
