use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "rfid_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub tag_id: String,
    pub reader: String,
    pub kandang: Option<String>,
    pub scanned_at: DateTime,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
