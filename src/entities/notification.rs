use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A reminder record. Writing one schedules nothing; delivery is external.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: Option<i32>,
    pub kind: String,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub message: String,
    pub scheduled_for: Option<DateTime>,
    /// Set on feeding reminders; replaced whenever the schedule changes.
    pub schedule_id: Option<i32>,
    pub read: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
