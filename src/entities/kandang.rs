use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::layout::GridPoint;

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Deserialize, Serialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
#[serde(rename_all = "lowercase")]
pub enum KandangType {
    #[sea_orm(string_value = "cow")]
    Cow,
    #[sea_orm(string_value = "goat")]
    Goat,
    #[sea_orm(string_value = "mixed")]
    Mixed,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "kandang")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub capacity: i32,
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub kandang_type: KandangType,
    /// Zone label, e.g. "Blok A".
    pub location: String,
    // Display values only, not a sensor feed.
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub food_spot_x: i32,
    pub food_spot_y: i32,
    pub water_spot_x: i32,
    pub water_spot_y: i32,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Model {
    pub fn food_spot(&self) -> GridPoint {
        GridPoint::new(self.food_spot_x, self.food_spot_y)
    }

    /// The water spot doubles as the entrance marker in the layout editor.
    pub fn entrance(&self) -> GridPoint {
        GridPoint::new(self.water_spot_x, self.water_spot_y)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
