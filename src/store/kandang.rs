use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, QueryOrder, Set};
use serde::Deserialize;

use super::{now, FarmStore, StoreError, StoreResult};
use crate::entities::kandang::{self, KandangType};
use crate::entities::Kandang;
use crate::layout::{GridPoint, DEFAULT_ENTRANCE, DEFAULT_FOOD_SPOT};

#[derive(Clone, Debug, Deserialize)]
pub struct NewKandang {
    pub name: String,
    pub capacity: i32,
    #[serde(rename = "type")]
    pub kandang_type: KandangType,
    pub location: String,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub food_spot: Option<GridPoint>,
    pub water_spot: Option<GridPoint>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct KandangPatch {
    pub name: Option<String>,
    pub capacity: Option<i32>,
    #[serde(rename = "type")]
    pub kandang_type: Option<KandangType>,
    pub location: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub temperature: Option<Option<f64>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub humidity: Option<Option<f64>>,
}

fn validate_name(name: &str) -> StoreResult<()> {
    if name.trim().is_empty() {
        return Err(StoreError::invalid("name", "must not be empty"));
    }
    Ok(())
}

fn validate_capacity(capacity: i32) -> StoreResult<()> {
    if capacity <= 0 {
        return Err(StoreError::invalid("capacity", format!("{capacity} is not positive")));
    }
    Ok(())
}

fn set_spots(model: &mut kandang::ActiveModel, food: GridPoint, entrance: GridPoint) {
    let food = food.clamped();
    let entrance = entrance.clamped();
    model.food_spot_x = Set(food.x);
    model.food_spot_y = Set(food.y);
    model.water_spot_x = Set(entrance.x);
    model.water_spot_y = Set(entrance.y);
}

impl FarmStore {
    pub async fn create_kandang(&self, new: NewKandang) -> StoreResult<kandang::Model> {
        validate_name(&new.name)?;
        validate_capacity(new.capacity)?;

        let now = now();
        let mut model = kandang::ActiveModel {
            name: Set(new.name),
            capacity: Set(new.capacity),
            kandang_type: Set(new.kandang_type),
            location: Set(new.location),
            temperature: Set(new.temperature),
            humidity: Set(new.humidity),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        set_spots(
            &mut model,
            new.food_spot.unwrap_or(DEFAULT_FOOD_SPOT),
            new.water_spot.unwrap_or(DEFAULT_ENTRANCE),
        );

        let created = self.call("create_kandang", model.insert(self.connection())).await?;
        tracing::info!(kandang_id = created.id, name = %created.name, "kandang created");
        Ok(created)
    }

    pub async fn update_kandang(
        &self,
        id: i32,
        patch: KandangPatch,
    ) -> StoreResult<kandang::Model> {
        if let Some(name) = &patch.name {
            validate_name(name)?;
        }
        if let Some(capacity) = patch.capacity {
            validate_capacity(capacity)?;
        }
        let current = self.get::<Kandang>(id).await?;
        let mut model = current.into_active_model();
        if let Some(name) = patch.name {
            model.name = Set(name);
        }
        if let Some(capacity) = patch.capacity {
            model.capacity = Set(capacity);
        }
        if let Some(kind) = patch.kandang_type {
            model.kandang_type = Set(kind);
        }
        if let Some(location) = patch.location {
            model.location = Set(location);
        }
        if let Some(temperature) = patch.temperature {
            model.temperature = Set(temperature);
        }
        if let Some(humidity) = patch.humidity {
            model.humidity = Set(humidity);
        }
        model.updated_at = Set(now());
        self.call("update_kandang", model.update(self.connection())).await
    }

    /// Moves the food spot and entrance. Both are clamped into the grid and
    /// are otherwise unconstrained relative to each other.
    pub async fn update_positions(
        &self,
        id: i32,
        food_spot: GridPoint,
        entrance: GridPoint,
    ) -> StoreResult<kandang::Model> {
        if !food_spot.in_bounds() || !entrance.in_bounds() {
            tracing::debug!(kandang_id = id, ?food_spot, ?entrance, "clamping layout positions");
        }
        let current = self.get::<Kandang>(id).await?;
        let mut model = current.into_active_model();
        set_spots(&mut model, food_spot, entrance);
        model.updated_at = Set(now());
        self.call("update_positions", model.update(self.connection())).await
    }

    pub async fn list_kandang(&self) -> StoreResult<Vec<kandang::Model>> {
        self.call(
            "list_kandang",
            Kandang::find()
                .order_by_asc(kandang::Column::Name)
                .all(self.connection()),
        )
        .await
    }
}
