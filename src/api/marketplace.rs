//! Buyer-facing view of animals that are up for sale.

use axum::{
    extract::{Extension, Path, Query},
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{ApiError, ApiResult};
use crate::entities::livestock::{self, Gender, LivestockStatus, LivestockType};
use crate::entities::Livestock;
use crate::store::livestock::LivestockFilter;
use crate::store::{FarmStore, StoreError};

/// Public fields only: no purchase price, no notes.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Listing {
    pub id: i32,
    pub animal_id: Option<String>,
    #[serde(rename = "type")]
    pub livestock_type: LivestockType,
    pub breed: String,
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
    pub weight: f64,
    pub photo_url: Option<String>,
}

impl From<livestock::Model> for Listing {
    fn from(animal: livestock::Model) -> Self {
        Self {
            id: animal.id,
            animal_id: animal.animal_id,
            livestock_type: animal.livestock_type,
            breed: animal.breed,
            gender: animal.gender,
            date_of_birth: animal.date_of_birth,
            weight: animal.weight,
            photo_url: animal.photo_url,
        }
    }
}

#[derive(Deserialize)]
pub struct MarketplaceQuery {
    #[serde(rename = "type")]
    livestock_type: Option<LivestockType>,
}

pub async fn list_listings(
    Extension(store): Extension<FarmStore>,
    Query(query): Query<MarketplaceQuery>,
) -> ApiResult<impl IntoResponse> {
    let filter = LivestockFilter {
        status: Some(LivestockStatus::Healthy),
        livestock_type: query.livestock_type,
        location: None,
    };
    let listings: Vec<Listing> = store
        .list_livestock(&filter)
        .await?
        .into_iter()
        .map(Listing::from)
        .collect();
    Ok(Json(listings))
}

pub async fn get_listing(
    Extension(store): Extension<FarmStore>,
    Path(id): Path<i32>,
) -> ApiResult<impl IntoResponse> {
    let animal = match store.get::<Livestock>(id).await {
        Ok(animal) => animal,
        Err(StoreError::NotFound { .. }) => return Err(ApiError::NotFound("Listing not found")),
        Err(e) => return Err(e.into()),
    };
    if animal.status != LivestockStatus::Healthy {
        return Err(ApiError::NotFound("Listing not found"));
    }
    Ok(Json(Listing::from(animal)))
}
