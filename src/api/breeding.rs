use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use super::{record_action, ApiResult};
use crate::entities::breeding_record::BreedingStatus;
use crate::entities::BreedingRecord;
use crate::store::breeding::{BreedingPatch, NewBreedingRecord};
use crate::store::{FarmStore, SnapshotCache};

#[derive(Deserialize)]
pub struct BreedingQuery {
    status: Option<BreedingStatus>,
}

pub async fn list_breeding_records(
    Extension(store): Extension<FarmStore>,
    Query(query): Query<BreedingQuery>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(store.list_breeding_records(query.status).await?))
}

pub async fn create_breeding_record(
    Extension(store): Extension<FarmStore>,
    Extension(snapshots): Extension<Arc<SnapshotCache>>,
    Json(payload): Json<NewBreedingRecord>,
) -> ApiResult<impl IntoResponse> {
    let record = store.create_breeding_record(payload).await?;
    snapshots.invalidate().await;
    record_action("breeding_records", "create_breeding_record");
    tracing::Span::current().record("livestock_id", record.mother_id);
    crate::metrics::increment_records_created("breeding_records");
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn get_breeding_record(
    Extension(store): Extension<FarmStore>,
    Path(id): Path<i32>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(store.get::<BreedingRecord>(id).await?))
}

pub async fn update_breeding_record(
    Extension(store): Extension<FarmStore>,
    Extension(snapshots): Extension<Arc<SnapshotCache>>,
    Path(id): Path<i32>,
    Json(payload): Json<BreedingPatch>,
) -> ApiResult<impl IntoResponse> {
    let record = store.update_breeding_record(id, payload).await?;
    snapshots.invalidate().await;
    record_action("breeding_records", "update_breeding_record");
    Ok(Json(record))
}

pub async fn delete_breeding_record(
    Extension(store): Extension<FarmStore>,
    Extension(snapshots): Extension<Arc<SnapshotCache>>,
    Path(id): Path<i32>,
) -> ApiResult<impl IntoResponse> {
    store.delete::<BreedingRecord>(id).await?;
    snapshots.invalidate().await;
    record_action("breeding_records", "delete_breeding_record");
    Ok(Json(json!({"message": "Breeding record deleted"})))
}

/// Mother and father resolved against the current herd.
pub async fn get_parents(
    Extension(store): Extension<FarmStore>,
    Extension(snapshots): Extension<Arc<SnapshotCache>>,
    Path(id): Path<i32>,
) -> ApiResult<impl IntoResponse> {
    let record = store.get::<BreedingRecord>(id).await?;
    let snapshot = snapshots.get().await?;
    let parentage = record.parentage(&snapshot.livestock);
    tracing::Span::current().record("livestock_id", record.mother_id);
    Ok(Json(json!(parentage)))
}
