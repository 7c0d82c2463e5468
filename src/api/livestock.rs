use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;

use super::{record_action, ApiResult};
use crate::entities::Livestock;
use crate::reference::dangling_locations;
use crate::store::livestock::{LivestockFilter, LivestockPatch, NewLivestock};
use crate::store::{FarmStore, SnapshotCache};

pub async fn list_livestock(
    Extension(store): Extension<FarmStore>,
    Query(filter): Query<LivestockFilter>,
) -> ApiResult<impl IntoResponse> {
    let herd = store.list_livestock(&filter).await?;
    Ok(Json(herd))
}

pub async fn create_livestock(
    Extension(store): Extension<FarmStore>,
    Extension(snapshots): Extension<Arc<SnapshotCache>>,
    Json(payload): Json<NewLivestock>,
) -> ApiResult<impl IntoResponse> {
    let animal = store.create_livestock(payload).await?;
    snapshots.invalidate().await;

    record_action("animals", "create_livestock");
    tracing::Span::current()
        .record("livestock_id", animal.id)
        .record("business_event", "Livestock registered");
    crate::metrics::increment_records_created("animals");

    Ok((StatusCode::CREATED, Json(animal)))
}

pub async fn get_livestock(
    Extension(store): Extension<FarmStore>,
    Path(id): Path<i32>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(store.get::<Livestock>(id).await?))
}

pub async fn update_livestock(
    Extension(store): Extension<FarmStore>,
    Extension(snapshots): Extension<Arc<SnapshotCache>>,
    Path(id): Path<i32>,
    Json(payload): Json<LivestockPatch>,
) -> ApiResult<impl IntoResponse> {
    let animal = store.update_livestock(id, payload).await?;
    snapshots.invalidate().await;
    record_action("animals", "update_livestock");
    tracing::Span::current().record("livestock_id", id);
    Ok(Json(animal))
}

/// Admin delete tool. Sales and health records that point at the animal stay.
pub async fn delete_livestock(
    Extension(store): Extension<FarmStore>,
    Extension(snapshots): Extension<Arc<SnapshotCache>>,
    Path(id): Path<i32>,
) -> ApiResult<impl IntoResponse> {
    store.delete::<Livestock>(id).await?;
    snapshots.invalidate().await;
    record_action("animals", "delete_livestock");
    tracing::Span::current().record("livestock_id", id);
    Ok(Json(json!({"message": "Livestock deleted"})))
}

/// Resolves the animal's `location` against the kandang names.
pub async fn livestock_kandang(
    Extension(store): Extension<FarmStore>,
    Path(id): Path<i32>,
) -> ApiResult<impl IntoResponse> {
    let animal = store.get::<Livestock>(id).await?;
    let pens = store.list_kandang().await?;
    let resolution = animal.location_ref().resolve(&pens);
    Ok(Json(json!(resolution)))
}

pub async fn list_dangling(
    Extension(snapshots): Extension<Arc<SnapshotCache>>,
) -> ApiResult<impl IntoResponse> {
    let snapshot = snapshots.get().await?;
    let orphans: Vec<_> = dangling_locations(&snapshot.livestock, &snapshot.kandang)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(orphans))
}

pub async fn backfill_codes(
    Extension(store): Extension<FarmStore>,
    Extension(snapshots): Extension<Arc<SnapshotCache>>,
) -> ApiResult<impl IntoResponse> {
    let updated = store.backfill_animal_codes().await?;
    if updated > 0 {
        snapshots.invalidate().await;
    }
    record_action("animals", "backfill_animal_codes");
    Ok(Json(json!({"updated": updated})))
}
