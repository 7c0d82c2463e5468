use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use super::{record_action, ApiResult};
use crate::entities::Kandang;
use crate::layout::{layout_view, GridPoint};
use crate::stats::kandang_stats;
use crate::store::kandang::{KandangPatch, NewKandang};
use crate::store::livestock::LivestockFilter;
use crate::store::{FarmStore, SnapshotCache};

#[derive(Deserialize)]
pub struct PositionsRequest {
    food_spot: GridPoint,
    entrance: GridPoint,
}

pub async fn list_kandang(Extension(store): Extension<FarmStore>) -> ApiResult<impl IntoResponse> {
    Ok(Json(store.list_kandang().await?))
}

pub async fn create_kandang(
    Extension(store): Extension<FarmStore>,
    Extension(snapshots): Extension<Arc<SnapshotCache>>,
    Json(payload): Json<NewKandang>,
) -> ApiResult<impl IntoResponse> {
    let pen = store.create_kandang(payload).await?;
    snapshots.invalidate().await;
    record_action("kandang", "create_kandang");
    crate::metrics::increment_records_created("kandang");
    Ok((StatusCode::CREATED, Json(pen)))
}

pub async fn get_kandang(
    Extension(store): Extension<FarmStore>,
    Path(id): Path<i32>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(store.get::<Kandang>(id).await?))
}

pub async fn update_kandang(
    Extension(store): Extension<FarmStore>,
    Extension(snapshots): Extension<Arc<SnapshotCache>>,
    Path(id): Path<i32>,
    Json(payload): Json<KandangPatch>,
) -> ApiResult<impl IntoResponse> {
    // Renaming does not follow the animals: their `location` keeps the old name.
    let pen = store.update_kandang(id, payload).await?;
    snapshots.invalidate().await;
    record_action("kandang", "update_kandang");
    Ok(Json(pen))
}

pub async fn delete_kandang(
    Extension(store): Extension<FarmStore>,
    Extension(snapshots): Extension<Arc<SnapshotCache>>,
    Path(id): Path<i32>,
) -> ApiResult<impl IntoResponse> {
    store.delete::<Kandang>(id).await?;
    snapshots.invalidate().await;
    record_action("kandang", "delete_kandang");
    Ok(Json(json!({"message": "Kandang deleted"})))
}

/// Drag-and-drop save from the layout editor.
pub async fn update_positions(
    Extension(store): Extension<FarmStore>,
    Extension(snapshots): Extension<Arc<SnapshotCache>>,
    Path(id): Path<i32>,
    Json(payload): Json<PositionsRequest>,
) -> ApiResult<impl IntoResponse> {
    let pen = store
        .update_positions(id, payload.food_spot, payload.entrance)
        .await?;
    snapshots.invalidate().await;
    record_action("kandang", "update_positions");
    Ok(Json(pen))
}

pub async fn kandang_layout(
    Extension(store): Extension<FarmStore>,
    Path(id): Path<i32>,
) -> ApiResult<impl IntoResponse> {
    let pen = store.get::<Kandang>(id).await?;
    let herd = store
        .list_livestock(&LivestockFilter {
            location: Some(pen.name.clone()),
            ..Default::default()
        })
        .await?;
    let occupants: Vec<_> = herd.iter().collect();
    Ok(Json(layout_view(&pen, &occupants)))
}

pub async fn single_kandang_stats(
    Extension(store): Extension<FarmStore>,
    Path(id): Path<i32>,
) -> ApiResult<impl IntoResponse> {
    let pen = store.get::<Kandang>(id).await?;
    let herd = store
        .list_livestock(&LivestockFilter {
            location: Some(pen.name.clone()),
            ..Default::default()
        })
        .await?;
    Ok(Json(kandang_stats(&pen, &herd)))
}

pub async fn all_kandang_stats(
    Extension(snapshots): Extension<Arc<SnapshotCache>>,
) -> ApiResult<impl IntoResponse> {
    let snapshot = snapshots.get().await?;
    let stats: Vec<_> = snapshot
        .kandang
        .iter()
        .map(|pen| kandang_stats(pen, &snapshot.livestock))
        .collect();
    Ok(Json(stats))
}
