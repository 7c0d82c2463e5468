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
use crate::entities::HealthRecord;
use crate::reference::dangling_livestock_refs;
use crate::store::health::{HealthRecordFilter, HealthRecordPatch, NewHealthRecord};
use crate::store::{FarmStore, SnapshotCache};

#[derive(Deserialize)]
pub struct UpcomingQuery {
    days: Option<u64>,
}

pub async fn list_health_records(
    Extension(store): Extension<FarmStore>,
    Query(filter): Query<HealthRecordFilter>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(store.list_health_records(&filter).await?))
}

pub async fn create_health_record(
    Extension(store): Extension<FarmStore>,
    Json(payload): Json<NewHealthRecord>,
) -> ApiResult<impl IntoResponse> {
    let record = store.create_health_record(payload).await?;
    record_action("health_records", "create_health_record");
    tracing::Span::current().record("livestock_id", record.livestock_id);
    crate::metrics::increment_records_created("health_records");
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn get_health_record(
    Extension(store): Extension<FarmStore>,
    Path(id): Path<i32>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(store.get::<HealthRecord>(id).await?))
}

pub async fn update_health_record(
    Extension(store): Extension<FarmStore>,
    Path(id): Path<i32>,
    Json(payload): Json<HealthRecordPatch>,
) -> ApiResult<impl IntoResponse> {
    let record = store.update_health_record(id, payload).await?;
    record_action("health_records", "update_health_record");
    Ok(Json(record))
}

pub async fn delete_health_record(
    Extension(store): Extension<FarmStore>,
    Path(id): Path<i32>,
) -> ApiResult<impl IntoResponse> {
    store.delete::<HealthRecord>(id).await?;
    record_action("health_records", "delete_health_record");
    Ok(Json(json!({"message": "Health record deleted"})))
}

pub async fn upcoming_checkups(
    Extension(store): Extension<FarmStore>,
    Query(query): Query<UpcomingQuery>,
) -> ApiResult<impl IntoResponse> {
    let today = chrono::Utc::now().date_naive();
    let records = store.upcoming_checkups(today, query.days.unwrap_or(7)).await?;
    Ok(Json(records))
}

/// Health records whose animal has been deleted.
pub async fn list_dangling(
    Extension(store): Extension<FarmStore>,
    Extension(snapshots): Extension<Arc<SnapshotCache>>,
) -> ApiResult<impl IntoResponse> {
    let (records, snapshot) = tokio::try_join!(store.all::<HealthRecord>(), snapshots.get())?;
    let herd = &snapshot.livestock;
    let orphans: Vec<_> = dangling_livestock_refs(&records, herd, |r| r.livestock_ref())
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(orphans))
}
