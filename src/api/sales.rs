use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;

use super::{record_action, ApiResult};
use crate::checkout::checkout;
use crate::entities::Sale;
use crate::reference::dangling_livestock_refs;
use crate::store::sales::{NewSale, SaleFilter, SalePatch};
use crate::store::{FarmStore, SnapshotCache};

pub async fn list_sales(
    Extension(store): Extension<FarmStore>,
    Query(filter): Query<SaleFilter>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(store.list_sales(&filter).await?))
}

/// Records a sale only. Use `/sales/checkout` to also mark the animal sold.
pub async fn create_sale(
    Extension(store): Extension<FarmStore>,
    Extension(snapshots): Extension<Arc<SnapshotCache>>,
    Json(payload): Json<NewSale>,
) -> ApiResult<impl IntoResponse> {
    let sale = store.create_sale(payload).await?;
    snapshots.invalidate().await;
    record_action("sales", "create_sale");
    tracing::Span::current().record("livestock_id", sale.livestock_id);
    crate::metrics::increment_records_created("sales");
    Ok((StatusCode::CREATED, Json(sale)))
}

pub async fn checkout_sale(
    Extension(store): Extension<FarmStore>,
    Extension(snapshots): Extension<Arc<SnapshotCache>>,
    Json(payload): Json<NewSale>,
) -> ApiResult<impl IntoResponse> {
    let livestock_id = payload.livestock_id;
    tracing::Span::current().record("livestock_id", livestock_id);
    record_action("sales", "checkout");

    let result = checkout(&store, payload).await;
    // Even a failed checkout may have written something.
    snapshots.invalidate().await;

    let done = result?;
    tracing::Span::current().record("business_event", "Livestock sold");
    crate::metrics::increment_records_created("sales");
    Ok((StatusCode::CREATED, Json(done)))
}

pub async fn get_sale(
    Extension(store): Extension<FarmStore>,
    Path(id): Path<i32>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(store.get::<Sale>(id).await?))
}

pub async fn update_sale(
    Extension(store): Extension<FarmStore>,
    Extension(snapshots): Extension<Arc<SnapshotCache>>,
    Path(id): Path<i32>,
    Json(payload): Json<SalePatch>,
) -> ApiResult<impl IntoResponse> {
    let sale = store.update_sale(id, payload).await?;
    snapshots.invalidate().await;
    record_action("sales", "update_sale");
    Ok(Json(sale))
}

pub async fn delete_sale(
    Extension(store): Extension<FarmStore>,
    Extension(snapshots): Extension<Arc<SnapshotCache>>,
    Path(id): Path<i32>,
) -> ApiResult<impl IntoResponse> {
    store.delete::<Sale>(id).await?;
    snapshots.invalidate().await;
    record_action("sales", "delete_sale");
    Ok(Json(json!({"message": "Sale deleted"})))
}

pub async fn list_dangling(
    Extension(snapshots): Extension<Arc<SnapshotCache>>,
) -> ApiResult<impl IntoResponse> {
    let snapshot = snapshots.get().await?;
    let herd = &snapshot.livestock;
    let orphans: Vec<_> = dangling_livestock_refs(&snapshot.sales, herd, |s| s.livestock_ref())
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(orphans))
}
