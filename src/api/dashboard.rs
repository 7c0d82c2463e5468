use std::sync::Arc;

use axum::{extract::Extension, response::IntoResponse, Json};

use super::ApiResult;
use crate::stats;
use crate::store::SnapshotCache;

pub async fn dashboard(
    Extension(snapshots): Extension<Arc<SnapshotCache>>,
) -> ApiResult<impl IntoResponse> {
    let snapshot = snapshots.get().await?;
    let stats = stats::dashboard(
        &snapshot.livestock,
        &snapshot.sales,
        &snapshot.breeding,
        &snapshot.kandang,
    );
    crate::metrics::publish_dashboard(&stats);
    Ok(Json(stats))
}
