use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use super::{record_action, ApiResult};
use crate::store::logs::{LogFilter, NewEatingLog, NewRfidLog};
use crate::store::FarmStore;

pub async fn list_rfid_logs(
    Extension(store): Extension<FarmStore>,
    Query(filter): Query<LogFilter>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(store.list_rfid_logs(&filter).await?))
}

pub async fn create_rfid_log(
    Extension(store): Extension<FarmStore>,
    Json(payload): Json<NewRfidLog>,
) -> ApiResult<impl IntoResponse> {
    let log = store.create_rfid_log(payload).await?;
    record_action("rfid_logs", "create_rfid_log");
    Ok((StatusCode::CREATED, Json(log)))
}

pub async fn list_eating_logs(
    Extension(store): Extension<FarmStore>,
    Query(filter): Query<LogFilter>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(store.list_eating_logs(&filter).await?))
}

pub async fn create_eating_log(
    Extension(store): Extension<FarmStore>,
    Json(payload): Json<NewEatingLog>,
) -> ApiResult<impl IntoResponse> {
    let log = store.create_eating_log(payload).await?;
    record_action("eating_logs", "create_eating_log");
    Ok((StatusCode::CREATED, Json(log)))
}
