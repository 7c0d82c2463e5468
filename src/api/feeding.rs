use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use super::{record_action, ApiResult};
use crate::store::feeding::{FeedingSchedulePatch, NewFeedingActivity, NewFeedingSchedule};
use crate::store::{DateRange, FarmStore};

#[derive(Deserialize)]
pub struct ScheduleQuery {
    active_only: Option<bool>,
}

pub async fn list_schedules(
    Extension(store): Extension<FarmStore>,
    Query(query): Query<ScheduleQuery>,
) -> ApiResult<impl IntoResponse> {
    let schedules = store
        .list_feeding_schedules(query.active_only.unwrap_or(false))
        .await?;
    Ok(Json(schedules))
}

pub async fn create_schedule(
    Extension(store): Extension<FarmStore>,
    Json(payload): Json<NewFeedingSchedule>,
) -> ApiResult<impl IntoResponse> {
    let schedule = store.create_feeding_schedule(payload).await?;
    record_action("feedingSchedules", "create_feeding_schedule");
    crate::metrics::increment_records_created("feedingSchedules");
    Ok((StatusCode::CREATED, Json(schedule)))
}

pub async fn update_schedule(
    Extension(store): Extension<FarmStore>,
    Path(id): Path<i32>,
    Json(payload): Json<FeedingSchedulePatch>,
) -> ApiResult<impl IntoResponse> {
    let schedule = store.update_feeding_schedule(id, payload).await?;
    record_action("feedingSchedules", "update_feeding_schedule");
    Ok(Json(schedule))
}

pub async fn delete_schedule(
    Extension(store): Extension<FarmStore>,
    Path(id): Path<i32>,
) -> ApiResult<impl IntoResponse> {
    store.delete_feeding_schedule(id).await?;
    record_action("feedingSchedules", "delete_feeding_schedule");
    Ok(Json(json!({"message": "Feeding schedule deleted"})))
}

pub async fn list_activities(
    Extension(store): Extension<FarmStore>,
    Query(range): Query<DateRange>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(store.list_feeding_activities(&range).await?))
}

pub async fn create_activity(
    Extension(store): Extension<FarmStore>,
    Json(payload): Json<NewFeedingActivity>,
) -> ApiResult<impl IntoResponse> {
    let activity = store.create_feeding_activity(payload).await?;
    record_action("feedingActivities", "create_feeding_activity");
    crate::metrics::increment_records_created("feedingActivities");
    Ok((StatusCode::CREATED, Json(activity)))
}
