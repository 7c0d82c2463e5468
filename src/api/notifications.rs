use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use super::{record_action, ApiError, ApiResult, CurrentUser};
use crate::entities::user::Role;
use crate::entities::Notification;
use crate::store::notifications::{NewNotification, NotificationSettings};
use crate::store::FarmStore;

#[derive(Deserialize)]
pub struct NotificationQuery {
    unread_only: Option<bool>,
}

pub async fn list_notifications(
    Extension(store): Extension<FarmStore>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<NotificationQuery>,
) -> ApiResult<impl IntoResponse> {
    let notifications = store
        .list_notifications(user.id, query.unread_only.unwrap_or(false))
        .await?;
    Ok(Json(notifications))
}

pub async fn create_notification(
    Extension(store): Extension<FarmStore>,
    Json(payload): Json<NewNotification>,
) -> ApiResult<impl IntoResponse> {
    let notification = store.create_notification(payload).await?;
    record_action("notifications", "create_notification");
    Ok((StatusCode::CREATED, Json(notification)))
}

pub async fn mark_read(
    Extension(store): Extension<FarmStore>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> ApiResult<impl IntoResponse> {
    let notification = store.get::<Notification>(id).await?;
    // Broadcasts are shared; only admins may flag someone else's notification.
    let owned = notification.user_id.map_or(true, |owner| owner == user.id);
    if !owned && user.role != Role::Admin {
        return Err(ApiError::Forbidden("Notification belongs to another user"));
    }
    let notification = store.mark_notification_read(id).await?;
    record_action("notifications", "mark_read");
    Ok(Json(notification))
}

pub async fn get_settings(
    Extension(store): Extension<FarmStore>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(store.notification_settings(user.id).await?))
}

pub async fn save_settings(
    Extension(store): Extension<FarmStore>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<NotificationSettings>,
) -> ApiResult<impl IntoResponse> {
    let settings = store.save_notification_settings(user.id, payload).await?;
    record_action("notificationSettings", "save_settings");
    Ok(Json(settings))
}
