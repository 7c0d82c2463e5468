use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use super::{record_action, ApiResult, CurrentUser};
use crate::entities::user::Role;
use crate::entities::User;
use crate::store::users::NewUser;
use crate::store::FarmStore;

#[derive(Deserialize)]
pub struct SetRoleRequest {
    role: Role,
}

/// Self-registration. Profiles always start as buyers.
pub async fn register(
    Extension(store): Extension<FarmStore>,
    Json(payload): Json<NewUser>,
) -> ApiResult<impl IntoResponse> {
    let user = store.create_user(payload, Role::Buyer).await?;
    record_action("users", "register");
    tracing::Span::current()
        .record("user_id", user.id)
        .record("business_event", "User registered");
    crate::metrics::increment_records_created("users");
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn me(
    Extension(store): Extension<FarmStore>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(store.get::<User>(user.id).await?))
}

pub async fn list_users(Extension(store): Extension<FarmStore>) -> ApiResult<impl IntoResponse> {
    Ok(Json(store.list_users().await?))
}

pub async fn set_role(
    Extension(store): Extension<FarmStore>,
    Path(id): Path<i32>,
    Json(payload): Json<SetRoleRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = store.set_user_role(id, payload.role).await?;
    record_action("users", "set_role");
    tracing::info!(user_id = id, role = ?user.role, "user role changed");
    Ok(Json(user))
}
