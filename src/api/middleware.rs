use axum::{
    extract::{Extension, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_cookies::Cookies;

use super::{ApiError, CurrentUser};
use crate::entities::user::Role;
use crate::entities::User;
use crate::store::{FarmStore, StoreError};

/// Set by the hosted auth provider; holds the `users` profile id.
pub const IDENTITY_COOKIE: &str = "farm_user";

pub async fn auth_middleware(
    Extension(store): Extension<FarmStore>,
    cookies: Cookies,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(user_id) = cookies
        .get(IDENTITY_COOKIE)
        .and_then(|cookie| cookie.value().parse::<i32>().ok())
    else {
        return ApiError::Unauthorized.into_response();
    };

    match store.get::<User>(user_id).await {
        Ok(user) => {
            tracing::Span::current().record("user_id", user.id);
            request.extensions_mut().insert(CurrentUser {
                id: user.id,
                role: user.role,
            });
            next.run(request).await
        }
        Err(StoreError::NotFound { .. }) => ApiError::Unauthorized.into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Must run inside `auth_middleware`.
pub async fn admin_only(
    Extension(user): Extension<CurrentUser>,
    request: Request,
    next: Next,
) -> Response {
    if user.role != Role::Admin {
        return ApiError::Forbidden("Admin role required").into_response();
    }
    next.run(request).await
}
