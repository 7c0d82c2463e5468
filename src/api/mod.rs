use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::field::display;

use crate::checkout::SaleWorkflowError;
use crate::entities::user::Role;
use crate::store::StoreError;

pub mod breeding;
pub mod dashboard;
pub mod feeding;
pub mod health;
pub mod kandang;
pub mod livestock;
pub mod logs;
pub mod marketplace;
pub mod middleware;
pub mod notifications;
pub mod sales;
pub mod user;

/// Identity resolved by the auth middleware from the trusted profile document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: i32,
    pub role: Role,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Checkout(#[from] SaleWorkflowError),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("{0}")]
    NotFound(&'static str),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Store(e) | ApiError::Checkout(SaleWorkflowError::Store(e)) => match e {
                StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
                StoreError::Invalid { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                StoreError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
                StoreError::Database { .. } => StatusCode::SERVICE_UNAVAILABLE,
            },
            ApiError::Checkout(SaleWorkflowError::NotForSale { .. }) => StatusCode::CONFLICT,
            ApiError::Checkout(SaleWorkflowError::Inconsistent { .. }) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        tracing::Span::current().record("error", display(&self));
        (status, Json(json!({"error": self.to_string()}))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Fills the business fields of the request span.
pub(crate) fn record_action(table: &str, action: &str) {
    tracing::Span::current()
        .record("table", table)
        .record("action", action);
}
