use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{header, HeaderValue, Method, Request, Response},
    middleware::from_fn,
    routing::{get, post, put},
    Extension, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::Span;

use crate::api::{self, middleware::{admin_only, auth_middleware}};
use crate::store::{FarmStore, SnapshotCache};

async fn health_check() -> &'static str {
    "OK"
}

/// The full HTTP surface minus `/metrics`, which the binary adds together
/// with the Prometheus layer.
pub fn app(store: FarmStore, snapshots: Arc<SnapshotCache>, cors_origin: HeaderValue) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/users", post(api::user::register));

    let buyer_routes = Router::new()
        .route("/me", get(api::user::me))
        .route("/marketplace", get(api::marketplace::list_listings))
        .route("/marketplace/:id", get(api::marketplace::get_listing))
        .route("/notifications", get(api::notifications::list_notifications))
        .route("/notifications/:id/read", post(api::notifications::mark_read))
        .route(
            "/notification-settings",
            get(api::notifications::get_settings).put(api::notifications::save_settings),
        )
        .route_layer(from_fn(auth_middleware));

    let admin_routes = Router::new()
        .route("/users", get(api::user::list_users))
        .route("/users/:id/role", axum::routing::patch(api::user::set_role))
        .route("/notifications", post(api::notifications::create_notification))
        .route("/dashboard", get(api::dashboard::dashboard))
        // Livestock
        .route(
            "/livestock",
            get(api::livestock::list_livestock).post(api::livestock::create_livestock),
        )
        .route("/livestock/dangling", get(api::livestock::list_dangling))
        .route("/livestock/backfill-codes", post(api::livestock::backfill_codes))
        .route(
            "/livestock/:id",
            get(api::livestock::get_livestock)
                .patch(api::livestock::update_livestock)
                .delete(api::livestock::delete_livestock),
        )
        .route("/livestock/:id/kandang", get(api::livestock::livestock_kandang))
        // Kandang
        .route(
            "/kandang",
            get(api::kandang::list_kandang).post(api::kandang::create_kandang),
        )
        .route("/kandang/stats", get(api::kandang::all_kandang_stats))
        .route(
            "/kandang/:id",
            get(api::kandang::get_kandang)
                .patch(api::kandang::update_kandang)
                .delete(api::kandang::delete_kandang),
        )
        .route("/kandang/:id/positions", put(api::kandang::update_positions))
        .route("/kandang/:id/layout", get(api::kandang::kandang_layout))
        .route("/kandang/:id/stats", get(api::kandang::single_kandang_stats))
        // Health
        .route(
            "/health-records",
            get(api::health::list_health_records).post(api::health::create_health_record),
        )
        .route("/health-records/upcoming", get(api::health::upcoming_checkups))
        .route("/health-records/dangling", get(api::health::list_dangling))
        .route(
            "/health-records/:id",
            get(api::health::get_health_record)
                .patch(api::health::update_health_record)
                .delete(api::health::delete_health_record),
        )
        // Breeding
        .route(
            "/breeding-records",
            get(api::breeding::list_breeding_records).post(api::breeding::create_breeding_record),
        )
        .route(
            "/breeding-records/:id",
            get(api::breeding::get_breeding_record)
                .patch(api::breeding::update_breeding_record)
                .delete(api::breeding::delete_breeding_record),
        )
        .route("/breeding-records/:id/parents", get(api::breeding::get_parents))
        // Sales
        .route("/sales", get(api::sales::list_sales).post(api::sales::create_sale))
        .route("/sales/checkout", post(api::sales::checkout_sale))
        .route("/sales/dangling", get(api::sales::list_dangling))
        .route(
            "/sales/:id",
            get(api::sales::get_sale)
                .patch(api::sales::update_sale)
                .delete(api::sales::delete_sale),
        )
        // Feeding
        .route(
            "/feeding/schedules",
            get(api::feeding::list_schedules).post(api::feeding::create_schedule),
        )
        .route(
            "/feeding/schedules/:id",
            axum::routing::patch(api::feeding::update_schedule)
                .delete(api::feeding::delete_schedule),
        )
        .route(
            "/feeding/activities",
            get(api::feeding::list_activities).post(api::feeding::create_activity),
        )
        // Sensor logs
        .route(
            "/rfid-logs",
            get(api::logs::list_rfid_logs).post(api::logs::create_rfid_log),
        )
        .route(
            "/eating-logs",
            get(api::logs::list_eating_logs).post(api::logs::create_eating_log),
        )
        .route_layer(from_fn(admin_only))
        .route_layer(from_fn(auth_middleware));

    // Routers sharing a path (`/users`, `/notifications`) merge per method.
    Router::new()
        .merge(public_routes)
        .merge(buyer_routes)
        .merge(admin_routes)
        .layer(Extension(store))
        .layer(Extension(snapshots))
        .layer(tower_cookies::CookieManagerLayer::new())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let path = request
                        .extensions()
                        .get::<MatchedPath>()
                        .map(|matched| matched.as_str())
                        .unwrap_or_else(|| request.uri().path());
                    let span_name = format!("{} {}", request.method(), path);

                    // Handlers fill the empty fields as they learn more.
                    tracing::info_span!(
                        "request",
                        "otel.name" = span_name,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        table = tracing::field::Empty,
                        action = tracing::field::Empty,
                        user_id = tracing::field::Empty,
                        livestock_id = tracing::field::Empty,
                        business_event = tracing::field::Empty,
                        error = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency = tracing::field::Empty,
                    )
                })
                .on_request(|_request: &Request<Body>, _span: &Span| {})
                .on_response(|response: &Response<_>, latency: Duration, span: &Span| {
                    span.record("status", tracing::field::display(response.status()));
                    span.record("latency", tracing::field::debug(latency));
                    tracing::info!("request completed");
                }),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(cors_origin)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                ])
                .allow_headers([header::CONTENT_TYPE])
                .allow_credentials(true),
        )
}
