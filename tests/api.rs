use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header, HeaderValue, Method, Request, StatusCode},
    Router,
};
use livestock_server::entities::user::Role;
use livestock_server::migrator::Migrator;
use livestock_server::routes;
use livestock_server::store::users::NewUser;
use livestock_server::store::{FarmStore, SnapshotCache};
use pretty_assertions::assert_eq;
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use serde_json::{json, Value};
use tower::ServiceExt;

struct TestApp {
    router: Router,
    admin: i32,
    buyer: i32,
}

async fn spawn_app() -> TestApp {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    let store = FarmStore::new(db, Duration::from_secs(5));

    let admin = store
        .create_user(
            NewUser {
                email: "admin@farm.test".to_string(),
                name: "Admin".to_string(),
            },
            Role::Admin,
        )
        .await
        .unwrap();
    let buyer = store
        .create_user(
            NewUser {
                email: "buyer@farm.test".to_string(),
                name: "Buyer".to_string(),
            },
            Role::Buyer,
        )
        .await
        .unwrap();

    let snapshots = Arc::new(SnapshotCache::new(
        Arc::new(store.clone()),
        Duration::from_secs(30),
    ));
    let origin = HeaderValue::from_static("http://localhost:3000");
    let router = routes::app(store, snapshots, origin);
    TestApp {
        router,
        admin: admin.id,
        buyer: buyer.id,
    }
}

async fn send(
    app: &TestApp,
    method: Method,
    uri: &str,
    user: Option<i32>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(id) = user {
        builder = builder.header(header::COOKIE, format!("farm_user={id}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, value)
}

async fn admin_get(app: &TestApp, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, Some(app.admin), None).await
}

async fn admin_send(app: &TestApp, method: Method, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, method, uri, Some(app.admin), Some(body)).await
}

fn heifer(tag: &str, weight: f64) -> Value {
    json!({
        "tag_id": tag,
        "type": "cattle",
        "breed": "Bali",
        "gender": "female",
        "date_of_birth": "2022-02-14",
        "weight": weight,
        "location": "Kandang A",
        "purchase_price": 11000000.0,
        "notes": "bought at the Tuesday market"
    })
}

#[tokio::test]
async fn health_check_is_public() {
    let app = spawn_app().await;
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("OK".to_string()));
}

#[tokio::test]
async fn identity_is_required() {
    let app = spawn_app().await;
    let (status, _) = send(&app, Method::GET, "/livestock", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::GET, "/me", Some(999), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn buyers_cannot_reach_farm_management() {
    let app = spawn_app().await;
    let (status, body) = send(&app, Method::GET, "/livestock", Some(app.buyer), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Admin role required");

    let (status, me) = send(&app, Method::GET, "/me", Some(app.buyer), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["role"], "buyer");
}

#[tokio::test]
async fn registration_always_creates_buyers() {
    let app = spawn_app().await;
    let (status, user) = send(
        &app,
        Method::POST,
        "/users",
        None,
        Some(json!({"email": "new@farm.test", "name": "Siti"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user["role"], "buyer");

    let (status, users) = send(&app, Method::GET, "/users", Some(app.admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users.as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn dashboard_reflects_new_livestock() {
    let app = spawn_app().await;
    let (status, empty) = admin_get(&app, "/dashboard").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(empty["total_livestock"], 0);
    assert_eq!(empty["average_weight"], 0.0);

    for (tag, weight) in [("T-1", 300.0), ("T-2", 500.0)] {
        let (status, animal) =
            admin_send(&app, Method::POST, "/livestock", heifer(tag, weight)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(animal["status"], "healthy");
    }

    let (_, stats) = admin_get(&app, "/dashboard").await;
    assert_eq!(stats["total_livestock"], 2);
    assert_eq!(stats["healthy_count"], 2);
    assert_eq!(stats["average_weight"], 400.0);
}

#[tokio::test]
async fn invalid_weight_is_rejected() {
    let app = spawn_app().await;
    let (status, body) = admin_send(&app, Method::POST, "/livestock", heifer("T-1", -5.0)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap_or_default().contains("weight"));
}

#[tokio::test]
async fn checkout_marks_animal_sold_once() {
    let app = spawn_app().await;
    let (_, animal) = admin_send(&app, Method::POST, "/livestock", heifer("T-7", 420.0)).await;
    let sale = json!({
        "livestock_id": animal["id"],
        "buyer_name": "Pak Budi",
        "buyer_contact": "0812-000",
        "price": 18500000.0
    });

    let (status, done) = admin_send(&app, Method::POST, "/sales/checkout", sale.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(done["livestock"]["status"], "sold");
    assert_eq!(done["sale"]["payment_status"], "pending");

    let (status, _) = admin_send(&app, Method::POST, "/sales/checkout", sale).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, stats) = admin_get(&app, "/dashboard").await;
    assert_eq!(stats["pending_sales"], 1);
    assert_eq!(stats["pending_revenue"], 18500000.0);
}

#[tokio::test]
async fn checkout_of_unknown_animal_is_not_found() {
    let app = spawn_app().await;
    let sale = json!({
        "livestock_id": 77,
        "buyer_name": "Pak Budi",
        "buyer_contact": "0812-000",
        "price": 1.0
    });
    let (status, _) = admin_send(&app, Method::POST, "/sales/checkout", sale).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn marketplace_hides_private_fields_and_unavailable_animals() {
    let app = spawn_app().await;
    let (_, healthy) = admin_send(&app, Method::POST, "/livestock", heifer("T-1", 300.0)).await;
    let (_, sick) = admin_send(&app, Method::POST, "/livestock", heifer("T-2", 310.0)).await;
    let uri = format!("/livestock/{}", sick["id"]);
    let (status, _) = admin_send(&app, Method::PATCH, &uri, json!({"status": "sick"})).await;
    assert_eq!(status, StatusCode::OK);

    let (status, listings) = send(&app, Method::GET, "/marketplace", Some(app.buyer), None).await;
    assert_eq!(status, StatusCode::OK);
    let listings = listings.as_array().cloned().unwrap_or_default();
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0]["id"], healthy["id"]);
    assert!(listings[0].get("purchase_price").is_none());
    assert!(listings[0].get("notes").is_none());

    let uri = format!("/marketplace/{}", sick["id"]);
    let (status, _) = send(&app, Method::GET, &uri, Some(app.buyer), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn livestock_kandang_reference_resolves_or_dangles() {
    let app = spawn_app().await;
    let (_, animal) = admin_send(&app, Method::POST, "/livestock", heifer("T-1", 300.0)).await;
    let uri = format!("/livestock/{}/kandang", animal["id"]);

    let (_, dangling) = admin_get(&app, &uri).await;
    assert_eq!(dangling["resolution"], "dangling");
    assert_eq!(dangling["reference"], "Kandang A");

    let pen = json!({"name": "Kandang A", "capacity": 10, "type": "cow", "location": "Blok A"});
    let (status, _) = admin_send(&app, Method::POST, "/kandang", pen).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, resolved) = admin_get(&app, &uri).await;
    assert_eq!(resolved["resolution"], "resolved");
}

#[tokio::test]
async fn notifications_are_scoped_to_their_owner() {
    let app = spawn_app().await;
    let private = json!({
        "user_id": app.admin,
        "kind": "info",
        "title": "Vet visit",
        "message": "Thursday"
    });
    let (status, note) = admin_send(&app, Method::POST, "/notifications", private).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app,
        Method::POST,
        "/notifications",
        Some(app.buyer),
        Some(json!({"kind": "info", "title": "x", "message": "y"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, mine) = send(&app, Method::GET, "/notifications", Some(app.buyer), None).await;
    assert_eq!(mine.as_array().map(Vec::len), Some(0));

    let uri = format!("/notifications/{}/read", note["id"]);
    let (status, _) = send(&app, Method::POST, &uri, Some(app.buyer), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, read) = send(&app, Method::POST, &uri, Some(app.admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(read["read"], true);
}

#[tokio::test]
async fn notification_settings_default_then_persist() {
    let app = spawn_app().await;
    let uri = "/notification-settings";
    let (_, defaults) = send(&app, Method::GET, uri, Some(app.buyer), None).await;
    assert_eq!(
        defaults,
        json!({"feeding_reminders": true, "health_reminders": true, "lead_minutes": 30})
    );

    let wanted = json!({"feeding_reminders": false, "health_reminders": true, "lead_minutes": 15});
    let (status, _) = send(&app, Method::PUT, uri, Some(app.buyer), Some(wanted.clone())).await;
    assert_eq!(status, StatusCode::OK);
    let (_, saved) = send(&app, Method::GET, uri, Some(app.buyer), None).await;
    assert_eq!(saved, wanted);
}

#[tokio::test]
async fn editing_livestock_cannot_sell_it() {
    let app = spawn_app().await;
    let (_, animal) = admin_send(&app, Method::POST, "/livestock", heifer("T-3", 350.0)).await;
    let uri = format!("/livestock/{}", animal["id"]);

    let (status, body) = admin_send(&app, Method::PATCH, &uri, json!({"status": "sold"})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap_or_default().contains("status"));

    let (_, unchanged) = admin_get(&app, &uri).await;
    assert_eq!(unchanged["status"], "healthy");
}

#[tokio::test]
async fn null_in_patch_clears_field_and_absent_keeps_it() {
    let app = spawn_app().await;
    let (_, animal) = admin_send(&app, Method::POST, "/livestock", heifer("T-4", 380.0)).await;
    let uri = format!("/livestock/{}", animal["id"]);

    let (status, patched) =
        admin_send(&app, Method::PATCH, &uri, json!({"notes": null, "weight": 390.0})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["notes"], Value::Null);
    assert_eq!(patched["purchase_price"], 11000000.0);
    assert_eq!(patched["weight"], 390.0);
}

#[tokio::test]
async fn kandang_cannot_be_renamed_to_blank() {
    let app = spawn_app().await;
    let pen = json!({"name": "Kandang B", "capacity": 4, "type": "goat", "location": "Blok B"});
    let (_, pen) = admin_send(&app, Method::POST, "/kandang", pen).await;
    let uri = format!("/kandang/{}", pen["id"]);

    let (status, _) = admin_send(&app, Method::PATCH, &uri, json!({"name": "  "})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let (_, unchanged) = admin_get(&app, &uri).await;
    assert_eq!(unchanged["name"], "Kandang B");
}

async fn feeding_reminders(app: &TestApp) -> Vec<Value> {
    let (_, all) = admin_get(app, "/notifications?unread_only=true").await;
    all.as_array()
        .cloned()
        .unwrap_or_default()
        .into_iter()
        .filter(|n| n["kind"] == "feeding_reminder")
        .collect()
}

#[tokio::test]
async fn schedule_changes_leave_no_stale_reminders() {
    let app = spawn_app().await;
    let schedule = json!({
        "name": "Evening grain",
        "time": "17:00:00",
        "food_type": "grain",
        "quantity": 12.5,
        "unit": "kg",
        "notify_before_minutes": 20
    });
    let (status, schedule) = admin_send(&app, Method::POST, "/feeding/schedules", schedule).await;
    assert_eq!(status, StatusCode::CREATED);
    let uri = format!("/feeding/schedules/{}", schedule["id"]);

    for time in ["17:30:00", "18:00:00", "18:15:00"] {
        let (status, _) = admin_send(&app, Method::PATCH, &uri, json!({"time": time})).await;
        assert_eq!(status, StatusCode::OK);
    }
    let pending = feeding_reminders(&app).await;
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0]["schedule_id"], schedule["id"]);

    let (status, _) = admin_send(&app, Method::PATCH, &uri, json!({"is_active": false})).await;
    assert_eq!(status, StatusCode::OK);
    assert!(feeding_reminders(&app).await.is_empty());

    admin_send(&app, Method::PATCH, &uri, json!({"is_active": true})).await;
    assert_eq!(feeding_reminders(&app).await.len(), 1);

    let (status, _) = send(&app, Method::DELETE, &uri, Some(app.admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(feeding_reminders(&app).await.is_empty());
}

#[tokio::test]
async fn removed_animals_show_up_as_dangling_references() {
    let app = spawn_app().await;
    let (_, mother) = admin_send(&app, Method::POST, "/livestock", heifer("T-5", 410.0)).await;
    let (_, sold) = admin_send(&app, Method::POST, "/livestock", heifer("T-6", 400.0)).await;

    let mating = json!({
        "mother_id": mother["id"],
        "father_id": 9999,
        "breeding_date": "2024-03-01",
        "expected_delivery_date": "2024-12-10"
    });
    let (status, record) = admin_send(&app, Method::POST, "/breeding-records", mating).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, parents) =
        admin_get(&app, &format!("/breeding-records/{}/parents", record["id"])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parents["mother"]["resolution"], "resolved");
    assert_eq!(parents["mother"]["target"]["id"], mother["id"]);
    assert_eq!(parents["father"], json!({"resolution": "dangling", "reference": 9999}));

    let sale = json!({
        "livestock_id": sold["id"],
        "buyer_name": "Bu Ani",
        "buyer_contact": "0813-111",
        "price": 17000000.0
    });
    let (status, sale) = admin_send(&app, Method::POST, "/sales", sale).await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, none) = admin_get(&app, "/sales/dangling").await;
    assert_eq!(none, json!([]));

    let uri = format!("/livestock/{}", sold["id"]);
    let (status, _) = send(&app, Method::DELETE, &uri, Some(app.admin), None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, orphans) = admin_get(&app, "/sales/dangling").await;
    assert_eq!(orphans.as_array().map(Vec::len), Some(1));
    assert_eq!(orphans[0]["id"], sale["id"]);

    let (status, records) = admin_get(&app, "/health-records/dangling").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(records, json!([]));
}
