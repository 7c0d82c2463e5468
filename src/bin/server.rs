use std::sync::Arc;

use axum::{http::HeaderValue, routing::get, Router};
use axum_prometheus::PrometheusMetricLayer;
use livestock_server::config::AppConfig;
use livestock_server::migrator::Migrator;
use livestock_server::store::{FarmStore, SnapshotCache};
use livestock_server::{metrics, routes, telemetry};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;

#[tokio::main]
async fn main() {
    // Load .env if present (dotenvy)
    dotenvy::dotenv().ok();

    telemetry::init_telemetry("livestock-server");

    if let Err(e) = run().await {
        tracing::error!(error = %e, "server failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;
    let cors_origin = HeaderValue::from_str(&config.cors_origin)?;

    let db = Database::connect(&config.database_url).await?;
    if config.run_migrations {
        Migrator::up(&db, None).await?;
        tracing::info!("migrations applied");
    }

    let store = FarmStore::new(db, config.store_timeout);
    let snapshots = Arc::new(SnapshotCache::new(Arc::new(store.clone()), config.snapshot_ttl));

    // A store hiccup here only leaves the gauges empty until the first dashboard read.
    if let Err(e) = metrics::init_metrics(&store).await {
        tracing::warn!(error = %e, "could not seed farm metrics");
    }

    let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();
    let app = with_metrics(
        routes::app(store, snapshots, cors_origin),
        prometheus_layer,
        metric_handle,
    );

    tracing::info!("listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Request metrics on every route, scraped from `/metrics`.
fn with_metrics(
    app: Router,
    prometheus_layer: PrometheusMetricLayer<'static>,
    metric_handle: PrometheusHandle,
) -> Router {
    app.layer(prometheus_layer)
        .route("/metrics", get(move || async move { metric_handle.render() }))
}
