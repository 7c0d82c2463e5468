use crate::stats::DashboardStats;
use crate::store::{SnapshotSource, StoreResult};

/// Seeds the herd gauges at startup so `/metrics` is meaningful before the
/// first dashboard request.
pub async fn init_metrics(source: &dyn SnapshotSource) -> StoreResult<()> {
    let snapshot = source.load_snapshot().await?;
    let stats = crate::stats::dashboard(
        &snapshot.livestock,
        &snapshot.sales,
        &snapshot.breeding,
        &snapshot.kandang,
    );
    publish_dashboard(&stats);

    tracing::info!(
        "Initialized metrics: Livestock={}, Kandang={}, Sales={}",
        stats.total_livestock,
        stats.total_kandang,
        snapshot.sales.len()
    );
    Ok(())
}

pub fn publish_dashboard(stats: &DashboardStats) {
    metrics::gauge!("farm_livestock_total").set(stats.total_livestock as f64);
    let by_status = [
        ("healthy", stats.healthy_count),
        ("sick", stats.sick_count),
        ("quarantine", stats.quarantine_count),
        ("deceased", stats.deceased_count),
    ];
    for (status, count) in by_status {
        metrics::gauge!("farm_livestock_by_status", "status" => status).set(count as f64);
    }
    metrics::gauge!("farm_breeding_active").set(stats.active_breeding as f64);
    metrics::gauge!("farm_sales_pending_delivery").set(stats.pending_sales as f64);
    metrics::gauge!("farm_revenue_total").set(stats.total_revenue);
    metrics::gauge!("farm_revenue_pending").set(stats.pending_revenue);
}

pub fn increment_records_created(collection: &'static str) {
    metrics::counter!("farm_records_created_total", "collection" => collection).increment(1);
}

pub fn record_checkout(outcome: &'static str) {
    metrics::counter!("farm_checkouts_total", "outcome" => outcome).increment(1);
}
