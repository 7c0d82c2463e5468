//! Point-in-time copies of the collections the dashboard aggregates over.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use super::{FarmStore, StoreResult};
use crate::entities::{breeding_record, kandang, livestock, sale};
use crate::entities::{BreedingRecord, Kandang, Livestock, Sale};

#[derive(Clone, Debug, Default)]
pub struct FarmSnapshot {
    pub livestock: Vec<livestock::Model>,
    pub kandang: Vec<kandang::Model>,
    pub sales: Vec<sale::Model>,
    pub breeding: Vec<breeding_record::Model>,
}

/// Where snapshots come from. The four collections are read independently,
/// so a write racing the load may be visible in some and not others.
#[async_trait::async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn load_snapshot(&self) -> StoreResult<FarmSnapshot>;
}

#[async_trait::async_trait]
impl SnapshotSource for FarmStore {
    async fn load_snapshot(&self) -> StoreResult<FarmSnapshot> {
        let (livestock, kandang, sales, breeding) = tokio::try_join!(
            self.all::<Livestock>(),
            self.all::<Kandang>(),
            self.all::<Sale>(),
            self.all::<BreedingRecord>(),
        )?;
        Ok(FarmSnapshot {
            livestock,
            kandang,
            sales,
            breeding,
        })
    }
}

struct Cached {
    loaded_at: Instant,
    snapshot: Arc<FarmSnapshot>,
}

/// Short-lived snapshot shared by readers, dropped on every write.
///
/// A zero TTL disables caching: every `get` reloads.
pub struct SnapshotCache {
    source: Arc<dyn SnapshotSource>,
    ttl: Duration,
    slot: RwLock<Option<Cached>>,
}

impl SnapshotCache {
    pub fn new(source: Arc<dyn SnapshotSource>, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            slot: RwLock::new(None),
        }
    }

    pub async fn get(&self) -> StoreResult<Arc<FarmSnapshot>> {
        if let Some(hit) = self.fresh().await {
            return Ok(hit);
        }

        let mut slot = self.slot.write().await;
        // Another reader may have refilled the slot while we waited.
        if let Some(cached) = slot.as_ref() {
            if !self.ttl.is_zero() && cached.loaded_at.elapsed() < self.ttl {
                return Ok(cached.snapshot.clone());
            }
        }

        let snapshot = Arc::new(self.source.load_snapshot().await?);
        if !self.ttl.is_zero() {
            *slot = Some(Cached {
                loaded_at: Instant::now(),
                snapshot: snapshot.clone(),
            });
        }
        tracing::debug!(livestock = snapshot.livestock.len(), "farm snapshot loaded");
        Ok(snapshot)
    }

    pub async fn invalidate(&self) {
        self.slot.write().await.take();
    }

    async fn fresh(&self) -> Option<Arc<FarmSnapshot>> {
        if self.ttl.is_zero() {
            return None;
        }
        let slot = self.slot.read().await;
        slot.as_ref()
            .filter(|cached| cached.loaded_at.elapsed() < self.ttl)
            .map(|cached| cached.snapshot.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingSource {
        loads: AtomicUsize,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl SnapshotSource for CountingSource {
        async fn load_snapshot(&self) -> StoreResult<FarmSnapshot> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(StoreError::Timeout {
                    op: "all",
                    after: Duration::from_secs(1),
                });
            }
            Ok(FarmSnapshot::default())
        }
    }

    #[tokio::test]
    async fn reuses_snapshot_until_invalidated() {
        let source = Arc::new(CountingSource::default());
        let cache = SnapshotCache::new(source.clone(), Duration::from_secs(60));

        cache.get().await.unwrap();
        cache.get().await.unwrap();
        assert_eq!(source.loads.load(Ordering::SeqCst), 1);

        cache.invalidate().await;
        cache.get().await.unwrap();
        assert_eq!(source.loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn zero_ttl_always_reloads() {
        let source = Arc::new(CountingSource::default());
        let cache = SnapshotCache::new(source.clone(), Duration::ZERO);
        cache.get().await.unwrap();
        cache.get().await.unwrap();
        assert_eq!(source.loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failed_load_is_reported_and_not_cached() {
        let source = Arc::new(CountingSource {
            fail: true,
            ..Default::default()
        });
        let cache = SnapshotCache::new(source.clone(), Duration::from_secs(60));
        assert!(cache.get().await.is_err());
        assert!(cache.get().await.is_err());
        assert_eq!(source.loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn store_snapshot_reads_all_collections() {
        let store = crate::store::testing::store().await;
        store
            .create_livestock(crate::store::livestock::tests::cow("T-1", "Kandang A", 400.0))
            .await
            .unwrap();
        store
            .create_kandang(crate::store::kandang::tests::pen("Kandang A", 5))
            .await
            .unwrap();

        let snapshot = store.load_snapshot().await.unwrap();
        assert_eq!(snapshot.livestock.len(), 1);
        assert_eq!(snapshot.kandang.len(), 1);
        assert!(snapshot.sales.is_empty());
        assert!(snapshot.breeding.is_empty());
    }
}
