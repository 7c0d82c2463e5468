//! Entity store: CRUD over the farm collections.
//!
//! Every call runs under a timeout and reports failures as [`StoreError`];
//! an empty `Vec` always means the collection really is empty.

use std::future::Future;
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::{DatabaseConnection, DbErr, EntityTrait, PrimaryKeyTrait};
use serde::Deserialize;

pub mod breeding;
pub mod feeding;
pub mod health;
pub mod kandang;
pub mod livestock;
pub mod logs;
pub mod notifications;
pub mod sales;
pub mod snapshot;
pub mod users;

pub use snapshot::{FarmSnapshot, SnapshotCache, SnapshotSource};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{collection} record {id} not found")]
    NotFound { collection: String, id: i32 },

    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("store call `{op}` failed: {source}")]
    Database {
        op: &'static str,
        #[source]
        source: DbErr,
    },

    #[error("store call `{op}` timed out after {after:?}")]
    Timeout { op: &'static str, after: Duration },
}

impl StoreError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        StoreError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Inclusive calendar range used by the date filters.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn start(&self) -> Option<NaiveDateTime> {
        self.from.and_then(|d| d.and_hms_opt(0, 0, 0))
    }

    /// First instant after the range, for timestamp columns.
    pub fn end_exclusive(&self) -> Option<NaiveDateTime> {
        self.to
            .and_then(|d| d.succ_opt())
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    }
}

#[derive(Clone)]
pub struct FarmStore {
    db: DatabaseConnection,
    timeout: Duration,
}

impl FarmStore {
    pub fn new(db: DatabaseConnection, timeout: Duration) -> Self {
        Self { db, timeout }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Runs one database future under the store timeout.
    pub(crate) async fn call<T, F>(&self, op: &'static str, fut: F) -> StoreResult<T>
    where
        F: Future<Output = Result<T, DbErr>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(source)) => {
                tracing::error!(op, error = %source, "store call failed");
                Err(StoreError::Database { op, source })
            }
            Err(_) => {
                tracing::warn!(op, timeout = ?self.timeout, "store call timed out");
                Err(StoreError::Timeout {
                    op,
                    after: self.timeout,
                })
            }
        }
    }

    pub async fn get<E>(&self, id: i32) -> StoreResult<E::Model>
    where
        E: EntityTrait,
        <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i32>,
    {
        self.call("get", E::find_by_id(id).one(&self.db))
            .await?
            .ok_or_else(|| StoreError::NotFound {
                collection: E::default().table_name().to_owned(),
                id,
            })
    }

    /// Full collection scan. No pagination.
    pub async fn all<E>(&self) -> StoreResult<Vec<E::Model>>
    where
        E: EntityTrait,
    {
        self.call("all", E::find().all(&self.db)).await
    }

    /// Hard delete. References held by other collections are left alone.
    pub async fn delete<E>(&self, id: i32) -> StoreResult<()>
    where
        E: EntityTrait,
        <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i32>,
    {
        let res = self.call("delete", E::delete_by_id(id).exec(&self.db)).await?;
        if res.rows_affected == 0 {
            return Err(StoreError::NotFound {
                collection: E::default().table_name().to_owned(),
                id,
            });
        }
        Ok(())
    }
}

pub(crate) fn now() -> NaiveDateTime {
    chrono::Utc::now().naive_utc()
}

#[cfg(test)]
pub(crate) mod testing {
    use super::FarmStore;
    use crate::migrator::Migrator;
    use sea_orm::Database;
    use sea_orm_migration::MigratorTrait;
    use std::time::Duration;

    /// Fresh in-memory store with the real migrations applied.
    pub async fn store() -> FarmStore {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("sqlite connects");
        Migrator::up(&db, None).await.expect("migrations apply");
        FarmStore::new(db, Duration::from_secs(5))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Livestock;

    #[test]
    fn date_range_bounds_cover_whole_days() {
        let range = DateRange {
            from: NaiveDate::from_ymd_opt(2024, 3, 1),
            to: NaiveDate::from_ymd_opt(2024, 3, 31),
        };
        assert_eq!(
            range.start(),
            NaiveDate::from_ymd_opt(2024, 3, 1).and_then(|d| d.and_hms_opt(0, 0, 0))
        );
        assert_eq!(
            range.end_exclusive(),
            NaiveDate::from_ymd_opt(2024, 4, 1).and_then(|d| d.and_hms_opt(0, 0, 0))
        );
        assert_eq!(DateRange::default().start(), None);
    }

    #[tokio::test]
    async fn missing_record_is_not_found() {
        let store = testing::store().await;
        let err = store.get::<Livestock>(42).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { id: 42, .. }), "{err}");

        let err = store.delete::<Livestock>(42).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn empty_collection_is_ok_not_error() {
        let store = testing::store().await;
        let herd = store.all::<Livestock>().await.unwrap();
        assert!(herd.is_empty());
    }

    #[tokio::test]
    async fn slow_call_times_out() {
        let store = testing::store().await;
        let store = FarmStore::new(store.connection().clone(), Duration::from_millis(10));
        let slow = async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok::<_, DbErr>(())
        };
        let err = store.call("slow", slow).await.unwrap_err();
        assert!(matches!(err, StoreError::Timeout { op: "slow", .. }));
    }
}
