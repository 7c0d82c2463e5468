//! Selling an animal: record the sale, then mark the animal sold.
//!
//! The two writes touch different collections and are not atomic. If the
//! second write fails the sale is deleted again; if that delete also fails
//! the caller gets [`SaleWorkflowError::Inconsistent`] naming the orphan sale.

use crate::entities::livestock::{self, LivestockStatus};
use crate::entities::{sale, Livestock, Sale};
use crate::store::sales::NewSale;
use crate::store::{FarmStore, StoreError, StoreResult};

/// The writes the checkout needs, so the compensation path can be exercised
/// against a ledger that fails on demand.
#[async_trait::async_trait]
pub trait SaleLedger: Send + Sync {
    async fn find_livestock(&self, id: i32) -> StoreResult<livestock::Model>;
    async fn record_sale(&self, new: NewSale) -> StoreResult<sale::Model>;
    async fn mark_livestock(
        &self,
        id: i32,
        status: LivestockStatus,
    ) -> StoreResult<livestock::Model>;
    async fn remove_sale(&self, id: i32) -> StoreResult<()>;
}

#[async_trait::async_trait]
impl SaleLedger for FarmStore {
    async fn find_livestock(&self, id: i32) -> StoreResult<livestock::Model> {
        self.get::<Livestock>(id).await
    }

    async fn record_sale(&self, new: NewSale) -> StoreResult<sale::Model> {
        self.create_sale(new).await
    }

    async fn mark_livestock(
        &self,
        id: i32,
        status: LivestockStatus,
    ) -> StoreResult<livestock::Model> {
        self.set_livestock_status(id, status).await
    }

    async fn remove_sale(&self, id: i32) -> StoreResult<()> {
        self.delete::<Sale>(id).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SaleWorkflowError {
    #[error("livestock {id} is {status:?} and cannot be sold")]
    NotForSale { id: i32, status: LivestockStatus },

    /// Nothing was left behind: either no write happened or the sale was rolled back.
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("sale {sale_id} is recorded but livestock {livestock_id} is not marked sold: {source}")]
    Inconsistent {
        sale_id: i32,
        livestock_id: i32,
        #[source]
        source: StoreError,
    },
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Checkout {
    pub sale: sale::Model,
    pub livestock: livestock::Model,
}

pub async fn checkout<L>(ledger: &L, new: NewSale) -> Result<Checkout, SaleWorkflowError>
where
    L: SaleLedger + ?Sized,
{
    let livestock_id = new.livestock_id;
    let animal = ledger.find_livestock(livestock_id).await?;
    if matches!(animal.status, LivestockStatus::Sold | LivestockStatus::Deceased) {
        return Err(SaleWorkflowError::NotForSale {
            id: livestock_id,
            status: animal.status,
        });
    }

    let sale = ledger.record_sale(new).await?;

    match ledger.mark_livestock(livestock_id, LivestockStatus::Sold).await {
        Ok(livestock) => {
            crate::metrics::record_checkout("completed");
            Ok(Checkout { sale, livestock })
        }
        Err(mark_err) => {
            tracing::warn!(
                sale_id = sale.id,
                livestock_id,
                error = %mark_err,
                "marking livestock sold failed, rolling back sale"
            );
            match ledger.remove_sale(sale.id).await {
                Ok(()) => {
                    crate::metrics::record_checkout("rolled_back");
                    Err(SaleWorkflowError::Store(mark_err))
                }
                Err(undo_err) => {
                    tracing::error!(
                        sale_id = sale.id,
                        livestock_id,
                        error = %undo_err,
                        "sale rollback failed, sale and livestock disagree"
                    );
                    crate::metrics::record_checkout("inconsistent");
                    Err(SaleWorkflowError::Inconsistent {
                        sale_id: sale.id,
                        livestock_id,
                        source: mark_err,
                    })
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::tests::animal;
    use crate::store::sales::tests::sale_of;
    use std::sync::Mutex;
    use std::time::Duration;

    fn outage(op: &'static str) -> StoreError {
        StoreError::Timeout {
            op,
            after: Duration::from_secs(1),
        }
    }

    struct FlakyLedger {
        animal: livestock::Model,
        sales: Mutex<Vec<i32>>,
        fail_mark: bool,
        fail_remove: bool,
    }

    impl FlakyLedger {
        fn new(status: LivestockStatus, fail_mark: bool, fail_remove: bool) -> Self {
            Self {
                animal: animal(1, "Kandang A", status, 350.0),
                sales: Mutex::new(Vec::new()),
                fail_mark,
                fail_remove,
            }
        }

        fn recorded(&self) -> Vec<i32> {
            self.sales.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl SaleLedger for FlakyLedger {
        async fn find_livestock(&self, id: i32) -> StoreResult<livestock::Model> {
            if id == self.animal.id {
                Ok(self.animal.clone())
            } else {
                Err(StoreError::NotFound {
                    collection: "animals".to_string(),
                    id,
                })
            }
        }

        async fn record_sale(&self, new: NewSale) -> StoreResult<sale::Model> {
            let mut sales = self.sales.lock().unwrap();
            let id = sales.len() as i32 + 1;
            sales.push(id);
            let at = self.animal.created_at;
            Ok(sale::Model {
                id,
                livestock_id: new.livestock_id,
                buyer_name: new.buyer_name,
                buyer_contact: new.buyer_contact,
                price: new.price,
                sale_date: at.date(),
                payment_status: sale::PaymentStatus::Pending,
                delivery_status: sale::DeliveryStatus::Pending,
                notes: None,
                created_at: at,
                updated_at: at,
            })
        }

        async fn mark_livestock(
            &self,
            _id: i32,
            status: LivestockStatus,
        ) -> StoreResult<livestock::Model> {
            if self.fail_mark {
                return Err(outage("mark_livestock"));
            }
            Ok(livestock::Model {
                status,
                ..self.animal.clone()
            })
        }

        async fn remove_sale(&self, id: i32) -> StoreResult<()> {
            if self.fail_remove {
                return Err(outage("remove_sale"));
            }
            self.sales.lock().unwrap().retain(|s| *s != id);
            Ok(())
        }
    }

    #[tokio::test]
    async fn happy_path_marks_animal_sold() {
        let ledger = FlakyLedger::new(LivestockStatus::Healthy, false, false);
        let done = checkout(&ledger, sale_of(1, 15_000_000.0)).await.unwrap();
        assert_eq!(done.livestock.status, LivestockStatus::Sold);
        assert_eq!(done.sale.livestock_id, 1);
        assert_eq!(ledger.recorded(), vec![1]);
    }

    #[tokio::test]
    async fn failed_mark_rolls_back_sale() {
        let ledger = FlakyLedger::new(LivestockStatus::Healthy, true, false);
        let err = checkout(&ledger, sale_of(1, 100.0)).await.unwrap_err();
        assert!(matches!(err, SaleWorkflowError::Store(StoreError::Timeout { .. })));
        assert!(ledger.recorded().is_empty());
    }

    #[tokio::test]
    async fn failed_rollback_reports_orphan_sale() {
        let ledger = FlakyLedger::new(LivestockStatus::Healthy, true, true);
        let err = checkout(&ledger, sale_of(1, 100.0)).await.unwrap_err();
        match err {
            SaleWorkflowError::Inconsistent {
                sale_id,
                livestock_id,
                ..
            } => {
                assert_eq!((sale_id, livestock_id), (1, 1));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(ledger.recorded(), vec![1]);
    }

    #[tokio::test]
    async fn sold_or_dead_animals_are_refused_before_any_write() {
        for status in [LivestockStatus::Sold, LivestockStatus::Deceased] {
            let ledger = FlakyLedger::new(status, false, false);
            let err = checkout(&ledger, sale_of(1, 100.0)).await.unwrap_err();
            assert!(matches!(err, SaleWorkflowError::NotForSale { id: 1, .. }));
            assert!(ledger.recorded().is_empty());
        }
    }

    #[tokio::test]
    async fn missing_animal_is_not_found() {
        let ledger = FlakyLedger::new(LivestockStatus::Healthy, false, false);
        let err = checkout(&ledger, sale_of(2, 100.0)).await.unwrap_err();
        assert!(matches!(err, SaleWorkflowError::Store(StoreError::NotFound { id: 2, .. })));
    }

    #[tokio::test]
    async fn checkout_against_store() {
        let store = crate::store::testing::store().await;
        let cow = store
            .create_livestock(crate::store::livestock::tests::cow("T-9", "Kandang A", 420.0))
            .await
            .unwrap();

        let done = checkout(&store, sale_of(cow.id, 18_500_000.0)).await.unwrap();
        assert_eq!(done.livestock.status, LivestockStatus::Sold);
        assert_eq!(store.get::<Sale>(done.sale.id).await.unwrap().price, 18_500_000.0);

        let again = checkout(&store, sale_of(cow.id, 1.0)).await.unwrap_err();
        assert!(matches!(again, SaleWorkflowError::NotForSale { .. }));
    }
}
