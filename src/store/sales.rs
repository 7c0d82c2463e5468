use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use serde::Deserialize;

use super::{now, FarmStore, StoreError, StoreResult};
use crate::entities::sale::{self, DeliveryStatus, PaymentStatus};
use crate::entities::Sale;

#[derive(Clone, Debug, Deserialize)]
pub struct NewSale {
    pub livestock_id: i32,
    pub buyer_name: String,
    pub buyer_contact: String,
    pub price: f64,
    pub sale_date: Option<NaiveDate>,
    pub payment_status: Option<PaymentStatus>,
    pub delivery_status: Option<DeliveryStatus>,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct SalePatch {
    pub buyer_name: Option<String>,
    pub buyer_contact: Option<String>,
    pub price: Option<f64>,
    pub sale_date: Option<NaiveDate>,
    pub payment_status: Option<PaymentStatus>,
    pub delivery_status: Option<DeliveryStatus>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub notes: Option<Option<String>>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct SaleFilter {
    pub payment_status: Option<PaymentStatus>,
    pub delivery_status: Option<DeliveryStatus>,
}

fn validate_price(price: f64) -> StoreResult<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(StoreError::invalid("price", format!("{price} is not a non-negative number")));
    }
    Ok(())
}

impl FarmStore {
    /// Records a sale. The animal's own status is not touched here.
    pub async fn create_sale(&self, new: NewSale) -> StoreResult<sale::Model> {
        validate_price(new.price)?;
        let now = now();
        let model = sale::ActiveModel {
            livestock_id: Set(new.livestock_id),
            buyer_name: Set(new.buyer_name),
            buyer_contact: Set(new.buyer_contact),
            price: Set(new.price),
            sale_date: Set(new.sale_date.unwrap_or_else(|| now.date())),
            payment_status: Set(new.payment_status.unwrap_or(PaymentStatus::Pending)),
            delivery_status: Set(new.delivery_status.unwrap_or(DeliveryStatus::Pending)),
            notes: Set(new.notes),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let created = self.call("create_sale", model.insert(self.connection())).await?;
        tracing::info!(sale_id = created.id, livestock_id = created.livestock_id, "sale recorded");
        Ok(created)
    }

    /// Payment and delivery status are patched independently of each other.
    pub async fn update_sale(&self, id: i32, patch: SalePatch) -> StoreResult<sale::Model> {
        if let Some(price) = patch.price {
            validate_price(price)?;
        }
        let current = self.get::<Sale>(id).await?;
        let mut model = current.into_active_model();
        if let Some(name) = patch.buyer_name {
            model.buyer_name = Set(name);
        }
        if let Some(contact) = patch.buyer_contact {
            model.buyer_contact = Set(contact);
        }
        if let Some(price) = patch.price {
            model.price = Set(price);
        }
        if let Some(date) = patch.sale_date {
            model.sale_date = Set(date);
        }
        if let Some(status) = patch.payment_status {
            model.payment_status = Set(status);
        }
        if let Some(status) = patch.delivery_status {
            model.delivery_status = Set(status);
        }
        if let Some(notes) = patch.notes {
            model.notes = Set(notes);
        }
        model.updated_at = Set(now());
        self.call("update_sale", model.update(self.connection())).await
    }

    pub async fn list_sales(&self, filter: &SaleFilter) -> StoreResult<Vec<sale::Model>> {
        let mut condition = Condition::all();
        if let Some(status) = filter.payment_status {
            condition = condition.add(sale::Column::PaymentStatus.eq(status));
        }
        if let Some(status) = filter.delivery_status {
            condition = condition.add(sale::Column::DeliveryStatus.eq(status));
        }
        self.call(
            "list_sales",
            Sale::find()
                .filter(condition)
                .order_by_desc(sale::Column::SaleDate)
                .all(self.connection()),
        )
        .await
    }
}
