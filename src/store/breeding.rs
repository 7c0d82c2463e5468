use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;

use super::{now, FarmStore, StoreResult};
use crate::entities::breeding_record::{self, BreedingStatus};
use crate::entities::BreedingRecord;

#[derive(Clone, Debug, Deserialize)]
pub struct NewBreedingRecord {
    pub mother_id: i32,
    pub father_id: Option<i32>,
    pub breeding_date: NaiveDate,
    pub expected_delivery_date: NaiveDate,
    pub actual_delivery_date: Option<NaiveDate>,
    pub status: Option<BreedingStatus>,
    pub number_of_offspring: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct BreedingPatch {
    pub mother_id: Option<i32>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub father_id: Option<Option<i32>>,
    pub breeding_date: Option<NaiveDate>,
    pub expected_delivery_date: Option<NaiveDate>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub actual_delivery_date: Option<Option<NaiveDate>>,
    pub status: Option<BreedingStatus>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub number_of_offspring: Option<Option<i32>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub notes: Option<Option<String>>,
}

impl FarmStore {
    pub async fn create_breeding_record(
        &self,
        new: NewBreedingRecord,
    ) -> StoreResult<breeding_record::Model> {
        let now = now();
        let model = breeding_record::ActiveModel {
            mother_id: Set(new.mother_id),
            father_id: Set(new.father_id),
            breeding_date: Set(new.breeding_date),
            expected_delivery_date: Set(new.expected_delivery_date),
            actual_delivery_date: Set(new.actual_delivery_date),
            status: Set(new.status.unwrap_or(BreedingStatus::Planned)),
            number_of_offspring: Set(new.number_of_offspring),
            notes: Set(new.notes),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        self.call("create_breeding_record", model.insert(self.connection())).await
    }

    /// Any status may replace any other; transitions are operator-driven.
    pub async fn update_breeding_record(
        &self,
        id: i32,
        patch: BreedingPatch,
    ) -> StoreResult<breeding_record::Model> {
        let current = self.get::<BreedingRecord>(id).await?;
        let mut model = current.into_active_model();
        if let Some(mother) = patch.mother_id {
            model.mother_id = Set(mother);
        }
        if let Some(father) = patch.father_id {
            model.father_id = Set(father);
        }
        if let Some(date) = patch.breeding_date {
            model.breeding_date = Set(date);
        }
        if let Some(date) = patch.expected_delivery_date {
            model.expected_delivery_date = Set(date);
        }
        if let Some(date) = patch.actual_delivery_date {
            model.actual_delivery_date = Set(date);
        }
        if let Some(status) = patch.status {
            model.status = Set(status);
        }
        if let Some(count) = patch.number_of_offspring {
            model.number_of_offspring = Set(count);
        }
        if let Some(notes) = patch.notes {
            model.notes = Set(notes);
        }
        model.updated_at = Set(now());
        self.call("update_breeding_record", model.update(self.connection())).await
    }

    pub async fn list_breeding_records(
        &self,
        status: Option<BreedingStatus>,
    ) -> StoreResult<Vec<breeding_record::Model>> {
        let mut query = BreedingRecord::find();
        if let Some(status) = status {
            query = query.filter(breeding_record::Column::Status.eq(status));
        }
        self.call(
            "list_breeding_records",
            query
                .order_by_desc(breeding_record::Column::BreedingDate)
                .all(self.connection()),
        )
        .await
    }
}
