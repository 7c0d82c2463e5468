use chrono::{Days, NaiveDate};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use serde::Deserialize;

use super::{now, DateRange, FarmStore, StoreResult};
use crate::entities::health_record::{self, HealthRecordStatus, HealthRecordType};
use crate::entities::HealthRecord;

#[derive(Clone, Debug, Deserialize)]
pub struct NewHealthRecord {
    pub livestock_id: i32,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub record_type: HealthRecordType,
    pub status: HealthRecordStatus,
    pub description: String,
    pub next_checkup: Option<NaiveDate>,
    pub veterinarian: Option<String>,
    pub medication: Option<String>,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct HealthRecordPatch {
    pub date: Option<NaiveDate>,
    #[serde(rename = "type")]
    pub record_type: Option<HealthRecordType>,
    pub status: Option<HealthRecordStatus>,
    pub description: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub next_checkup: Option<Option<NaiveDate>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub veterinarian: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub medication: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub notes: Option<Option<String>>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct HealthRecordFilter {
    pub livestock_id: Option<i32>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl HealthRecordFilter {
    pub fn range(&self) -> DateRange {
        DateRange {
            from: self.from,
            to: self.to,
        }
    }
}

impl FarmStore {
    pub async fn create_health_record(
        &self,
        new: NewHealthRecord,
    ) -> StoreResult<health_record::Model> {
        let now = now();
        let model = health_record::ActiveModel {
            livestock_id: Set(new.livestock_id),
            date: Set(new.date),
            record_type: Set(new.record_type),
            status: Set(new.status),
            description: Set(new.description),
            next_checkup: Set(new.next_checkup),
            veterinarian: Set(new.veterinarian),
            medication: Set(new.medication),
            notes: Set(new.notes),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        self.call("create_health_record", model.insert(self.connection())).await
    }

    pub async fn update_health_record(
        &self,
        id: i32,
        patch: HealthRecordPatch,
    ) -> StoreResult<health_record::Model> {
        let current = self.get::<HealthRecord>(id).await?;
        let mut model = current.into_active_model();
        if let Some(date) = patch.date {
            model.date = Set(date);
        }
        if let Some(kind) = patch.record_type {
            model.record_type = Set(kind);
        }
        if let Some(status) = patch.status {
            model.status = Set(status);
        }
        if let Some(description) = patch.description {
            model.description = Set(description);
        }
        if let Some(next) = patch.next_checkup {
            model.next_checkup = Set(next);
        }
        if let Some(vet) = patch.veterinarian {
            model.veterinarian = Set(vet);
        }
        if let Some(medication) = patch.medication {
            model.medication = Set(medication);
        }
        if let Some(notes) = patch.notes {
            model.notes = Set(notes);
        }
        model.updated_at = Set(now());
        self.call("update_health_record", model.update(self.connection())).await
    }

    pub async fn list_health_records(
        &self,
        filter: &HealthRecordFilter,
    ) -> StoreResult<Vec<health_record::Model>> {
        let mut condition = Condition::all();
        if let Some(livestock_id) = filter.livestock_id {
            condition = condition.add(health_record::Column::LivestockId.eq(livestock_id));
        }
        let range = filter.range();
        if let Some(from) = range.from {
            condition = condition.add(health_record::Column::Date.gte(from));
        }
        if let Some(to) = range.to {
            condition = condition.add(health_record::Column::Date.lte(to));
        }
        self.call(
            "list_health_records",
            HealthRecord::find()
                .filter(condition)
                .order_by_desc(health_record::Column::Date)
                .all(self.connection()),
        )
        .await
    }

    /// Records whose next checkup falls in `[today, today + days]`.
    pub async fn upcoming_checkups(
        &self,
        today: NaiveDate,
        days: u64,
    ) -> StoreResult<Vec<health_record::Model>> {
        let until = today.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX);
        self.call(
            "upcoming_checkups",
            HealthRecord::find()
                .filter(health_record::Column::NextCheckup.between(today, until))
                .order_by_asc(health_record::Column::NextCheckup)
                .all(self.connection()),
        )
        .await
    }
}
