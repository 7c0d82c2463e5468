//! Append-only RFID scan and eating logs written by the barn readers.

use chrono::NaiveDateTime;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;

use super::{now, DateRange, FarmStore, StoreError, StoreResult};
use crate::entities::{eating_log, rfid_log, EatingLog, RfidLog};

#[derive(Clone, Debug, Deserialize)]
pub struct NewRfidLog {
    pub tag_id: String,
    pub reader: String,
    pub kandang: Option<String>,
    pub scanned_at: Option<NaiveDateTime>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewEatingLog {
    pub tag_id: String,
    pub kandang: Option<String>,
    pub started_at: NaiveDateTime,
    pub duration_seconds: i32,
    pub amount: Option<f64>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct LogFilter {
    pub tag_id: Option<String>,
    pub from: Option<chrono::NaiveDate>,
    pub to: Option<chrono::NaiveDate>,
}

impl LogFilter {
    fn range(&self) -> DateRange {
        DateRange {
            from: self.from,
            to: self.to,
        }
    }
}

impl FarmStore {
    pub async fn create_rfid_log(&self, new: NewRfidLog) -> StoreResult<rfid_log::Model> {
        if new.tag_id.trim().is_empty() {
            return Err(StoreError::invalid("tag_id", "must not be empty"));
        }
        let now = now();
        let model = rfid_log::ActiveModel {
            tag_id: Set(new.tag_id),
            reader: Set(new.reader),
            kandang: Set(new.kandang),
            scanned_at: Set(new.scanned_at.unwrap_or(now)),
            created_at: Set(now),
            ..Default::default()
        };
        self.call("create_rfid_log", model.insert(self.connection())).await
    }

    pub async fn list_rfid_logs(&self, filter: &LogFilter) -> StoreResult<Vec<rfid_log::Model>> {
        let range = filter.range();
        let mut condition = Condition::all();
        if let Some(tag) = &filter.tag_id {
            condition = condition.add(rfid_log::Column::TagId.eq(tag.as_str()));
        }
        if let Some(start) = range.start() {
            condition = condition.add(rfid_log::Column::ScannedAt.gte(start));
        }
        if let Some(end) = range.end_exclusive() {
            condition = condition.add(rfid_log::Column::ScannedAt.lt(end));
        }
        self.call(
            "list_rfid_logs",
            RfidLog::find()
                .filter(condition)
                .order_by_desc(rfid_log::Column::ScannedAt)
                .all(self.connection()),
        )
        .await
    }

    pub async fn create_eating_log(&self, new: NewEatingLog) -> StoreResult<eating_log::Model> {
        if new.duration_seconds < 0 {
            return Err(StoreError::invalid("duration_seconds", "must not be negative"));
        }
        let model = eating_log::ActiveModel {
            tag_id: Set(new.tag_id),
            kandang: Set(new.kandang),
            started_at: Set(new.started_at),
            duration_seconds: Set(new.duration_seconds),
            amount: Set(new.amount),
            created_at: Set(now()),
            ..Default::default()
        };
        self.call("create_eating_log", model.insert(self.connection())).await
    }

    pub async fn list_eating_logs(
        &self,
        filter: &LogFilter,
    ) -> StoreResult<Vec<eating_log::Model>> {
        let range = filter.range();
        let mut condition = Condition::all();
        if let Some(tag) = &filter.tag_id {
            condition = condition.add(eating_log::Column::TagId.eq(tag.as_str()));
        }
        if let Some(start) = range.start() {
            condition = condition.add(eating_log::Column::StartedAt.gte(start));
        }
        if let Some(end) = range.end_exclusive() {
            condition = condition.add(eating_log::Column::StartedAt.lt(end));
        }
        self.call(
            "list_eating_logs",
            EatingLog::find()
                .filter(condition)
                .order_by_desc(eating_log::Column::StartedAt)
                .all(self.connection()),
        )
        .await
    }
}
