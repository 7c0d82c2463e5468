use chrono::{Duration, NaiveDateTime, NaiveTime};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use serde::Deserialize;

use super::notifications::NewNotification;
use super::{now, DateRange, FarmStore, StoreError, StoreResult};
use crate::entities::livestock::LivestockType;
use crate::entities::{
    feeding_activity, feeding_schedule, notification, FeedingActivity, FeedingSchedule,
    Notification,
};

pub const FEEDING_REMINDER_KIND: &str = "feeding_reminder";

#[derive(Clone, Debug, Deserialize)]
pub struct NewFeedingSchedule {
    pub name: String,
    pub time: NaiveTime,
    pub food_type: String,
    pub quantity: f64,
    pub unit: String,
    pub livestock_type: Option<LivestockType>,
    pub kandang: Option<String>,
    pub notify_before_minutes: Option<i32>,
    pub is_active: Option<bool>,
}

/// Merge-patch: an absent field is kept, an explicit `null` clears it.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct FeedingSchedulePatch {
    pub name: Option<String>,
    pub time: Option<NaiveTime>,
    pub food_type: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub livestock_type: Option<Option<LivestockType>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub kandang: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub notify_before_minutes: Option<Option<i32>>,
    pub is_active: Option<bool>,
}

impl FeedingSchedulePatch {
    /// Whether the patch moves, silences or re-enables the reminder.
    fn touches_reminder(&self) -> bool {
        self.time.is_some() || self.notify_before_minutes.is_some() || self.is_active.is_some()
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewFeedingActivity {
    pub schedule_id: Option<i32>,
    pub schedule_name: Option<String>,
    pub fed_at: Option<NaiveDateTime>,
    pub food_type: String,
    pub quantity: f64,
    pub unit: String,
    pub kandang: Option<String>,
    pub performed_by: Option<String>,
    pub notes: Option<String>,
}

fn validate_quantity(quantity: f64) -> StoreResult<()> {
    if !quantity.is_finite() || quantity < 0.0 {
        return Err(StoreError::invalid(
            "quantity",
            format!("{quantity} is not a non-negative number"),
        ));
    }
    Ok(())
}

/// When the reminder for a feeding at `time` should fire: `lead_minutes`
/// before its next occurrence strictly after `now`.
pub fn next_reminder_at(now: NaiveDateTime, time: NaiveTime, lead_minutes: i32) -> NaiveDateTime {
    let lead = Duration::minutes(i64::from(lead_minutes.max(0)));
    let mut at = now.date().and_time(time) - lead;
    while at <= now {
        at += Duration::days(1);
    }
    at
}

impl FarmStore {
    pub async fn create_feeding_schedule(
        &self,
        new: NewFeedingSchedule,
    ) -> StoreResult<feeding_schedule::Model> {
        validate_quantity(new.quantity)?;
        let now = now();
        let model = feeding_schedule::ActiveModel {
            name: Set(new.name),
            time: Set(new.time),
            food_type: Set(new.food_type),
            quantity: Set(new.quantity),
            unit: Set(new.unit),
            livestock_type: Set(new.livestock_type),
            kandang: Set(new.kandang),
            notify_before_minutes: Set(new.notify_before_minutes),
            is_active: Set(new.is_active.unwrap_or(true)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let schedule = self
            .call("create_feeding_schedule", model.insert(self.connection()))
            .await?;
        self.record_feeding_reminder(&schedule).await;
        Ok(schedule)
    }

    pub async fn update_feeding_schedule(
        &self,
        id: i32,
        patch: FeedingSchedulePatch,
    ) -> StoreResult<feeding_schedule::Model> {
        if let Some(quantity) = patch.quantity {
            validate_quantity(quantity)?;
        }
        let reschedules = patch.touches_reminder();

        let current = self.get::<FeedingSchedule>(id).await?;
        let mut model = current.into_active_model();
        if let Some(name) = patch.name {
            model.name = Set(name);
        }
        if let Some(time) = patch.time {
            model.time = Set(time);
        }
        if let Some(food) = patch.food_type {
            model.food_type = Set(food);
        }
        if let Some(quantity) = patch.quantity {
            model.quantity = Set(quantity);
        }
        if let Some(unit) = patch.unit {
            model.unit = Set(unit);
        }
        if let Some(kind) = patch.livestock_type {
            model.livestock_type = Set(kind);
        }
        if let Some(kandang) = patch.kandang {
            model.kandang = Set(kandang);
        }
        if let Some(lead) = patch.notify_before_minutes {
            model.notify_before_minutes = Set(lead);
        }
        if let Some(active) = patch.is_active {
            model.is_active = Set(active);
        }
        model.updated_at = Set(now());

        let schedule = self
            .call("update_feeding_schedule", model.update(self.connection()))
            .await?;
        if reschedules {
            self.clear_pending_reminders(schedule.id).await?;
            self.record_feeding_reminder(&schedule).await;
        }
        Ok(schedule)
    }

    /// Deletes the schedule and the reminders still waiting on it.
    pub async fn delete_feeding_schedule(&self, id: i32) -> StoreResult<()> {
        self.delete::<FeedingSchedule>(id).await?;
        self.clear_pending_reminders(id).await?;
        Ok(())
    }

    /// Removes the unread reminders written for a schedule. Read ones stay
    /// as history.
    async fn clear_pending_reminders(&self, schedule_id: i32) -> StoreResult<u64> {
        let res = self
            .call(
                "clear_pending_reminders",
                Notification::delete_many()
                    .filter(notification::Column::ScheduleId.eq(schedule_id))
                    .filter(notification::Column::Kind.eq(FEEDING_REMINDER_KIND))
                    .filter(notification::Column::Read.eq(false))
                    .exec(self.connection()),
            )
            .await?;
        if res.rows_affected > 0 {
            tracing::debug!(schedule_id, cleared = res.rows_affected, "pending reminders cleared");
        }
        Ok(res.rows_affected)
    }

    pub async fn list_feeding_schedules(
        &self,
        active_only: bool,
    ) -> StoreResult<Vec<feeding_schedule::Model>> {
        let mut query = FeedingSchedule::find();
        if active_only {
            query = query.filter(feeding_schedule::Column::IsActive.eq(true));
        }
        self.call(
            "list_feeding_schedules",
            query
                .order_by_asc(feeding_schedule::Column::Time)
                .all(self.connection()),
        )
        .await
    }

    /// Writes the reminder document for an active schedule with a lead time.
    /// The schedule itself is already saved, so a failure here is only logged.
    async fn record_feeding_reminder(&self, schedule: &feeding_schedule::Model) {
        let Some(lead) = schedule.notify_before_minutes else {
            return;
        };
        if !schedule.is_active {
            return;
        }

        let reminder = NewNotification {
            user_id: None,
            kind: FEEDING_REMINDER_KIND.to_string(),
            title: format!("Feeding: {}", schedule.name),
            message: format!(
                "{} {} of {} at {}",
                schedule.quantity,
                schedule.unit,
                schedule.food_type,
                schedule.time.format("%H:%M")
            ),
            scheduled_for: Some(next_reminder_at(now(), schedule.time, lead)),
            schedule_id: Some(schedule.id),
        };
        if let Err(e) = self.create_notification(reminder).await {
            tracing::warn!(schedule_id = schedule.id, error = %e, "feeding reminder not recorded");
        }
    }

    pub async fn create_feeding_activity(
        &self,
        new: NewFeedingActivity,
    ) -> StoreResult<feeding_activity::Model> {
        validate_quantity(new.quantity)?;
        let now = now();
        let model = feeding_activity::ActiveModel {
            schedule_id: Set(new.schedule_id),
            schedule_name: Set(new.schedule_name),
            fed_at: Set(new.fed_at.unwrap_or(now)),
            food_type: Set(new.food_type),
            quantity: Set(new.quantity),
            unit: Set(new.unit),
            kandang: Set(new.kandang),
            performed_by: Set(new.performed_by),
            notes: Set(new.notes),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        self.call("create_feeding_activity", model.insert(self.connection())).await
    }

    pub async fn list_feeding_activities(
        &self,
        range: &DateRange,
    ) -> StoreResult<Vec<feeding_activity::Model>> {
        let mut condition = Condition::all();
        if let Some(start) = range.start() {
            condition = condition.add(feeding_activity::Column::FedAt.gte(start));
        }
        if let Some(end) = range.end_exclusive() {
            condition = condition.add(feeding_activity::Column::FedAt.lt(end));
        }
        self.call(
            "list_feeding_activities",
            FeedingActivity::find()
                .filter(condition)
                .order_by_desc(feeding_activity::Column::FedAt)
                .all(self.connection()),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing;
    use chrono::NaiveDate;

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, d)
            .and_then(|d| d.and_hms_opt(h, m, 0))
            .unwrap()
    }

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn reminder_fires_lead_before_next_feeding() {
        assert_eq!(next_reminder_at(at(1, 6, 0), hm(7, 0), 30), at(1, 6, 30));
        // Already past today's reminder: roll to tomorrow.
        assert_eq!(next_reminder_at(at(1, 6, 45), hm(7, 0), 30), at(2, 6, 30));
        // Lead crossing midnight.
        assert_eq!(next_reminder_at(at(1, 12, 0), hm(0, 10), 20), at(1, 23, 50));
    }

    fn morning_hay(lead: Option<i32>) -> NewFeedingSchedule {
        NewFeedingSchedule {
            name: "Morning hay".to_string(),
            time: hm(7, 0),
            food_type: "hay".to_string(),
            quantity: 25.0,
            unit: "kg".to_string(),
            livestock_type: Some(LivestockType::Cattle),
            kandang: Some("Kandang A".to_string()),
            notify_before_minutes: lead,
            is_active: None,
        }
    }

    #[tokio::test]
    async fn schedule_with_lead_time_writes_reminder_record() {
        let store = testing::store().await;
        store.create_feeding_schedule(morning_hay(Some(15))).await.unwrap();
        store.create_feeding_schedule(morning_hay(None)).await.unwrap();

        let reminders = store.all::<Notification>().await.unwrap();
        assert_eq!(reminders.len(), 1);
        assert_eq!(reminders[0].kind, FEEDING_REMINDER_KIND);
        assert!(reminders[0].scheduled_for.is_some());
        assert!(!reminders[0].read);
    }

    async fn pending_reminders(store: &FarmStore) -> Vec<notification::Model> {
        store
            .all::<Notification>()
            .await
            .unwrap()
            .into_iter()
            .filter(|n| n.kind == FEEDING_REMINDER_KIND && !n.read)
            .collect()
    }

    fn retime(h: u32, m: u32) -> FeedingSchedulePatch {
        FeedingSchedulePatch {
            time: Some(hm(h, m)),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn rescheduling_replaces_the_pending_reminder() {
        let store = testing::store().await;
        let schedule = store.create_feeding_schedule(morning_hay(Some(15))).await.unwrap();

        for (h, m) in [(8, 0), (9, 30), (17, 45)] {
            store.update_feeding_schedule(schedule.id, retime(h, m)).await.unwrap();
        }

        let pending = pending_reminders(&store).await;
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].schedule_id, Some(schedule.id));
        assert!(pending[0].message.ends_with("at 17:45"));
        let fires_at = pending[0].scheduled_for.unwrap().time();
        assert_eq!(fires_at, hm(17, 30));
    }

    #[tokio::test]
    async fn renaming_keeps_the_pending_reminder() {
        let store = testing::store().await;
        let schedule = store.create_feeding_schedule(morning_hay(Some(15))).await.unwrap();
        let before = pending_reminders(&store).await;

        let rename = FeedingSchedulePatch {
            name: Some("Early hay".to_string()),
            ..Default::default()
        };
        store.update_feeding_schedule(schedule.id, rename).await.unwrap();

        assert_eq!(pending_reminders(&store).await, before);
    }

    #[tokio::test]
    async fn deactivating_or_clearing_lead_drops_pending_reminder() {
        let store = testing::store().await;
        let paused = store.create_feeding_schedule(morning_hay(Some(15))).await.unwrap();
        let silenced = store.create_feeding_schedule(morning_hay(Some(30))).await.unwrap();
        assert_eq!(pending_reminders(&store).await.len(), 2);

        let pause = FeedingSchedulePatch {
            is_active: Some(false),
            ..Default::default()
        };
        store.update_feeding_schedule(paused.id, pause).await.unwrap();
        let patch: FeedingSchedulePatch =
            serde_json::from_value(serde_json::json!({ "notify_before_minutes": null })).unwrap();
        let updated = store.update_feeding_schedule(silenced.id, patch).await.unwrap();

        assert_eq!(updated.notify_before_minutes, None);
        assert!(pending_reminders(&store).await.is_empty());

        let resume = FeedingSchedulePatch {
            is_active: Some(true),
            ..Default::default()
        };
        store.update_feeding_schedule(paused.id, resume).await.unwrap();
        let pending = pending_reminders(&store).await;
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].schedule_id, Some(paused.id));
    }

    #[tokio::test]
    async fn deleting_schedule_drops_unread_reminders_only() {
        let store = testing::store().await;
        let schedule = store.create_feeding_schedule(morning_hay(Some(15))).await.unwrap();
        let seen = pending_reminders(&store).await[0].id;
        store.mark_notification_read(seen).await.unwrap();
        store.update_feeding_schedule(schedule.id, retime(8, 0)).await.unwrap();
        assert_eq!(pending_reminders(&store).await.len(), 1);

        store.delete_feeding_schedule(schedule.id).await.unwrap();

        assert!(pending_reminders(&store).await.is_empty());
        let kept = store.all::<Notification>().await.unwrap();
        assert_eq!(kept.len(), 1);
        assert!(kept[0].read);
        assert!(store.get::<FeedingSchedule>(schedule.id).await.is_err());
    }

    #[tokio::test]
    async fn deleting_missing_schedule_is_not_found() {
        let store = testing::store().await;
        let err = store.delete_feeding_schedule(404).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn activities_filter_by_day() {
        let store = testing::store().await;
        for fed_at in [at(1, 7, 0), at(2, 23, 59), at(3, 0, 0)] {
            store
                .create_feeding_activity(NewFeedingActivity {
                    schedule_id: None,
                    schedule_name: Some("Morning hay".to_string()),
                    fed_at: Some(fed_at),
                    food_type: "hay".to_string(),
                    quantity: 20.0,
                    unit: "kg".to_string(),
                    kandang: None,
                    performed_by: Some("Andi".to_string()),
                    notes: None,
                })
                .await
                .unwrap();
        }

        let range = DateRange {
            from: NaiveDate::from_ymd_opt(2024, 6, 2),
            to: NaiveDate::from_ymd_opt(2024, 6, 2),
        };
        let found = store.list_feeding_activities(&range).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].fed_at, at(2, 23, 59));
    }
}
