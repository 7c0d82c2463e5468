use chrono::NaiveDateTime;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};

use super::{now, FarmStore, StoreResult};
use crate::entities::{notification, notification_setting, Notification, NotificationSetting};

#[derive(Clone, Debug, Deserialize)]
pub struct NewNotification {
    pub user_id: Option<i32>,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub scheduled_for: Option<NaiveDateTime>,
    /// Only written by the feeding schedule code.
    #[serde(skip)]
    pub schedule_id: Option<i32>,
}

/// Per-user reminder preferences. Users without a stored document get the defaults.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct NotificationSettings {
    pub feeding_reminders: bool,
    pub health_reminders: bool,
    pub lead_minutes: i32,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            feeding_reminders: true,
            health_reminders: true,
            lead_minutes: 30,
        }
    }
}

impl From<notification_setting::Model> for NotificationSettings {
    fn from(model: notification_setting::Model) -> Self {
        Self {
            feeding_reminders: model.feeding_reminders,
            health_reminders: model.health_reminders,
            lead_minutes: model.lead_minutes,
        }
    }
}

impl FarmStore {
    pub async fn create_notification(
        &self,
        new: NewNotification,
    ) -> StoreResult<notification::Model> {
        let now = now();
        let model = notification::ActiveModel {
            user_id: Set(new.user_id),
            kind: Set(new.kind),
            title: Set(new.title),
            message: Set(new.message),
            scheduled_for: Set(new.scheduled_for),
            schedule_id: Set(new.schedule_id),
            read: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        self.call("create_notification", model.insert(self.connection())).await
    }

    /// Notifications addressed to `user_id` plus broadcast ones (no user).
    pub async fn list_notifications(
        &self,
        user_id: i32,
        unread_only: bool,
    ) -> StoreResult<Vec<notification::Model>> {
        let audience = Condition::any()
            .add(notification::Column::UserId.eq(user_id))
            .add(notification::Column::UserId.is_null());
        let mut condition = Condition::all().add(audience);
        if unread_only {
            condition = condition.add(notification::Column::Read.eq(false));
        }
        self.call(
            "list_notifications",
            Notification::find()
                .filter(condition)
                .order_by_desc(notification::Column::CreatedAt)
                .all(self.connection()),
        )
        .await
    }

    pub async fn mark_notification_read(&self, id: i32) -> StoreResult<notification::Model> {
        let current = self.get::<Notification>(id).await?;
        let mut model = current.into_active_model();
        model.read = Set(true);
        model.updated_at = Set(now());
        self.call("mark_notification_read", model.update(self.connection())).await
    }

    pub async fn notification_settings(&self, user_id: i32) -> StoreResult<NotificationSettings> {
        let stored = self
            .call(
                "notification_settings",
                NotificationSetting::find()
                    .filter(notification_setting::Column::UserId.eq(user_id))
                    .one(self.connection()),
            )
            .await?;
        Ok(stored.map(Into::into).unwrap_or_default())
    }

    pub async fn save_notification_settings(
        &self,
        user_id: i32,
        settings: NotificationSettings,
    ) -> StoreResult<NotificationSettings> {
        let stored = self
            .call(
                "save_notification_settings",
                NotificationSetting::find()
                    .filter(notification_setting::Column::UserId.eq(user_id))
                    .one(self.connection()),
            )
            .await?;

        let saved = match stored {
            Some(existing) => {
                let mut model = existing.into_active_model();
                model.feeding_reminders = Set(settings.feeding_reminders);
                model.health_reminders = Set(settings.health_reminders);
                model.lead_minutes = Set(settings.lead_minutes);
                model.updated_at = Set(now());
                self.call("save_notification_settings", model.update(self.connection()))
                    .await?
            }
            None => {
                let model = notification_setting::ActiveModel {
                    user_id: Set(user_id),
                    feeding_reminders: Set(settings.feeding_reminders),
                    health_reminders: Set(settings.health_reminders),
                    lead_minutes: Set(settings.lead_minutes),
                    updated_at: Set(now()),
                    ..Default::default()
                };
                self.call("save_notification_settings", model.insert(self.connection()))
                    .await?
            }
        };
        Ok(saved.into())
    }
}
