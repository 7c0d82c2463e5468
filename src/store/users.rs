use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, QueryOrder, Set};
use serde::Deserialize;

use super::{now, FarmStore, StoreError, StoreResult};
use crate::entities::user::{self, Role};
use crate::entities::User;

#[derive(Clone, Debug, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub name: String,
}

impl FarmStore {
    pub async fn create_user(&self, new: NewUser, role: Role) -> StoreResult<user::Model> {
        if !new.email.contains('@') {
            return Err(StoreError::invalid("email", "must be an email address"));
        }
        let now = now();
        let model = user::ActiveModel {
            email: Set(new.email),
            name: Set(new.name),
            role: Set(role),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let created = self.call("create_user", model.insert(self.connection())).await?;
        tracing::info!(user_id = created.id, role = ?created.role, "user profile created");
        Ok(created)
    }

    pub async fn set_user_role(&self, id: i32, role: Role) -> StoreResult<user::Model> {
        let current = self.get::<User>(id).await?;
        let mut model = current.into_active_model();
        model.role = Set(role);
        model.updated_at = Set(now());
        self.call("set_user_role", model.update(self.connection())).await
    }

    pub async fn list_users(&self) -> StoreResult<Vec<user::Model>> {
        self.call(
            "list_users",
            User::find().order_by_asc(user::Column::Id).all(self.connection()),
        )
        .await
    }
}
