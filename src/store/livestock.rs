use std::collections::HashMap;

use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use serde::Deserialize;

use super::{now, FarmStore, StoreError, StoreResult};
use crate::entities::livestock::{self, Gender, LivestockStatus, LivestockType};
use crate::entities::Livestock;

#[derive(Clone, Debug, Deserialize)]
pub struct NewLivestock {
    pub tag_id: String,
    pub animal_id: Option<String>,
    #[serde(rename = "type")]
    pub livestock_type: LivestockType,
    pub breed: String,
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
    pub weight: f64,
    pub status: Option<LivestockStatus>,
    pub location: String,
    pub photo_url: Option<String>,
    pub notes: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub purchase_price: Option<f64>,
}

/// Merge-patch body. Absent fields are left alone; nullable fields sent as
/// `null` are cleared.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct LivestockPatch {
    pub tag_id: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub animal_id: Option<Option<String>>,
    #[serde(rename = "type")]
    pub livestock_type: Option<LivestockType>,
    pub breed: Option<String>,
    pub gender: Option<Gender>,
    pub date_of_birth: Option<NaiveDate>,
    pub weight: Option<f64>,
    pub status: Option<LivestockStatus>,
    pub location: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub photo_url: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub notes: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub purchase_date: Option<Option<NaiveDate>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub purchase_price: Option<Option<f64>>,
}

impl LivestockPatch {
    fn validate(&self) -> StoreResult<()> {
        if let Some(tag_id) = &self.tag_id {
            if tag_id.trim().is_empty() {
                return Err(StoreError::invalid("tag_id", "must not be empty"));
            }
        }
        if let Some(weight) = self.weight {
            validate_weight(weight)?;
        }
        if self.status == Some(LivestockStatus::Sold) {
            return Err(StoreError::invalid(
                "status",
                "sold is set by checkout, not by editing the record",
            ));
        }
        Ok(())
    }

    fn apply(self, model: &mut livestock::ActiveModel) {
        if let Some(tag_id) = self.tag_id {
            model.tag_id = Set(tag_id);
        }
        if let Some(animal_id) = self.animal_id {
            model.animal_id = Set(animal_id);
        }
        if let Some(kind) = self.livestock_type {
            model.livestock_type = Set(kind);
        }
        if let Some(breed) = self.breed {
            model.breed = Set(breed);
        }
        if let Some(gender) = self.gender {
            model.gender = Set(gender);
        }
        if let Some(dob) = self.date_of_birth {
            model.date_of_birth = Set(dob);
        }
        if let Some(weight) = self.weight {
            model.weight = Set(weight);
        }
        if let Some(status) = self.status {
            model.status = Set(status);
        }
        if let Some(location) = self.location {
            model.location = Set(location);
        }
        if let Some(url) = self.photo_url {
            model.photo_url = Set(url);
        }
        if let Some(notes) = self.notes {
            model.notes = Set(notes);
        }
        if let Some(date) = self.purchase_date {
            model.purchase_date = Set(date);
        }
        if let Some(price) = self.purchase_price {
            model.purchase_price = Set(price);
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct LivestockFilter {
    pub status: Option<LivestockStatus>,
    #[serde(rename = "type")]
    pub livestock_type: Option<LivestockType>,
    pub location: Option<String>,
}

fn validate_weight(weight: f64) -> StoreResult<()> {
    if !weight.is_finite() || weight < 0.0 {
        return Err(StoreError::invalid(
            "weight",
            format!("{weight} is not a non-negative number"),
        ));
    }
    Ok(())
}

/// Next sequential display code for `prefix`, e.g. `CTL-004` after `CTL-003`.
/// Codes with other prefixes or a non-numeric suffix are ignored. Fails once
/// an existing code sits at the top of the `u32` range.
pub fn next_animal_code<'a>(
    prefix: &str,
    existing: impl IntoIterator<Item = &'a str>,
) -> StoreResult<String> {
    let highest = existing
        .into_iter()
        .filter_map(|code| code.strip_prefix(prefix)?.strip_prefix('-')?.parse::<u32>().ok())
        .max()
        .unwrap_or(0);
    let next = highest.checked_add(1).ok_or_else(|| {
        StoreError::invalid(
            "animal_id",
            format!("no {prefix} code left after {prefix}-{highest}; supply one explicitly"),
        )
    })?;
    Ok(format!("{prefix}-{next:03}"))
}

impl FarmStore {
    pub async fn create_livestock(&self, new: NewLivestock) -> StoreResult<livestock::Model> {
        if new.tag_id.trim().is_empty() {
            return Err(StoreError::invalid("tag_id", "must not be empty"));
        }
        validate_weight(new.weight)?;

        let animal_id = match new.animal_id {
            Some(code) => code,
            None => {
                let prefix = new.livestock_type.code_prefix();
                let codes = self.animal_codes(prefix).await?;
                next_animal_code(prefix, codes.iter().map(String::as_str))?
            }
        };

        let now = now();
        let model = livestock::ActiveModel {
            tag_id: Set(new.tag_id),
            animal_id: Set(Some(animal_id)),
            livestock_type: Set(new.livestock_type),
            breed: Set(new.breed),
            gender: Set(new.gender),
            date_of_birth: Set(new.date_of_birth),
            weight: Set(new.weight),
            status: Set(new.status.unwrap_or(LivestockStatus::Healthy)),
            location: Set(new.location),
            photo_url: Set(new.photo_url),
            notes: Set(new.notes),
            purchase_date: Set(new.purchase_date),
            purchase_price: Set(new.purchase_price),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let created = self.call("create_livestock", model.insert(self.connection())).await?;
        tracing::info!(livestock_id = created.id, tag_id = %created.tag_id, "livestock created");
        Ok(created)
    }

    /// Merge-patch: only the supplied fields change; `updated_at` always moves.
    pub async fn update_livestock(
        &self,
        id: i32,
        patch: LivestockPatch,
    ) -> StoreResult<livestock::Model> {
        patch.validate()?;
        let current = self.get::<Livestock>(id).await?;
        let mut model = current.into_active_model();
        patch.apply(&mut model);
        model.updated_at = Set(now());
        self.call("update_livestock", model.update(self.connection())).await
    }

    /// Unchecked status write. The only way to reach `Sold`.
    pub async fn set_livestock_status(
        &self,
        id: i32,
        status: LivestockStatus,
    ) -> StoreResult<livestock::Model> {
        let current = self.get::<Livestock>(id).await?;
        let mut model = current.into_active_model();
        model.status = Set(status);
        model.updated_at = Set(now());
        self.call("set_livestock_status", model.update(self.connection())).await
    }

    pub async fn list_livestock(
        &self,
        filter: &LivestockFilter,
    ) -> StoreResult<Vec<livestock::Model>> {
        let mut condition = Condition::all();
        if let Some(status) = filter.status {
            condition = condition.add(livestock::Column::Status.eq(status));
        }
        if let Some(kind) = filter.livestock_type {
            condition = condition.add(livestock::Column::LivestockType.eq(kind));
        }
        if let Some(location) = &filter.location {
            condition = condition.add(livestock::Column::Location.eq(location.as_str()));
        }
        self.call(
            "list_livestock",
            Livestock::find()
                .filter(condition)
                .order_by_asc(livestock::Column::Id)
                .all(self.connection()),
        )
        .await
    }

    async fn animal_codes(&self, prefix: &str) -> StoreResult<Vec<String>> {
        let rows = self
            .call(
                "animal_codes",
                Livestock::find()
                    .filter(livestock::Column::AnimalId.starts_with(format!("{prefix}-")))
                    .all(self.connection()),
            )
            .await?;
        Ok(rows.into_iter().filter_map(|row| row.animal_id).collect())
    }

    /// Assigns display codes to records created before codes existed.
    /// Returns how many records were updated.
    pub async fn backfill_animal_codes(&self) -> StoreResult<usize> {
        let herd = self
            .call(
                "backfill_animal_codes",
                Livestock::find()
                    .order_by_asc(livestock::Column::Id)
                    .all(self.connection()),
            )
            .await?;

        let mut codes: HashMap<&'static str, Vec<String>> = HashMap::new();
        for animal in &herd {
            if let Some(code) = &animal.animal_id {
                codes
                    .entry(animal.livestock_type.code_prefix())
                    .or_default()
                    .push(code.clone());
            }
        }

        let mut updated = 0;
        for animal in herd.into_iter().filter(|a| a.animal_id.is_none()) {
            let prefix = animal.livestock_type.code_prefix();
            let taken = codes.entry(prefix).or_default();
            let code = next_animal_code(prefix, taken.iter().map(String::as_str))?;
            taken.push(code.clone());

            let mut model = animal.into_active_model();
            model.animal_id = Set(Some(code));
            model.updated_at = Set(now());
            self.call("backfill_animal_codes", model.update(self.connection())).await?;
            updated += 1;
        }

        tracing::info!(updated, "animal codes backfilled");
        Ok(updated)
    }
}
