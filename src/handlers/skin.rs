use chrono::{DateTime, Duration, SubsecRound, Utc};
use entity::{prelude::Skin, skin};
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, NotSet, QueryOrder, Set, TransactionTrait,
};
use serde::{de, Deserialize, Deserializer};
use validator::Validate;

use crate::constants::PLACEHOLDER_IMAGE_URL;
use crate::error::SkinsError;
use crate::messages::Message;

/// The body of a `POST` request.
///
/// Presence of the required fields is checked when converting into [`NewSkin`].
#[derive(Debug, Validate, Deserialize)]
pub(crate) struct NewSkinInput {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub(crate) name: Option<String>,
    #[validate(length(min = 1, message = "weapon must not be empty"))]
    pub(crate) weapon: Option<String>,
    #[validate(length(min = 1, message = "rarity must not be empty"))]
    pub(crate) rarity: Option<String>,
    #[validate(range(min = 0.0, message = "price must not be negative"))]
    pub(crate) price: Option<f64>,
    pub(crate) image_url: Option<String>,
}

/// A skin ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NewSkin {
    pub(crate) name: String,
    pub(crate) weapon: String,
    pub(crate) rarity: String,
    pub(crate) price: f64,
    pub(crate) image_url: String,
}

impl TryFrom<NewSkinInput> for NewSkin {
    type Error = SkinsError;

    fn try_from(input: NewSkinInput) -> Result<Self, Self::Error> {
        match (input.name, input.weapon, input.rarity, input.price) {
            (Some(name), Some(weapon), Some(rarity), Some(price)) => Ok(NewSkin {
                name,
                weapon,
                rarity,
                price,
                image_url: input
                    .image_url
                    .unwrap_or_else(|| PLACEHOLDER_IMAGE_URL.to_owned()),
            }),
            _ => Err(SkinsError::Validation(Message::MissingFields)),
        }
    }
}

/// Distinguishes an explicit `null` (`Some(None)`) from an absent field (`None`).
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdValue {
    Number(i32),
    Text(String),
}

/// Accepts `5` as well as `"5"`. An empty string counts as absent.
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<IdValue>::deserialize(deserializer)? {
        None => Ok(None),
        Some(IdValue::Number(id)) => Ok(Some(id)),
        Some(IdValue::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(IdValue::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid skin id {:?}", text))),
    }
}

/// The body of a `PUT` request. Every field but `id` is optional.
#[derive(Debug, Validate, Deserialize)]
pub(crate) struct UpdateSkinInput {
    #[serde(default, deserialize_with = "lenient_id")]
    pub(crate) id: Option<i32>,
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub(crate) name: Option<String>,
    #[validate(length(min = 1, message = "weapon must not be empty"))]
    pub(crate) weapon: Option<String>,
    #[validate(length(min = 1, message = "rarity must not be empty"))]
    pub(crate) rarity: Option<String>,
    #[validate(range(min = 0.0, message = "price must not be negative"))]
    pub(crate) price: Option<f64>,
    #[serde(default, deserialize_with = "present")]
    pub(crate) image_url: Option<Option<String>>,
}

/// The fields a `PUT` request changes. Anything left `None` keeps its stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct SkinChanges {
    pub(crate) name: Option<String>,
    pub(crate) weapon: Option<String>,
    pub(crate) rarity: Option<String>,
    pub(crate) price: Option<f64>,
    pub(crate) image_url: Option<Option<String>>,
}

impl SkinChanges {
    pub(crate) fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.weapon.is_none()
            && self.rarity.is_none()
            && self.price.is_none()
            && self.image_url.is_none()
    }

    /// Mark the present fields as `Set`, leaving the others untouched.
    pub(crate) fn apply(self, active: &mut skin::ActiveModel) {
        if let Some(name) = self.name {
            active.name = Set(name);
        }
        if let Some(weapon) = self.weapon {
            active.weapon = Set(weapon);
        }
        if let Some(rarity) = self.rarity {
            active.rarity = Set(rarity);
        }
        if let Some(price) = self.price {
            active.price = Set(price);
        }
        if let Some(image_url) = self.image_url {
            active.image_url = Set(image_url);
        }
    }
}

impl UpdateSkinInput {
    /// Split into the target id and the requested changes.
    pub(crate) fn into_parts(self) -> Result<(i32, SkinChanges), SkinsError> {
        let id = self.id.ok_or(SkinsError::Validation(Message::IdRequired))?;
        let changes = SkinChanges {
            name: self.name,
            weapon: self.weapon,
            rarity: self.rarity,
            price: self.price,
            image_url: self.image_url,
        };
        if changes.is_empty() {
            return Err(SkinsError::Validation(Message::NoFieldsToUpdate));
        }
        Ok((id, changes))
    }
}

/// Timestamps are stored with microsecond precision, so truncate before comparing.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// The next `updated_at`, strictly after `previous` even if the clock has not moved on.
pub(crate) fn next_update_time(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

/// Commit the transaction if `result` is ok, roll it back otherwise.
async fn finish<T>(
    txn: DatabaseTransaction,
    result: Result<T, SkinsError>,
) -> Result<T, SkinsError> {
    match result {
        Ok(value) => {
            txn.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = txn.rollback().await {
                tracing::warn!("Rollback failed: {:?}", rollback_err);
            }
            Err(err)
        }
    }
}

/// All skins, newest first.
pub(crate) async fn list_skins<C>(db: &C) -> Result<Vec<skin::Model>, SkinsError>
where
    C: ConnectionTrait,
{
    Ok(Skin::find()
        .order_by_desc(skin::Column::CreatedAt)
        .all(db)
        .await?)
}

pub(crate) async fn get_skin<C>(db: &C, id: i32) -> Result<skin::Model, SkinsError>
where
    C: ConnectionTrait,
{
    Skin::find_by_id(id)
        .one(db)
        .await?
        .ok_or(SkinsError::NotFound(id))
}

pub(crate) async fn create_skin(
    db: &DatabaseConnection,
    new_skin: NewSkin,
) -> Result<skin::Model, SkinsError> {
    let txn = db.begin().await?;

    let created_at = now();
    let result = skin::ActiveModel {
        id: NotSet,
        name: Set(new_skin.name),
        weapon: Set(new_skin.weapon),
        rarity: Set(new_skin.rarity),
        price: Set(new_skin.price),
        image_url: Set(Some(new_skin.image_url)),
        created_at: Set(created_at),
        updated_at: Set(created_at),
    }
    .insert(&txn)
    .await
    .map_err(SkinsError::from);

    finish(txn, result).await
}

async fn apply_update(
    txn: &DatabaseTransaction,
    id: i32,
    changes: SkinChanges,
) -> Result<skin::Model, SkinsError> {
    let current = get_skin(txn, id).await?;
    let updated_at = next_update_time(current.updated_at);

    let mut active: skin::ActiveModel = current.into();
    changes.apply(&mut active);
    active.updated_at = Set(updated_at);

    match active.update(txn).await {
        Ok(model) => Ok(model),
        // the row went away between the read and the write
        Err(DbErr::RecordNotUpdated) => Err(SkinsError::NotFound(id)),
        Err(e) => Err(e.into()),
    }
}

pub(crate) async fn update_skin(
    db: &DatabaseConnection,
    id: i32,
    changes: SkinChanges,
) -> Result<skin::Model, SkinsError> {
    let txn = db.begin().await?;
    let result = apply_update(&txn, id, changes).await;
    finish(txn, result).await
}

/// Delete a skin, returning its id.
pub(crate) async fn delete_skin(db: &DatabaseConnection, id: i32) -> Result<i32, SkinsError> {
    let txn = db.begin().await?;

    let result = match Skin::delete_by_id(id).exec(&txn).await {
        Ok(res) if res.rows_affected == 0 => Err(SkinsError::NotFound(id)),
        Ok(_) => Ok(id),
        Err(e) => Err(e.into()),
    };

    finish(txn, result).await
}
