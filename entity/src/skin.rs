use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A marketplace item, one row of the `skins` table.
///
/// ```sql
/// CREATE TABLE skins (
///     id          SERIAL PRIMARY KEY,
///     name        TEXT NOT NULL,
///     weapon      TEXT NOT NULL,
///     rarity      TEXT NOT NULL,
///     price       DOUBLE PRECISION NOT NULL,
///     image_url   TEXT,
///     created_at  TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP,
///     updated_at  TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP
/// );
/// ```
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "skins")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub weapon: String,
    /// Free text, no enumeration is enforced.
    pub rarity: String,
    pub price: f64,
    pub image_url: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
