use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Index of uploaded media, keyed by the host-assigned public id.
///
/// The `(folder, content_hash)` unique index (created at startup) makes
/// this the dedup table: identical bytes uploaded into the same folder
/// resolve to one row and one stored object.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "media_asset")]
pub struct Model {
    /// `{folder}/{random name}`, never derived from the client filename.
    #[sea_orm(primary_key, auto_increment = false)]
    pub public_id: String,

    pub folder: String,

    /// SHA-256 of the stored bytes.
    pub content_hash: String,

    /// Public URL of the stored object.
    pub url: String,

    pub width: i32,
    pub height: i32,
    /// Image format as a short lowercase name ("png", "jpeg", ...).
    pub format: String,
    pub size: i64,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
