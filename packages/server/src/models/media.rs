use chrono::{DateTime, Utc};
use common::RenderVariants;
use serde::{Deserialize, Serialize};

use crate::entity::media_asset;

/// Response DTO for an uploaded or indexed asset.
#[derive(Serialize, utoipa::ToSchema)]
pub struct AssetResponse {
    /// Host-assigned identifier, `{folder}/{random name}`.
    #[schema(example = "vitrine/gallery/0193f7a2c4e8")]
    pub public_id: String,
    pub url: String,
    pub width: i32,
    pub height: i32,
    #[schema(example = "png")]
    pub format: String,
    /// Size in bytes.
    pub size: i64,
    pub created_at: DateTime<Utc>,
}

/// Gallery entry with derived presentation-size URLs.
#[derive(Serialize, utoipa::ToSchema)]
pub struct GalleryAssetResponse {
    pub id: String,
    pub url: String,
    pub thumbnail: String,
    pub medium: String,
    pub large: String,
    pub width: i32,
    pub height: i32,
    pub format: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct GalleryListResponse {
    pub data: Vec<GalleryAssetResponse>,
    pub total: u64,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct DeleteAssetResponse {
    /// `false` when no asset existed under the public id.
    pub deleted: bool,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct GalleryQuery {
    /// Folder to list, under the configured root. Default "gallery".
    pub folder: Option<String>,
    /// Maximum number of assets returned. Default 500.
    pub max: Option<u64>,
}

impl From<media_asset::Model> for AssetResponse {
    fn from(m: media_asset::Model) -> Self {
        Self {
            public_id: m.public_id,
            url: m.url,
            width: m.width,
            height: m.height,
            format: m.format,
            size: m.size,
            created_at: m.created_at,
        }
    }
}

impl From<media_asset::Model> for GalleryAssetResponse {
    fn from(m: media_asset::Model) -> Self {
        let variants = RenderVariants::for_url(&m.url);
        Self {
            id: m.public_id,
            url: m.url,
            thumbnail: variants.thumbnail,
            medium: variants.medium,
            large: variants.large,
            width: m.width,
            height: m.height,
            format: m.format,
            created_at: m.created_at,
        }
    }
}
