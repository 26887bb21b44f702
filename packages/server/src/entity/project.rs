use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "project")]
pub struct Model {
    /// UUIDv7 primary key, assigned at creation; the stable internal id.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// URL path segment; unique per table (index created at startup).
    pub slug: String,

    pub title: String,
    pub description: String,

    /// Primary display image URL. Empty until the first upload.
    pub image: String,
    /// Ordered gallery image URLs (JSON array of strings).
    pub images: Json,
    /// External demo URL.
    pub link: String,
    /// Ordered contributor avatar URLs (JSON array of strings).
    pub avatars: Json,

    pub content: String, // in Markdown
    pub tags: Json,      // JSON array of strings, display order

    pub featured: bool,
    /// Primary sort key, ascending; `published_at` desc breaks ties.
    pub display_order: i32,

    pub views: i64,
    pub likes: i64,
    pub read_time: Option<String>,

    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub og_image: Option<String>,

    pub published_at: DateTimeUtc,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
