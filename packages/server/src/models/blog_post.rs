use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

pub use super::shared::SeoFields;
use super::shared::{double_option, string_list, validate_required_text, validate_slug};

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateBlogPostRequest {
    pub slug: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub image: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub author: Option<String>,
    /// Free-form descriptive label, distinct from `tags`.
    pub tag: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub order: i32,
    /// Defaults to creation time.
    pub published_at: Option<DateTime<Utc>>,
    /// Estimated from the content when omitted.
    pub read_time: Option<String>,
    #[serde(default)]
    pub seo: SeoFields,
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateBlogPostRequest {
    /// Changing the slug re-checks uniqueness against the new value.
    pub slug: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub author: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub tag: Option<Option<String>>,
    pub featured: Option<bool>,
    pub order: Option<i32>,
    pub published_at: Option<DateTime<Utc>>,
    pub read_time: Option<String>,
    pub seo: Option<SeoFields>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct BlogPostMetadata {
    pub views: i64,
    pub read_time: Option<String>,
    pub tag: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct BlogPostResponse {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub image: String,
    pub content: String,
    pub tags: Vec<String>,
    pub author: Option<String>,
    pub featured: bool,
    pub order: i32,
    pub metadata: BlogPostMetadata,
    pub seo: SeoFields,
    pub published_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<crate::entity::blog_post::Model> for BlogPostResponse {
    fn from(m: crate::entity::blog_post::Model) -> Self {
        Self {
            id: m.id,
            slug: m.slug,
            title: m.title,
            description: m.description,
            image: m.image,
            content: m.content,
            tags: string_list(&m.tags),
            author: m.author,
            featured: m.featured,
            order: m.display_order,
            metadata: BlogPostMetadata {
                views: m.views,
                read_time: m.read_time,
                tag: m.tag,
            },
            seo: SeoFields {
                meta_title: m.meta_title,
                meta_description: m.meta_description,
                og_image: m.og_image,
            },
            published_at: m.published_at,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

pub fn validate_create_blog_post(req: &CreateBlogPostRequest) -> Result<(), AppError> {
    validate_slug(&req.slug)?;
    validate_required_text("Title", &req.title, 512)?;
    validate_required_text("Description", &req.description, 4096)?;
    validate_required_text("Content", &req.content, 1_000_000)?;
    Ok(())
}

pub fn validate_update_blog_post(req: &UpdateBlogPostRequest) -> Result<(), AppError> {
    if let Some(ref slug) = req.slug {
        validate_slug(slug)?;
    }
    if let Some(ref title) = req.title {
        validate_required_text("Title", title, 512)?;
    }
    if let Some(ref description) = req.description {
        validate_required_text("Description", description, 4096)?;
    }
    if let Some(ref content) = req.content {
        validate_required_text("Content", content, 1_000_000)?;
    }
    Ok(())
}
