use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::media::AssetResponse;

/// Partially filled record produced by markdown ingestion.
///
/// Carries whatever the operator form already had plus fields recovered
/// from frontmatter; the operator submits it through the regular
/// create/update endpoints afterwards.
#[derive(Serialize, Deserialize, Default, Clone, utoipa::ToSchema)]
pub struct IngestDraft {
    pub slug: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub content: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub author: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub og_image: Option<String>,
}

impl IngestDraft {
    pub fn has(field: &Option<String>) -> bool {
        field.as_deref().is_some_and(|s| !s.trim().is_empty())
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct IngestResponse {
    /// Draft with rewritten content and frontmatter merged in.
    pub record: IngestDraft,
    /// Assets uploaded for the document's local image references.
    pub uploaded: Vec<AssetResponse>,
}
