use serde::{Deserialize, Deserializer, Serialize};

use crate::error::AppError;

/// SEO override fields, nested under `seo` in record payloads.
#[derive(Serialize, Deserialize, Clone, Default, PartialEq, utoipa::ToSchema)]
pub struct SeoFields {
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub og_image: Option<String>,
}

/// Query parameters shared by both record list endpoints.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct ListRecordsQuery {
    /// Keep only records with this `featured` value.
    pub featured: Option<bool>,
    /// Keep only records carrying this tag.
    pub tag: Option<String>,
    /// Truncate after sorting.
    pub limit: Option<u64>,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct GetRecordQuery {
    /// Schedule a detached view-count increment on a hit. Default true.
    pub increment_views: Option<bool>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct FeaturedResponse {
    pub featured: bool,
}

/// Serde helper for PATCH semantics on nullable fields.
///
/// * JSON field absent  => `None`          (don't update)
/// * JSON field = null  => `Some(None)`    (set to NULL)
/// * JSON field = value => `Some(Some(v))` (set to value)
pub fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Some(Option::deserialize(deserializer)?))
}

/// Validate a trimmed slug: 1-256 characters, no whitespace, no '/'.
pub fn validate_slug(slug: &str) -> Result<(), AppError> {
    let slug = slug.trim();
    if slug.is_empty() || slug.chars().count() > 256 {
        return Err(AppError::Validation("Slug must be 1-256 characters".into()));
    }
    if slug.chars().any(|c| c.is_whitespace() || c == '/') {
        return Err(AppError::Validation(
            "Slug must not contain whitespace or '/'".into(),
        ));
    }
    Ok(())
}

/// Validate a required text field (non-empty when trimmed, bounded).
pub fn validate_required_text(name: &str, value: &str, max: usize) -> Result<(), AppError> {
    if value.trim().is_empty() || value.len() > max {
        return Err(AppError::Validation(format!(
            "{name} must be non-empty and at most {max} bytes"
        )));
    }
    Ok(())
}

/// Read a JSON array column as a string list, dropping non-strings.
pub fn string_list(value: &serde_json::Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

pub fn to_json_list(items: &[String]) -> serde_json::Value {
    serde_json::Value::Array(
        items
            .iter()
            .map(|s| serde_json::Value::String(s.clone()))
            .collect(),
    )
}

/// Reading-time estimate from word count, at 200 words per minute.
pub fn estimate_read_time(content: &str) -> String {
    let words = content.split_whitespace().count();
    let minutes = words.div_ceil(200).max(1);
    format!("{minutes} min read")
}
