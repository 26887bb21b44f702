pub mod frontmatter;
pub mod normalize;
pub mod rewrite;

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};

use crate::models::ingest::IngestDraft;

/// Merge extracted frontmatter into a draft record.
///
/// Frontmatter only fills fields the operator left empty; it never
/// clobbers values already present in the draft.
pub fn merge_frontmatter(draft: &mut IngestDraft, meta: &HashMap<String, String>) {
    let fill = |dst: &mut Option<String>, key: &str| {
        if !IngestDraft::has(dst)
            && let Some(value) = non_empty(meta, key)
        {
            *dst = Some(value);
        }
    };

    fill(&mut draft.slug, "slug");
    fill(&mut draft.title, "title");
    fill(&mut draft.image, "image");
    fill(&mut draft.author, "author");
    fill(&mut draft.meta_title, "metaTitle");
    fill(&mut draft.meta_description, "metaDescription");
    fill(&mut draft.og_image, "ogImage");

    if !IngestDraft::has(&draft.description) {
        draft.description = non_empty(meta, "description").or_else(|| non_empty(meta, "summary"));
    }

    if draft.tags.is_empty() {
        if let Some(tags) = non_empty(meta, "tags") {
            draft.tags = tags
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect();
        } else if let Some(tag) = non_empty(meta, "tag") {
            draft.tags = vec![tag];
        }
    }

    if draft.published_at.is_none()
        && let Some(raw) = non_empty(meta, "publishedAt")
    {
        draft.published_at = parse_date(&raw);
    }
}

fn non_empty(meta: &HashMap<String, String>, key: &str) -> Option<String> {
    meta.get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Accept RFC 3339 or a bare `YYYY-MM-DD` date.
fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
