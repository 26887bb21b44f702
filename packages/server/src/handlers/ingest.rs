use std::collections::HashMap;

use axum::Json;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::ingest::frontmatter::split_frontmatter;
use crate::ingest::merge_frontmatter;
use crate::ingest::normalize::normalize_markdown;
use crate::ingest::rewrite::{reference_keys, rewrite_image_refs};
use crate::media;
use crate::models::ingest::{IngestDraft, IngestResponse};
use crate::models::media::AssetResponse;
use crate::models::shared::validate_slug;
use crate::state::AppState;

/// Body limit for markdown ingestion: the document plus several images.
pub fn ingest_body_limit() -> DefaultBodyLimit {
    DefaultBodyLimit::max(64 * 1024 * 1024)
}

/// Which record collection an ingested document targets; selects the
/// upload folder namespace.
#[derive(Clone, Copy, Debug)]
pub enum RecordKind {
    Project,
    BlogPost,
}

impl RecordKind {
    fn subfolder(self) -> &'static str {
        match self {
            RecordKind::Project => "projects",
            RecordKind::BlogPost => "posts",
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/projects/ingest",
    tag = "Ingest",
    operation_id = "ingestProjectMarkdown",
    summary = "Ingest a markdown document for a project",
    description = "Multipart: a `document` markdown file, repeated `images` file fields, and an \
        optional `record` JSON field with the operator's current draft. Local image references \
        are uploaded and rewritten to hosted URLs; frontmatter fills empty draft fields.",
    request_body(content_type = "multipart/form-data", description = "Markdown document, images, draft record"),
    responses(
        (status = 200, description = "Merged draft and uploaded assets", body = IngestResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 500, description = "Media host unavailable (NOT_CONFIGURED, REMOTE_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, multipart))]
pub async fn ingest_project(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<IngestResponse>, AppError> {
    run_ingest(state, RecordKind::Project, multipart).await
}

#[utoipa::path(
    post,
    path = "/api/v1/posts/ingest",
    tag = "Ingest",
    operation_id = "ingestBlogPostMarkdown",
    summary = "Ingest a markdown document for a blog post",
    description = "Multipart: a `document` markdown file, repeated `images` file fields, and an \
        optional `record` JSON field with the operator's current draft. Local image references \
        are uploaded and rewritten to hosted URLs; frontmatter fills empty draft fields.",
    request_body(content_type = "multipart/form-data", description = "Markdown document, images, draft record"),
    responses(
        (status = 200, description = "Merged draft and uploaded assets", body = IngestResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 500, description = "Media host unavailable (NOT_CONFIGURED, REMOTE_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, multipart))]
pub async fn ingest_blog_post(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<IngestResponse>, AppError> {
    run_ingest(state, RecordKind::BlogPost, multipart).await
}

async fn run_ingest(
    state: AppState,
    kind: RecordKind,
    mut multipart: Multipart,
) -> Result<Json<IngestResponse>, AppError> {
    let mut document: Option<String> = None;
    let mut images: Vec<(String, String, Vec<u8>)> = Vec::new();
    let mut draft = IngestDraft::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        match field.name() {
            Some("document") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read document: {e}")))?;
                let text = String::from_utf8(bytes.to_vec())
                    .map_err(|_| AppError::Validation("Document is not valid UTF-8".into()))?;
                document = Some(text);
            }
            Some("images") => {
                let filename = field
                    .file_name()
                    .ok_or_else(|| {
                        AppError::Validation("Each image field must carry a filename".into())
                    })?
                    .to_string();
                let declared_type = field
                    .content_type()
                    .map(str::to_string)
                    .or_else(|| {
                        mime_guess::from_path(&filename)
                            .first()
                            .map(|m| m.to_string())
                    })
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let bytes = field.bytes().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read image '{filename}': {e}"))
                })?;
                images.push((filename, declared_type, bytes.to_vec()));
            }
            Some("record") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read record: {e}")))?;
                draft = serde_json::from_str(&text)
                    .map_err(|e| AppError::Validation(format!("Invalid record JSON: {e}")))?;
            }
            _ => {} // Ignore unknown fields.
        }
    }

    let document =
        document.ok_or_else(|| AppError::Validation("Missing 'document' field".into()))?;

    let (meta, body) = split_frontmatter(&document);
    merge_frontmatter(&mut draft, &meta);

    let slug = draft
        .slug
        .clone()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| {
            AppError::Validation(
                "A slug is required (in the draft or frontmatter) before ingestion".into(),
            )
        })?;
    validate_slug(&slug)?;

    // Upload referenced images and build the reference lookup table.
    // Duplicate filenames overwrite earlier entries: last upload wins.
    let mut lookup: HashMap<String, String> = HashMap::new();
    let mut uploaded = Vec::new();
    if !images.is_empty() {
        let backend = state.media()?.clone();
        let folder = format!(
            "{}/{}/{}",
            state.config.media.root_folder,
            kind.subfolder(),
            slug
        );
        for (filename, declared_type, bytes) in images {
            let asset = media::store_image(
                &state.db,
                &backend,
                &bytes,
                &declared_type,
                &folder,
                state.config.media.max_upload_size,
            )
            .await?;
            for key in reference_keys(&filename) {
                lookup.insert(key, asset.url.clone());
            }
            uploaded.push(AssetResponse::from(asset));
        }
    }

    let rewritten = rewrite_image_refs(body, &lookup);
    let content = normalize_markdown(&rewritten);

    draft.slug = Some(slug);
    draft.content = Some(content);

    Ok(Json(IngestResponse {
        record: draft,
        uploaded,
    }))
}
