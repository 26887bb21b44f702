use axum::Json;
use axum::extract::{DefaultBodyLimit, Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::media;
use crate::models::media::{
    AssetResponse, DeleteAssetResponse, GalleryAssetResponse, GalleryListResponse, GalleryQuery,
};
use crate::state::AppState;

const DEFAULT_GALLERY_FOLDER: &str = "gallery";
const DEFAULT_GALLERY_MAX: u64 = 500;

/// Body limit for image upload routes: one image (10 MiB ceiling) plus
/// multipart overhead.
pub fn upload_body_limit() -> DefaultBodyLimit {
    DefaultBodyLimit::max(16 * 1024 * 1024)
}

#[utoipa::path(
    post,
    path = "/api/v1/media",
    tag = "Media",
    operation_id = "uploadImage",
    summary = "Upload an image",
    description = "Multipart upload with a required `file` field and an optional `folder` field \
        (relative to the configured root). Identical bytes already stored in the folder return \
        the existing asset instead of uploading a duplicate. Stored objects get a random name, \
        never the client filename.",
    request_body(content_type = "multipart/form-data", description = "Image file with optional folder"),
    responses(
        (status = 201, description = "Stored (or deduplicated) asset", body = AssetResponse),
        (status = 400, description = "Not an image or too large (INVALID_TYPE, TOO_LARGE)", body = ErrorBody),
        (status = 500, description = "Media host unavailable (NOT_CONFIGURED, REMOTE_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, multipart))]
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let backend = state.media()?.clone();

    let mut file: Option<(String, Vec<u8>)> = None;
    let mut folder: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        match field.name() {
            Some("file") => {
                let declared_type = field
                    .content_type()
                    .map(str::to_string)
                    .or_else(|| {
                        field
                            .file_name()
                            .and_then(|name| mime_guess::from_path(name).first())
                            .map(|m| m.to_string())
                    })
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read file: {e}")))?;
                file = Some((declared_type, bytes.to_vec()));
            }
            Some("folder") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read folder: {e}")))?;
                folder = Some(text);
            }
            _ => {} // Ignore unknown fields.
        }
    }

    let (declared_type, bytes) =
        file.ok_or_else(|| AppError::Validation("Missing 'file' field".into()))?;
    let folder = resolve_folder(&state.config.media.root_folder, folder.as_deref())?;

    let asset = media::store_image(
        &state.db,
        &backend,
        &bytes,
        &declared_type,
        &folder,
        state.config.media.max_upload_size,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(AssetResponse::from(asset))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/media/{public_id}",
    tag = "Media",
    operation_id = "deleteImage",
    summary = "Delete an image by public id",
    description = "Best-effort: an unknown public id is reported as `deleted: false`, not an \
        error.",
    params(("public_id" = String, Path, description = "Asset public id (contains '/')")),
    responses(
        (status = 200, description = "Deletion outcome", body = DeleteAssetResponse),
        (status = 500, description = "Media host unavailable (NOT_CONFIGURED, REMOTE_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(public_id))]
pub async fn delete_image(
    State(state): State<AppState>,
    Path(public_id): Path<String>,
) -> Result<Json<DeleteAssetResponse>, AppError> {
    let backend = state.media()?.clone();
    let deleted = media::remove_asset(&state.db, &backend, &public_id).await?;
    Ok(Json(DeleteAssetResponse { deleted }))
}

#[utoipa::path(
    get,
    path = "/api/v1/gallery",
    tag = "Gallery",
    operation_id = "listGallery",
    summary = "List gallery assets",
    description = "Assets under a folder (default \"gallery\"), newest first, each with derived \
        thumbnail/medium/large URL variants.",
    params(GalleryQuery),
    responses(
        (status = 200, description = "Gallery assets", body = GalleryListResponse),
        (status = 500, description = "Media host unavailable (NOT_CONFIGURED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_gallery(
    State(state): State<AppState>,
    Query(query): Query<GalleryQuery>,
) -> Result<Json<GalleryListResponse>, AppError> {
    state.media()?;

    let folder = resolve_folder(
        &state.config.media.root_folder,
        Some(query.folder.as_deref().unwrap_or(DEFAULT_GALLERY_FOLDER)),
    )?;
    let max = query.max.unwrap_or(DEFAULT_GALLERY_MAX).clamp(1, 1000);

    let assets = media::list_folder(&state.db, &folder, max).await?;
    let total = assets.len() as u64;
    let data = assets.into_iter().map(GalleryAssetResponse::from).collect();

    Ok(Json(GalleryListResponse { data, total }))
}

/// Namespace a client-supplied folder under the configured root,
/// rejecting traversal and empty segments.
fn resolve_folder(root: &str, provided: Option<&str>) -> Result<String, AppError> {
    let Some(provided) = provided.map(str::trim).filter(|f| !f.is_empty()) else {
        return Ok(root.to_string());
    };

    let valid = provided.split('/').all(|segment| {
        !segment.is_empty()
            && segment != ".."
            && segment
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    }) && !provided.split('/').any(|s| s == ".");
    if !valid {
        return Err(AppError::Validation(format!(
            "Invalid folder '{provided}': use alphanumeric path segments"
        )));
    }

    Ok(format!("{root}/{provided}"))
}
