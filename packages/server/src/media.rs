use std::sync::Arc;

use common::media::filesystem::FilesystemMediaBackend;
use common::media::s3::S3MediaBackend;
use common::{ContentHash, MediaBackend};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::MediaConfig;
use crate::entity::media_asset;
use crate::error::AppError;

/// Construct the configured media backend, or `None` when media
/// storage is disabled or credentials are missing. Missing credentials
/// degrade to "not configured" (reported per-request) instead of
/// refusing to start.
pub async fn build_backend(cfg: &MediaConfig) -> anyhow::Result<Option<Arc<dyn MediaBackend>>> {
    match cfg.backend.as_str() {
        "none" | "" => Ok(None),
        "filesystem" => {
            let Some(ref root) = cfg.filesystem_root else {
                warn!("media.backend is 'filesystem' but media.filesystem_root is unset");
                return Ok(None);
            };
            let backend =
                FilesystemMediaBackend::new(root.into(), &cfg.public_base_url).await?;
            Ok(Some(Arc::new(backend)))
        }
        "s3" => {
            let (Some(bucket), Some(region), Some(access_key), Some(secret_key)) = (
                cfg.bucket.as_deref(),
                cfg.region.as_deref(),
                cfg.access_key.as_deref(),
                cfg.secret_key.as_deref(),
            ) else {
                warn!("media.backend is 's3' but bucket/region/credentials are incomplete");
                return Ok(None);
            };
            let backend = S3MediaBackend::new(
                bucket,
                region,
                cfg.endpoint.as_deref(),
                access_key,
                secret_key,
                &cfg.public_base_url,
            )?;
            Ok(Some(Arc::new(backend)))
        }
        other => anyhow::bail!("unknown media backend '{other}'"),
    }
}

/// Validate, dedup, and store one image under `folder`.
///
/// Identical bytes already stored in the folder resolve to the existing
/// asset without touching the media host. New assets are stored under a
/// random name (never the client filename) and indexed by content hash;
/// if a concurrent upload of the same bytes wins the index race, its
/// row is returned.
pub async fn store_image(
    db: &DatabaseConnection,
    backend: &Arc<dyn MediaBackend>,
    bytes: &[u8],
    declared_type: &str,
    folder: &str,
    max_size: u64,
) -> Result<media_asset::Model, AppError> {
    if !declared_type.starts_with("image/") {
        return Err(AppError::InvalidType(format!(
            "Only image uploads are allowed, got '{declared_type}'"
        )));
    }
    if bytes.len() as u64 > max_size {
        return Err(AppError::TooLarge {
            actual: bytes.len() as u64,
            limit: max_size,
        });
    }

    let hash = ContentHash::compute(bytes);

    if let Some(existing) = find_by_hash(db, folder, &hash).await? {
        debug!(folder, hash = %hash, "reusing already-uploaded asset");
        return Ok(existing);
    }

    let (width, height, format) = probe_image(bytes)?;
    let ext = format.extensions_str().first().copied().unwrap_or("img");

    let public_id = format!("{folder}/{}", Uuid::new_v4().simple());
    let key = format!("{public_id}.{ext}");
    let url = backend.put(&key, bytes, format.to_mime_type()).await?;

    let now = chrono::Utc::now();
    let row = media_asset::ActiveModel {
        public_id: Set(public_id.clone()),
        folder: Set(folder.to_string()),
        content_hash: Set(hash.to_hex()),
        url: Set(url),
        width: Set(width as i32),
        height: Set(height as i32),
        format: Set(ext.to_string()),
        size: Set(bytes.len() as i64),
        created_at: Set(now),
    };

    let insert = media_asset::Entity::insert(row)
        .on_conflict(
            OnConflict::columns([media_asset::Column::Folder, media_asset::Column::ContentHash])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await;
    match insert {
        Ok(_) | Err(DbErr::RecordNotInserted) => {}
        Err(e) => return Err(e.into()),
    }

    find_by_hash(db, folder, &hash)
        .await?
        .ok_or_else(|| AppError::Internal("media_asset missing after upsert".into()))
}

/// Remove an asset by its public id. `Ok(false)` when nothing is
/// indexed under the id; callers treating removal as a side effect must
/// not surface that to the user.
pub async fn remove_asset(
    db: &DatabaseConnection,
    backend: &Arc<dyn MediaBackend>,
    public_id: &str,
) -> Result<bool, AppError> {
    let Some(asset) = media_asset::Entity::find_by_id(public_id).one(db).await? else {
        return Ok(false);
    };
    remove_indexed_asset(db, backend, asset).await?;
    Ok(true)
}

/// Remove an asset located by its public URL (used by record deletion,
/// which only knows the URLs a record referenced). URLs that were never
/// indexed are skipped.
pub async fn remove_asset_by_url(
    db: &DatabaseConnection,
    backend: &Arc<dyn MediaBackend>,
    url: &str,
) -> Result<bool, AppError> {
    let Some(asset) = media_asset::Entity::find()
        .filter(media_asset::Column::Url.eq(url))
        .one(db)
        .await?
    else {
        return Ok(false);
    };
    remove_indexed_asset(db, backend, asset).await?;
    Ok(true)
}

/// Assets under `folder`, newest first.
pub async fn list_folder(
    db: &DatabaseConnection,
    folder: &str,
    max: u64,
) -> Result<Vec<media_asset::Model>, AppError> {
    let assets = media_asset::Entity::find()
        .filter(media_asset::Column::Folder.eq(folder))
        .order_by_desc(media_asset::Column::CreatedAt)
        .limit(max)
        .all(db)
        .await?;
    Ok(assets)
}

/// Detached cleanup of every image URL a deleted record referenced.
///
/// Runs after the delete response is sent; failures are logged and
/// never reach the caller.
pub fn spawn_record_cleanup(
    db: DatabaseConnection,
    backend: Option<Arc<dyn MediaBackend>>,
    urls: Vec<String>,
) {
    let Some(backend) = backend else {
        return;
    };
    let urls: Vec<String> = urls.into_iter().filter(|u| !u.trim().is_empty()).collect();
    if urls.is_empty() {
        return;
    }

    tokio::spawn(async move {
        for url in urls {
            match remove_asset_by_url(&db, &backend, &url).await {
                Ok(true) => debug!(%url, "cleaned up orphaned asset"),
                Ok(false) => debug!(%url, "no indexed asset for URL, skipping"),
                Err(error) => warn!(%url, ?error, "orphaned asset cleanup failed"),
            }
        }
    });
}

async fn find_by_hash(
    db: &DatabaseConnection,
    folder: &str,
    hash: &ContentHash,
) -> Result<Option<media_asset::Model>, AppError> {
    let existing = media_asset::Entity::find()
        .filter(media_asset::Column::Folder.eq(folder))
        .filter(media_asset::Column::ContentHash.eq(hash.to_hex()))
        .one(db)
        .await?;
    Ok(existing)
}

async fn remove_indexed_asset(
    db: &DatabaseConnection,
    backend: &Arc<dyn MediaBackend>,
    asset: media_asset::Model,
) -> Result<(), AppError> {
    let key = format!("{}.{}", asset.public_id, asset.format);
    if !backend.delete(&key).await? {
        debug!(public_id = %asset.public_id, "object already gone from media host");
    }
    media_asset::Entity::delete_by_id(asset.public_id)
        .exec(db)
        .await?;
    Ok(())
}

fn probe_image(bytes: &[u8]) -> Result<(u32, u32, image::ImageFormat), AppError> {
    let reader = image::ImageReader::new(std::io::Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| AppError::InvalidType(format!("Unreadable image data: {e}")))?;
    let format = reader
        .format()
        .ok_or_else(|| AppError::InvalidType("Unrecognized image format".into()))?;
    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| AppError::InvalidType(format!("Image decode failed: {e}")))?;
    Ok((width, height, format))
}
