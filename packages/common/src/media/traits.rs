use async_trait::async_trait;

use super::error::MediaError;

/// Raw object storage behind the media host.
///
/// Implementations store bytes under caller-chosen keys and serve them
/// at stable public URLs. Validation, hashing, and dedup live above
/// this trait; backends only move bytes.
#[async_trait]
pub trait MediaBackend: Send + Sync {
    /// Store `data` under `key` and return the public URL.
    ///
    /// Overwrites any existing object at the same key.
    async fn put(&self, key: &str, data: &[u8], content_type: &str) -> Result<String, MediaError>;

    /// Remove the object at `key`.
    ///
    /// Returns `true` if an object was removed, `false` if none existed.
    async fn delete(&self, key: &str) -> Result<bool, MediaError>;

    /// Public URL at which the object under `key` is served.
    fn url_for(&self, key: &str) -> String;
}
