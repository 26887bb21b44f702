use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use super::error::MediaError;
use super::traits::MediaBackend;

/// Filesystem-backed media store for development and tests.
///
/// Objects live at `{root}/{key}` and are served at
/// `{public_base_url}/{key}` by whatever static file server fronts the
/// directory. Writes go through a temp file and a rename so a crashed
/// upload never leaves a half-written object at its final key.
pub struct FilesystemMediaBackend {
    root: PathBuf,
    public_base_url: String,
}

impl FilesystemMediaBackend {
    pub async fn new(root: PathBuf, public_base_url: &str) -> Result<Self, MediaError> {
        fs::create_dir_all(&root).await?;
        fs::create_dir_all(root.join(".tmp")).await?;
        Ok(Self {
            root,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn object_path(&self, key: &str) -> Result<PathBuf, MediaError> {
        // Keys are service-generated, but refuse traversal outright.
        if key.is_empty()
            || Path::new(key)
                .components()
                .any(|c| !matches!(c, std::path::Component::Normal(_)))
        {
            return Err(MediaError::Remote(format!("invalid object key: {key}")));
        }
        Ok(self.root.join(key))
    }

    fn temp_path(&self) -> PathBuf {
        self.root.join(".tmp").join(uuid::Uuid::new_v4().to_string())
    }
}

#[async_trait]
impl MediaBackend for FilesystemMediaBackend {
    async fn put(&self, key: &str, data: &[u8], _content_type: &str) -> Result<String, MediaError> {
        let path = self.object_path(key)?;

        let temp = self.temp_path();
        if let Err(e) = fs::write(&temp, data).await {
            let _ = fs::remove_file(&temp).await;
            return Err(e.into());
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        if let Err(e) = fs::rename(&temp, &path).await {
            let _ = fs::remove_file(&temp).await;
            return Err(e.into());
        }

        Ok(self.url_for(key))
    }

    async fn delete(&self, key: &str) -> Result<bool, MediaError> {
        let path = self.object_path(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn url_for(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url, key)
    }
}
