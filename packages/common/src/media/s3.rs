use async_trait::async_trait;
use s3::creds::Credentials;
use s3::{Bucket, Region};

use super::error::MediaError;
use super::traits::MediaBackend;

/// S3-compatible media store (AWS S3, MinIO, R2, ...).
///
/// Objects are written to a single bucket and served at
/// `{public_base_url}/{key}`, which is expected to point at the bucket
/// (or a CDN in front of it).
pub struct S3MediaBackend {
    bucket: Box<Bucket>,
    public_base_url: String,
}

impl S3MediaBackend {
    pub fn new(
        bucket_name: &str,
        region: &str,
        endpoint: Option<&str>,
        access_key: &str,
        secret_key: &str,
        public_base_url: &str,
    ) -> Result<Self, MediaError> {
        let region = match endpoint {
            Some(endpoint) => Region::Custom {
                region: region.to_string(),
                endpoint: endpoint.trim_end_matches('/').to_string(),
            },
            None => region
                .parse::<Region>()
                .map_err(|e| MediaError::Remote(format!("invalid region '{region}': {e}")))?,
        };

        let credentials = Credentials::new(Some(access_key), Some(secret_key), None, None, None)
            .map_err(|e| MediaError::Remote(format!("bad credentials: {e}")))?;

        let bucket = Bucket::new(bucket_name, region, credentials)
            .map_err(|e| MediaError::Remote(e.to_string()))?
            .with_path_style();

        Ok(Self {
            bucket,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl MediaBackend for S3MediaBackend {
    async fn put(&self, key: &str, data: &[u8], content_type: &str) -> Result<String, MediaError> {
        let response = self
            .bucket
            .put_object_with_content_type(key, data, content_type)
            .await
            .map_err(|e| MediaError::Remote(e.to_string()))?;

        let status = response.status_code();
        if !(200..300).contains(&status) {
            return Err(MediaError::Remote(format!(
                "put of '{key}' returned status {status}"
            )));
        }

        Ok(self.url_for(key))
    }

    async fn delete(&self, key: &str) -> Result<bool, MediaError> {
        // S3 DELETE is 204 whether or not the object existed, so probe
        // first to report the missing/deleted distinction.
        match self.bucket.head_object(key).await {
            Ok((_, status)) if (200..300).contains(&status) => {}
            _ => return Ok(false),
        }

        self.bucket
            .delete_object(key)
            .await
            .map_err(|e| MediaError::Remote(e.to_string()))?;

        Ok(true)
    }

    fn url_for(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url, key)
    }
}
