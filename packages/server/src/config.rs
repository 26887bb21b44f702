use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

/// Media host configuration.
///
/// `backend` selects the implementation: `"s3"` for an S3-compatible
/// host, `"filesystem"` for a local directory, `"none"` to run without
/// media storage (media endpoints then answer `NOT_CONFIGURED`).
#[derive(Debug, Deserialize, Clone)]
pub struct MediaConfig {
    pub backend: String,
    /// Base URL at which stored objects are publicly served.
    pub public_base_url: String,
    /// Top-level folder prefix for all uploads.
    pub root_folder: String,
    /// Upload size ceiling in bytes.
    pub max_upload_size: u64,

    // s3 backend
    pub bucket: Option<String>,
    pub region: Option<String>,
    pub endpoint: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,

    // filesystem backend
    pub filesystem_root: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub media: MediaConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("media.backend", "none")?
            .set_default("media.public_base_url", "http://localhost:3000/media")?
            .set_default("media.root_folder", "vitrine")?
            .set_default("media.max_upload_size", 10 * 1024 * 1024)?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., VITRINE__DATABASE__URL)
            .add_source(Environment::with_prefix("VITRINE").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
