use std::sync::Arc;

use common::MediaBackend;
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::error::AppError;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    /// `None` when no media backend is configured.
    pub media: Option<Arc<dyn MediaBackend>>,
    pub config: AppConfig,
}

impl AppState {
    /// The media backend, or `NotConfigured` for handlers that need one.
    pub fn media(&self) -> Result<&Arc<dyn MediaBackend>, AppError> {
        self.media.as_ref().ok_or(AppError::NotConfigured)
    }
}
