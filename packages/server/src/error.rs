use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::MediaError;
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`,
    /// `DUPLICATE_SLUG`, `NOT_FOUND`, `NOT_CONFIGURED`, `INVALID_TYPE`,
    /// `TOO_LARGE`, `REMOTE_ERROR`, `INTERNAL_ERROR`.
    #[schema(example = "VALIDATION_ERROR")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "Slug must not be empty")]
    pub message: String,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    /// Another record of the same variant already uses the slug.
    DuplicateSlug(String),
    NotFound(String),
    /// Media host credentials/backend are absent from the configuration.
    NotConfigured,
    /// Upload is not an image.
    InvalidType(String),
    /// Upload exceeds the size ceiling. Contains actual and limit in bytes.
    TooLarge {
        actual: u64,
        limit: u64,
    },
    /// Unclassified failure from the content store or media host.
    Remote(String),
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "VALIDATION_ERROR",
                    message: msg,
                },
            ),
            AppError::DuplicateSlug(slug) => (
                StatusCode::CONFLICT,
                ErrorBody {
                    code: "DUPLICATE_SLUG",
                    message: format!("A record with slug '{slug}' already exists"),
                },
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: "NOT_FOUND",
                    message: msg,
                },
            ),
            AppError::NotConfigured => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    code: "NOT_CONFIGURED",
                    message: "Media storage is not configured".into(),
                },
            ),
            AppError::InvalidType(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "INVALID_TYPE",
                    message: msg,
                },
            ),
            AppError::TooLarge { actual, limit } => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "TOO_LARGE",
                    message: format!("File is {actual} bytes; the limit is {limit} bytes"),
                },
            ),
            AppError::Remote(detail) => {
                tracing::error!("Remote store error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "REMOTE_ERROR",
                        message: "An upstream storage request failed".into(),
                    },
                )
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "INTERNAL_ERROR",
                        message: "An unexpected error occurred".into(),
                    },
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<MediaError> for AppError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::NotFound(key) => AppError::NotFound(format!("Asset '{key}' not found")),
            other => AppError::Remote(other.to_string()),
        }
    }
}

/// Map a write error to `DuplicateSlug` when the slug unique index
/// rejected it. The pre-insert existence check is only a fast-fail; a
/// lost create/create race lands here.
pub fn slug_conflict(err: DbErr, slug: &str) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::DuplicateSlug(slug.to_string()),
        _ => AppError::Internal(err.to_string()),
    }
}
