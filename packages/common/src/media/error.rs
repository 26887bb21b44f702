use thiserror::Error;

/// Errors produced by a media backend.
#[derive(Debug, Error)]
pub enum MediaError {
    /// No object is stored under the given key.
    #[error("media object not found: {0}")]
    NotFound(String),

    /// The supplied hash string could not be parsed.
    #[error("invalid content hash: {0}")]
    InvalidHash(String),

    /// Local I/O failure (filesystem backend).
    #[error("media I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The remote host rejected or failed the request.
    #[error("media host request failed: {0}")]
    Remote(String),
}
