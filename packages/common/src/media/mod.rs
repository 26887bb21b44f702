mod error;
mod hash;
mod traits;
mod variants;

pub mod filesystem;

#[cfg(feature = "object-storage")]
pub mod s3;

pub use error::MediaError;
pub use hash::ContentHash;
pub use traits::MediaBackend;
pub use variants::RenderVariants;
