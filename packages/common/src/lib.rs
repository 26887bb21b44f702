pub mod media;

pub use media::{ContentHash, MediaBackend, MediaError, RenderVariants};
