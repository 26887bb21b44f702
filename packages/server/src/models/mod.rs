pub mod blog_post;
pub mod ingest;
pub mod media;
pub mod project;
pub mod shared;
