pub mod blog_post;
pub mod media_asset;
pub mod project;
