pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod ingest;
pub mod media;
pub mod models;
pub mod routes;
pub mod seed;
pub mod state;

use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as ScalarServable};
use utoipa_swagger_ui::SwaggerUi;

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Vitrine CMS API",
        version = "1.0.0",
        description = "Content management API for the Vitrine portfolio site"
    ),
    paths(
        handlers::project::list_projects,
        handlers::project::create_project,
        handlers::project::get_project,
        handlers::project::update_project,
        handlers::project::delete_project,
        handlers::project::increment_likes,
        handlers::project::toggle_featured,
        handlers::blog_post::list_blog_posts,
        handlers::blog_post::create_blog_post,
        handlers::blog_post::get_blog_post,
        handlers::blog_post::update_blog_post,
        handlers::blog_post::delete_blog_post,
        handlers::blog_post::toggle_featured,
        handlers::media::upload_image,
        handlers::media::delete_image,
        handlers::media::list_gallery,
        handlers::ingest::ingest_project,
        handlers::ingest::ingest_blog_post,
    ),
    tags(
        (name = "Projects", description = "Project record CRUD and counters"),
        (name = "Blog Posts", description = "Blog post record CRUD and counters"),
        (name = "Media", description = "Image upload and deletion"),
        (name = "Gallery", description = "Standalone gallery assets"),
        (name = "Ingest", description = "Markdown ingestion with image rewriting"),
    ),
)]
struct ApiDoc;

/// Build the application router.
pub fn build_router(state: AppState) -> axum::Router {
    let config = state.config.clone();
    axum::Router::new()
        .nest("/api", routes::api_routes(&config))
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
}
