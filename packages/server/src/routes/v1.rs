use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/projects", project_routes())
        .nest("/posts", blog_post_routes())
        .nest("/media", media_routes())
        .route("/gallery", get(handlers::media::list_gallery))
}

fn project_routes() -> Router<AppState> {
    let crud = Router::new()
        .route(
            "/",
            get(handlers::project::list_projects).post(handlers::project::create_project),
        )
        .route(
            "/{identifier}",
            get(handlers::project::get_project)
                .patch(handlers::project::update_project)
                .delete(handlers::project::delete_project),
        )
        .route(
            "/{identifier}/likes",
            post(handlers::project::increment_likes),
        )
        .route(
            "/{identifier}/featured",
            post(handlers::project::toggle_featured),
        );

    let ingest = Router::new()
        .route("/ingest", post(handlers::ingest::ingest_project))
        .layer(handlers::ingest::ingest_body_limit());

    crud.merge(ingest)
}

fn blog_post_routes() -> Router<AppState> {
    let crud = Router::new()
        .route(
            "/",
            get(handlers::blog_post::list_blog_posts).post(handlers::blog_post::create_blog_post),
        )
        .route(
            "/{identifier}",
            get(handlers::blog_post::get_blog_post)
                .patch(handlers::blog_post::update_blog_post)
                .delete(handlers::blog_post::delete_blog_post),
        )
        .route(
            "/{identifier}/featured",
            post(handlers::blog_post::toggle_featured),
        );

    let ingest = Router::new()
        .route("/ingest", post(handlers::ingest::ingest_blog_post))
        .layer(handlers::ingest::ingest_body_limit());

    crud.merge(ingest)
}

fn media_routes() -> Router<AppState> {
    let upload = Router::new()
        .route("/", post(handlers::media::upload_image))
        .layer(handlers::media::upload_body_limit());

    // Public ids contain '/', so the delete route captures the rest of
    // the path.
    let manage = Router::new().route("/{*public_id}", axum::routing::delete(handlers::media::delete_image));

    upload.merge(manage)
}
