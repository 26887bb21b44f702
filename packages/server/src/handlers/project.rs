use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::prelude::Expr;
use sea_orm::*;
use tracing::instrument;
use uuid::Uuid;

use crate::entity::project;
use crate::error::{AppError, ErrorBody, slug_conflict};
use crate::extractors::json::AppJson;
use crate::media;
use crate::models::project::*;
use crate::models::shared::{estimate_read_time, string_list, to_json_list};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/projects",
    tag = "Projects",
    operation_id = "listProjects",
    summary = "List projects",
    description = "Returns projects sorted by `order` ascending, then `published_at` descending. \
        Optional filters on `featured` and `tag`; `limit` truncates after sorting. An empty \
        result is a success, not an error.",
    params(ListRecordsQuery),
    responses(
        (status = 200, description = "List of projects", body = Vec<ProjectResponse>),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_projects(
    State(state): State<AppState>,
    Query(query): Query<ListRecordsQuery>,
) -> Result<Json<Vec<ProjectResponse>>, AppError> {
    let mut select = project::Entity::find();
    if let Some(featured) = query.featured {
        select = select.filter(project::Column::Featured.eq(featured));
    }

    let rows = select
        .order_by_asc(project::Column::DisplayOrder)
        .order_by_desc(project::Column::PublishedAt)
        .all(&state.db)
        .await?;

    let mut items: Vec<ProjectResponse> = rows.into_iter().map(Into::into).collect();
    if let Some(ref tag) = query.tag {
        items.retain(|p| p.tags.iter().any(|t| t == tag));
    }
    if let Some(limit) = query.limit {
        items.truncate(limit as usize);
    }

    Ok(Json(items))
}

#[utoipa::path(
    post,
    path = "/api/v1/projects",
    tag = "Projects",
    operation_id = "createProject",
    summary = "Create a new project",
    request_body = CreateProjectRequest,
    responses(
        (status = 201, description = "Project created", body = ProjectResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 409, description = "Slug already in use (DUPLICATE_SLUG)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(slug = %payload.slug))]
pub async fn create_project(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateProjectRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_project(&payload)?;
    let slug = payload.slug.trim().to_string();

    // Fast-fail only; the unique index is the real guarantee.
    let taken = project::Entity::find()
        .filter(project::Column::Slug.eq(&slug))
        .count(&state.db)
        .await?;
    if taken > 0 {
        return Err(AppError::DuplicateSlug(slug));
    }

    let now = chrono::Utc::now();
    let read_time = payload
        .read_time
        .unwrap_or_else(|| estimate_read_time(&payload.content));

    let new_project = project::ActiveModel {
        id: Set(Uuid::now_v7()),
        slug: Set(slug.clone()),
        title: Set(payload.title.trim().to_string()),
        description: Set(payload.description),
        image: Set(payload.image),
        images: Set(to_json_list(&payload.images)),
        link: Set(payload.link),
        avatars: Set(to_json_list(&payload.avatars)),
        content: Set(payload.content),
        tags: Set(to_json_list(&payload.tags)),
        featured: Set(payload.featured),
        display_order: Set(payload.order),
        views: Set(0),
        likes: Set(0),
        read_time: Set(Some(read_time)),
        meta_title: Set(payload.seo.meta_title),
        meta_description: Set(payload.seo.meta_description),
        og_image: Set(payload.seo.og_image),
        published_at: Set(payload.published_at.unwrap_or(now)),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let model = new_project
        .insert(&state.db)
        .await
        .map_err(|e| slug_conflict(e, &slug))?;

    Ok((StatusCode::CREATED, Json(ProjectResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/api/v1/projects/{slug}",
    tag = "Projects",
    operation_id = "getProject",
    summary = "Get a project by slug",
    description = "Unless `increment_views=false`, a hit schedules a detached view-count \
        increment that never delays or fails this response.",
    params(
        ("slug" = String, Path, description = "Project slug"),
        GetRecordQuery,
    ),
    responses(
        (status = 200, description = "Project details", body = ProjectResponse),
        (status = 404, description = "Project not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query), fields(slug))]
pub async fn get_project(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<GetRecordQuery>,
) -> Result<Json<ProjectResponse>, AppError> {
    let model = find_by_slug(&state.db, &slug).await?;

    if query.increment_views.unwrap_or(true) {
        spawn_view_increment(&state.db, &model.slug);
    }

    Ok(Json(model.into()))
}

#[utoipa::path(
    patch,
    path = "/api/v1/projects/{identifier}",
    tag = "Projects",
    operation_id = "updateProject",
    summary = "Update a project",
    description = "Partial update; only provided fields are modified. The identifier is tried \
        as an internal id first when it parses as a UUID, then as a slug. Changing the slug \
        re-checks uniqueness against the new value.",
    params(("identifier" = String, Path, description = "Internal id (UUID) or slug")),
    request_body = UpdateProjectRequest,
    responses(
        (status = 200, description = "Project updated", body = ProjectResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Project not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Slug already in use (DUPLICATE_SLUG)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(identifier))]
pub async fn update_project(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
    AppJson(payload): AppJson<UpdateProjectRequest>,
) -> Result<Json<ProjectResponse>, AppError> {
    validate_update_project(&payload)?;

    let txn = state.db.begin().await?;
    let existing = find_by_identifier(&txn, &identifier).await?;

    let mut slug = existing.slug.clone();
    if let Some(ref requested) = payload.slug {
        let requested = requested.trim();
        if requested != existing.slug {
            let clash = project::Entity::find()
                .filter(project::Column::Slug.eq(requested))
                .filter(project::Column::Id.ne(existing.id))
                .count(&txn)
                .await?;
            if clash > 0 {
                return Err(AppError::DuplicateSlug(requested.to_string()));
            }
            slug = requested.to_string();
        }
    }

    let mut active: project::ActiveModel = existing.into();
    active.slug = Set(slug.clone());
    if let Some(title) = payload.title {
        active.title = Set(title.trim().to_string());
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if let Some(image) = payload.image {
        active.image = Set(image);
    }
    if let Some(images) = payload.images {
        active.images = Set(to_json_list(&images));
    }
    if let Some(link) = payload.link {
        active.link = Set(link);
    }
    if let Some(avatars) = payload.avatars {
        active.avatars = Set(to_json_list(&avatars));
    }
    if let Some(content) = payload.content {
        active.content = Set(content);
    }
    if let Some(tags) = payload.tags {
        active.tags = Set(to_json_list(&tags));
    }
    if let Some(featured) = payload.featured {
        active.featured = Set(featured);
    }
    if let Some(order) = payload.order {
        active.display_order = Set(order);
    }
    if let Some(published_at) = payload.published_at {
        active.published_at = Set(published_at);
    }
    if let Some(read_time) = payload.read_time {
        active.read_time = Set(Some(read_time));
    }
    if let Some(seo) = payload.seo {
        active.meta_title = Set(seo.meta_title);
        active.meta_description = Set(seo.meta_description);
        active.og_image = Set(seo.og_image);
    }
    active.updated_at = Set(chrono::Utc::now());

    let model = active
        .update(&txn)
        .await
        .map_err(|e| slug_conflict(e, &slug))?;
    txn.commit().await?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/api/v1/projects/{identifier}",
    tag = "Projects",
    operation_id = "deleteProject",
    summary = "Delete a project",
    description = "Returns the deleted record. Referenced images (`image` + `images`) are \
        cleaned up by a detached best-effort task after the response.",
    params(("identifier" = String, Path, description = "Internal id (UUID) or slug")),
    responses(
        (status = 200, description = "Deleted project", body = ProjectResponse),
        (status = 404, description = "Project not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(identifier))]
pub async fn delete_project(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> Result<Json<ProjectResponse>, AppError> {
    let existing = find_by_identifier(&state.db, &identifier).await?;

    project::Entity::delete_by_id(existing.id)
        .exec(&state.db)
        .await?;

    let mut urls = vec![existing.image.clone()];
    urls.extend(string_list(&existing.images));
    media::spawn_record_cleanup(state.db.clone(), state.media.clone(), urls);

    Ok(Json(existing.into()))
}

#[utoipa::path(
    post,
    path = "/api/v1/projects/{slug}/likes",
    tag = "Projects",
    operation_id = "incrementProjectLikes",
    summary = "Increment a project's like counter",
    params(("slug" = String, Path, description = "Project slug")),
    responses(
        (status = 200, description = "New like count", body = LikesResponse),
        (status = 404, description = "Project not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(slug))]
pub async fn increment_likes(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<LikesResponse>, AppError> {
    // Single UPDATE, so concurrent likes never lose increments.
    let result = project::Entity::update_many()
        .col_expr(project::Column::Likes, Expr::cust("likes + 1"))
        .filter(project::Column::Slug.eq(&slug))
        .exec(&state.db)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Project not found".into()));
    }

    let model = find_by_slug(&state.db, &slug).await?;
    Ok(Json(LikesResponse { likes: model.likes }))
}

#[utoipa::path(
    post,
    path = "/api/v1/projects/{slug}/featured",
    tag = "Projects",
    operation_id = "toggleProjectFeatured",
    summary = "Toggle a project's featured flag",
    description = "Read-flip-write; concurrent toggles are last-write-wins.",
    params(("slug" = String, Path, description = "Project slug")),
    responses(
        (status = 200, description = "New featured value", body = FeaturedResponse),
        (status = 404, description = "Project not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(slug))]
pub async fn toggle_featured(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<FeaturedResponse>, AppError> {
    let existing = find_by_slug(&state.db, &slug).await?;
    let featured = !existing.featured;

    let mut active: project::ActiveModel = existing.into();
    active.featured = Set(featured);
    active.updated_at = Set(chrono::Utc::now());
    active.update(&state.db).await?;

    Ok(Json(FeaturedResponse { featured }))
}

/// Detached view-count bump: a single UPDATE that runs after the read
/// response; its failure is logged and swallowed.
fn spawn_view_increment(db: &DatabaseConnection, slug: &str) {
    let db = db.clone();
    let slug = slug.to_string();
    tokio::spawn(async move {
        let result = project::Entity::update_many()
            .col_expr(project::Column::Views, Expr::cust("views + 1"))
            .filter(project::Column::Slug.eq(&slug))
            .exec(&db)
            .await;
        if let Err(error) = result {
            tracing::warn!(%slug, ?error, "view count increment failed");
        }
    });
}

async fn find_by_slug<C: ConnectionTrait>(db: &C, slug: &str) -> Result<project::Model, AppError> {
    project::Entity::find()
        .filter(project::Column::Slug.eq(slug))
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".into()))
}

/// Resolve an identifier as an internal id first when it parses as a
/// UUID, falling back to slug lookup.
async fn find_by_identifier<C: ConnectionTrait>(
    db: &C,
    identifier: &str,
) -> Result<project::Model, AppError> {
    if let Ok(id) = Uuid::parse_str(identifier)
        && let Some(model) = project::Entity::find_by_id(id).one(db).await?
    {
        return Ok(model);
    }
    find_by_slug(db, identifier).await
}
