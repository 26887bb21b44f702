use sea_orm::sea_query::{Index, IndexCreateStatement, PostgresQueryBuilder, SchemaStatementBuilder};
use sea_orm::*;
use tracing::info;

use crate::entity::{blog_post, media_asset, project};

/// Ensure required database indexes exist.
///
/// SeaORM's schema-sync does not create these, and the unique indexes
/// are the actual enforcement of slug and asset uniqueness (the
/// in-handler existence checks are only fast-fail optimizations), so a
/// failure here is fatal.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    let statements: Vec<(&str, IndexCreateStatement)> = vec![
        (
            "idx_project_slug",
            Index::create()
                .if_not_exists()
                .name("idx_project_slug")
                .table(project::Entity)
                .col(project::Column::Slug)
                .unique()
                .to_owned(),
        ),
        (
            "idx_blog_post_slug",
            Index::create()
                .if_not_exists()
                .name("idx_blog_post_slug")
                .table(blog_post::Entity)
                .col(blog_post::Column::Slug)
                .unique()
                .to_owned(),
        ),
        // One stored asset per (folder, bytes): the dedup contract.
        (
            "idx_media_asset_folder_hash",
            Index::create()
                .if_not_exists()
                .name("idx_media_asset_folder_hash")
                .table(media_asset::Entity)
                .col(media_asset::Column::Folder)
                .col(media_asset::Column::ContentHash)
                .unique()
                .to_owned(),
        ),
        // Gallery listings: newest-first within a folder.
        (
            "idx_media_asset_folder_created",
            Index::create()
                .if_not_exists()
                .name("idx_media_asset_folder_created")
                .table(media_asset::Entity)
                .col(media_asset::Column::Folder)
                .col(media_asset::Column::CreatedAt)
                .to_owned(),
        ),
    ];

    for (name, statement) in statements {
        db.execute_unprepared(&statement.to_string(PostgresQueryBuilder))
            .await?;
        info!("Ensured index {name} exists");
    }

    Ok(())
}
