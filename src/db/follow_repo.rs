//! Follow-graph persistence.
//!
//! The schema enforces edge uniqueness and forbids self-follow; inserts are
//! idempotent via ON CONFLICT. All follow writes in the crate go through
//! this module.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Follow;

/// Idempotent edge insert; returns true if a new edge was created.
pub async fn create_follow(
    pool: &PgPool,
    follower_id: Uuid,
    author_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let inserted = sqlx::query_as::<_, Follow>(
        r#"
        INSERT INTO follows (follower_id, author_id, created_at)
        VALUES ($1, $2, NOW())
        ON CONFLICT (follower_id, author_id) DO NOTHING
        RETURNING follower_id, author_id, created_at
        "#,
    )
    .bind(follower_id)
    .bind(author_id)
    .fetch_optional(pool)
    .await?;

    Ok(inserted.is_some())
}

/// Idempotent edge delete; returns true if an edge was removed.
pub async fn delete_follow(
    pool: &PgPool,
    follower_id: Uuid,
    author_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let affected = sqlx::query(
        r#"
        DELETE FROM follows
        WHERE follower_id = $1 AND author_id = $2
        "#,
    )
    .bind(follower_id)
    .bind(author_id)
    .execute(pool)
    .await?
    .rows_affected();

    Ok(affected > 0)
}

/// Whether `follower_id` currently follows `author_id`
pub async fn exists(
    pool: &PgPool,
    follower_id: Uuid,
    author_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM follows WHERE follower_id = $1 AND author_id = $2)",
    )
    .bind(follower_id)
    .bind(author_id)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}
