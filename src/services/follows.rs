//! Follow service - follow-graph changes and lookups.
//!
//! Follow is idempotent (the unique edge constraint absorbs duplicates) and
//! unfollow of a missing edge is a no-op. Self-follow is rejected.

use sqlx::PgPool;
use uuid::Uuid;

use crate::db::follow_repo;
use crate::error::{AppError, Result};
use crate::metrics::FOLLOW_EVENTS_TOTAL;

pub struct FollowService {
    pool: PgPool,
}

impl FollowService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a follow edge from `follower_id` to `author_id`.
    pub async fn follow(&self, follower_id: Uuid, author_id: Uuid) -> Result<()> {
        if follower_id == author_id {
            return Err(AppError::BadRequest("Cannot follow yourself".to_string()));
        }

        let created = follow_repo::create_follow(&self.pool, follower_id, author_id).await?;
        if created {
            FOLLOW_EVENTS_TOTAL.with_label_values(&["follow"]).inc();
            tracing::info!(%follower_id, %author_id, "follow edge created");
        }

        Ok(())
    }

    /// Remove the follow edge, if any.
    pub async fn unfollow(&self, follower_id: Uuid, author_id: Uuid) -> Result<()> {
        let removed = follow_repo::delete_follow(&self.pool, follower_id, author_id).await?;
        if removed {
            FOLLOW_EVENTS_TOTAL.with_label_values(&["unfollow"]).inc();
            tracing::info!(%follower_id, %author_id, "follow edge removed");
        }

        Ok(())
    }

    /// Whether `follower_id` follows `author_id`.
    pub async fn is_following(&self, follower_id: Uuid, author_id: Uuid) -> Result<bool> {
        Ok(follow_repo::exists(&self.pool, follower_id, author_id).await?)
    }
}
