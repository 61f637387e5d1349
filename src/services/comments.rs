//! Comment service - comment creation on posts.

use sqlx::PgPool;
use uuid::Uuid;

use crate::db::comment_repo;
use crate::error::Result;
use crate::metrics::CONTENT_WRITE_TOTAL;
use crate::models::Comment;

pub struct CommentService {
    pool: PgPool,
}

impl CommentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a comment owned by `author_id` on an existing post. Callers
    /// check post existence and submission validity first.
    pub async fn add_comment(
        &self,
        post_id: Uuid,
        author_id: Uuid,
        text: &str,
    ) -> Result<Comment> {
        let comment = comment_repo::create_comment(&self.pool, post_id, author_id, text).await?;

        CONTENT_WRITE_TOTAL
            .with_label_values(&["comment_create"])
            .inc();
        tracing::info!(comment_id = %comment.id, post_id = %post_id, "comment created");

        Ok(comment)
    }
}
