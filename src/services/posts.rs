//! Post service - creation, editing, and detail assembly.

use sqlx::PgPool;
use uuid::Uuid;
use validator::{ValidationError, ValidationErrors};

use crate::db::{comment_repo, group_repo, post_repo};
use crate::error::{AppError, Result};
use crate::forms::PostSubmission;
use crate::metrics::CONTENT_WRITE_TOTAL;
use crate::models::{CommentView, Post, PostView};

pub struct PostService {
    pool: PgPool,
}

impl PostService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch a post or fail with NotFound.
    pub async fn require_post(&self, post_id: Uuid) -> Result<Post> {
        post_repo::find_post_by_id(&self.pool, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Post {} not found", post_id)))
    }

    /// Post detail: the post view plus its comments in creation order.
    pub async fn detail(&self, post_id: Uuid) -> Result<(PostView, Vec<CommentView>)> {
        let row = post_repo::find_post_row_by_id(&self.pool, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Post {} not found", post_id)))?;

        let comments = comment_repo::list_for_post(&self.pool, post_id)
            .await?
            .into_iter()
            .map(CommentView::from)
            .collect();

        Ok((PostView::from(row), comments))
    }

    /// Create a post owned by `author_id` from a validated submission.
    pub async fn create(&self, author_id: Uuid, submission: &PostSubmission) -> Result<Post> {
        let group_id = self.resolve_group(submission.group.as_deref()).await?;

        let post = post_repo::create_post(
            &self.pool,
            author_id,
            &submission.text,
            group_id,
            submission.image.as_deref(),
        )
        .await?;

        CONTENT_WRITE_TOTAL
            .with_label_values(&["post_create"])
            .inc();
        tracing::info!(post_id = %post.id, author_id = %author_id, "post created");

        Ok(post)
    }

    /// Apply a validated edit to a post the caller already authorized.
    ///
    /// Author and creation timestamp are invariant: the update statement
    /// never touches those columns. An omitted image keeps the stored
    /// attachment; an omitted group clears the association.
    pub async fn edit(&self, post: &Post, submission: &PostSubmission) -> Result<()> {
        let group_id = self.resolve_group(submission.group.as_deref()).await?;

        post_repo::update_post(
            &self.pool,
            post.id,
            &submission.text,
            group_id,
            submission.image.as_deref(),
        )
        .await?;

        CONTENT_WRITE_TOTAL.with_label_values(&["post_edit"]).inc();
        tracing::info!(post_id = %post.id, "post edited");

        Ok(())
    }

    /// Map a submitted group slug to its ID. An unknown slug is a
    /// field-level validation failure, not a 404: the submission named a
    /// group that does not exist.
    async fn resolve_group(&self, slug: Option<&str>) -> Result<Option<Uuid>> {
        let Some(slug) = slug else {
            return Ok(None);
        };

        match group_repo::find_by_slug(&self.pool, slug).await? {
            Some(group) => Ok(Some(group.id)),
            None => {
                let mut errors = ValidationErrors::new();
                let mut error = ValidationError::new("unknown_group");
                error.message = Some("Unknown group".into());
                errors.add("group", error);
                Err(AppError::Validation(errors))
            }
        }
    }
}
