//! Comment handlers.

use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;
use validator::Validate;

use crate::error::Result;
use crate::forms::CommentSubmission;
use crate::handlers::see_other;
use crate::middleware::UserId;
use crate::services::{CommentService, PostService};

/// POST /posts/{post_id}/comments
///
/// An unknown post is a 404; everything else redirects to the post detail.
/// An invalid (blank) submission produces no mutation but still redirects,
/// so the detail page simply re-renders with its empty form.
pub async fn add_comment(
    pool: web::Data<PgPool>,
    user: UserId,
    post_id: web::Path<Uuid>,
    body: web::Json<CommentSubmission>,
) -> Result<HttpResponse> {
    let posts = PostService::new((**pool).clone());
    let post = posts.require_post(*post_id).await?;

    let submission = body.into_inner().normalized();
    match submission.validate() {
        Ok(()) => {
            let comments = CommentService::new((**pool).clone());
            comments.add_comment(post.id, user.0, &submission.text).await?;
        }
        Err(_) => {
            debug!(post_id = %post.id, "invalid comment submission ignored");
        }
    }

    Ok(see_other(format!("/posts/{}", post.id)))
}
