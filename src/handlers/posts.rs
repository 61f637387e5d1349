//! Post handlers - detail, create, edit.

use actix_web::{web, HttpResponse};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::db::user_repo;
use crate::error::{AppError, Result};
use crate::forms::PostSubmission;
use crate::handlers::see_other;
use crate::middleware::permissions::can_edit;
use crate::middleware::UserId;
use crate::models::{CommentView, PostView};
use crate::services::PostService;

/// Blank comment form context shipped with the detail view so the
/// presentation layer can render the submission form in one pass.
#[derive(Debug, Serialize)]
pub struct CommentFormContext {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct PostDetailResponse {
    pub post: PostView,
    pub comments: Vec<CommentView>,
    pub comment_form: CommentFormContext,
}

/// GET /posts/{post_id}
pub async fn post_detail(
    pool: web::Data<PgPool>,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = PostService::new((**pool).clone());
    let (post, comments) = service.detail(*post_id).await?;

    Ok(HttpResponse::Ok().json(PostDetailResponse {
        post,
        comments,
        comment_form: CommentFormContext {
            text: String::new(),
        },
    }))
}

/// POST /posts
///
/// Valid submissions persist a post owned by the requester and answer with
/// a redirect to the requester's profile. Invalid submissions fail with
/// field-level errors before anything is written.
pub async fn create_post(
    pool: web::Data<PgPool>,
    user: UserId,
    body: web::Json<PostSubmission>,
) -> Result<HttpResponse> {
    let submission = body.into_inner().normalized();
    submission.validate()?;

    let author = user_repo::find_by_id(pool.get_ref(), user.0)
        .await?
        .ok_or_else(|| AppError::Internal("Authenticated user missing from directory".to_string()))?;

    let service = PostService::new((**pool).clone());
    service.create(author.id, &submission).await?;

    Ok(see_other(format!("/profile/{}", author.username)))
}

/// POST /posts/{post_id}/edit
///
/// A requester who is not the author is silently redirected to the detail
/// page before the submission is even validated, matching the ownership
/// check's place in the flow. Valid author submissions update text, group
/// and image in place; author and creation timestamp never change.
pub async fn edit_post(
    pool: web::Data<PgPool>,
    user: UserId,
    post_id: web::Path<Uuid>,
    body: web::Json<PostSubmission>,
) -> Result<HttpResponse> {
    let service = PostService::new((**pool).clone());
    let post = service.require_post(*post_id).await?;

    let detail_url = format!("/posts/{}", post.id);
    if !can_edit(user.0, &post) {
        return Ok(see_other(detail_url));
    }

    let submission = body.into_inner().normalized();
    submission.validate()?;

    service.edit(&post, &submission).await?;

    Ok(see_other(detail_url))
}
