//! Profile handlers - author pages and follow/unfollow.

use actix_web::{web, HttpResponse};
use serde::Serialize;
use sqlx::PgPool;

use crate::config::Config;
use crate::db::user_repo;
use crate::error::{AppError, Result};
use crate::handlers::see_other;
use crate::middleware::{MaybeUserId, UserId};
use crate::models::{PostView, User};
use crate::pagination::{Page, PageQuery};
use crate::services::{FeedService, FollowService};

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub profile: User,
    /// Whether the (authenticated) viewer follows this author.
    pub following: bool,
    /// Follow controls are hidden for anonymous viewers and on one's own
    /// profile.
    pub show_follow_button: bool,
    pub page: Page<PostView>,
}

/// GET /profile/{username}
pub async fn profile(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    username: web::Path<String>,
    viewer: MaybeUserId,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let user = user_repo::find_by_username(pool.get_ref(), &username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User '{}' not found", username)))?;

    let following = match viewer.0 {
        Some(viewer_id) => {
            FollowService::new((**pool).clone())
                .is_following(viewer_id, user.id)
                .await?
        }
        None => false,
    };
    let show_follow_button = viewer.0.is_some_and(|viewer_id| viewer_id != user.id);

    let feed = FeedService::new((**pool).clone(), config.pagination.page_size);
    let page = feed.author_page(user.id, query.requested()).await?;

    Ok(HttpResponse::Ok().json(ProfileResponse {
        profile: user,
        following,
        show_follow_button,
        page,
    }))
}

/// POST /profile/{username}/follow
pub async fn profile_follow(
    pool: web::Data<PgPool>,
    user: UserId,
    username: web::Path<String>,
) -> Result<HttpResponse> {
    let author = user_repo::find_by_username(pool.get_ref(), &username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User '{}' not found", username)))?;

    FollowService::new((**pool).clone())
        .follow(user.0, author.id)
        .await?;

    Ok(see_other(format!("/profile/{}", author.username)))
}

/// POST /profile/{username}/unfollow
///
/// Idempotent: unfollowing a user who was never followed is not an error.
pub async fn profile_unfollow(
    pool: web::Data<PgPool>,
    user: UserId,
    username: web::Path<String>,
) -> Result<HttpResponse> {
    let author = user_repo::find_by_username(pool.get_ref(), &username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User '{}' not found", username)))?;

    FollowService::new((**pool).clone())
        .unfollow(user.0, author.id)
        .await?;

    Ok(see_other(format!("/profile/{}", author.username)))
}
