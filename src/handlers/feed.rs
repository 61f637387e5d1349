//! Feed handlers - the paginated post listings.

use actix_web::{web, HttpResponse};
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::cache::FeedCache;
use crate::config::Config;
use crate::db::group_repo;
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::models::{Group, PostView};
use crate::pagination::{Page, PageQuery};
use crate::services::FeedService;

#[derive(Debug, Serialize)]
pub struct GroupFeedResponse {
    pub group: Group,
    pub page: Page<PostView>,
}

/// Global feed, newest first.
///
/// The serialized body is cached per page for a short fixed TTL, so a post
/// created between two reads inside the window does not appear until the
/// entry expires or the cache is flushed. Cache trouble degrades to a direct
/// read.
pub async fn index(
    pool: web::Data<PgPool>,
    cache: web::Data<Arc<FeedCache>>,
    config: web::Data<Config>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let requested = query.requested();
    let cache_page = requested.unwrap_or(1);

    match cache.read_page(cache_page).await {
        Ok(Some(body)) => {
            return Ok(HttpResponse::Ok()
                .content_type(mime::APPLICATION_JSON)
                .body(body));
        }
        Ok(None) => {}
        Err(err) => warn!("feed cache read failed: {}", err),
    }

    let service = FeedService::new((**pool).clone(), config.pagination.page_size);
    let page = service.index_page(requested).await?;

    let body = serde_json::to_string(&page)
        .map_err(|e| AppError::Internal(format!("Response serialization error: {}", e)))?;

    if let Err(err) = cache.write_page(cache_page, &body).await {
        debug!("feed cache write failed: {}", err);
    }

    Ok(HttpResponse::Ok()
        .content_type(mime::APPLICATION_JSON)
        .body(body))
}

/// Posts of one group plus the group metadata.
pub async fn group_posts(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    slug: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let group = group_repo::find_by_slug(pool.get_ref(), &slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Group '{}' not found", slug)))?;

    let service = FeedService::new((**pool).clone(), config.pagination.page_size);
    let page = service.group_page(group.id, query.requested()).await?;

    Ok(HttpResponse::Ok().json(GroupFeedResponse { group, page }))
}

/// Personalized feed: posts authored by users the requester follows.
pub async fn follow_feed(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    user: UserId,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let service = FeedService::new((**pool).clone(), config.pagination.page_size);
    let page = service.follow_page(user.0, query.requested()).await?;

    Ok(HttpResponse::Ok().json(page))
}

/// Explicitly invalidate the cached global feed.
/// POST /internal/cache/flush
pub async fn flush_feed_cache(cache: web::Data<Arc<FeedCache>>) -> Result<HttpResponse> {
    cache.clear().await?;
    Ok(HttpResponse::NoContent().finish())
}
