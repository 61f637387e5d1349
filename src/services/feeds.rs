//! Feed service - the paginated post listings.
//!
//! Every listing is ordered newest-first and sliced through the shared
//! paginator: count first, clamp the requested page, then fetch the window.

use sqlx::PgPool;
use uuid::Uuid;

use crate::db::post_repo;
use crate::error::Result;
use crate::models::PostView;
use crate::pagination::{Page, Paginator};

pub struct FeedService {
    pool: PgPool,
    paginator: Paginator,
}

impl FeedService {
    pub fn new(pool: PgPool, page_size: i64) -> Self {
        Self {
            pool,
            paginator: Paginator::new(page_size),
        }
    }

    /// Global feed: every post.
    pub async fn index_page(&self, requested: Option<i64>) -> Result<Page<PostView>> {
        let total = post_repo::count_all(&self.pool).await?;
        let window = self.paginator.window(total, requested);
        let rows = post_repo::list_recent(&self.pool, window.limit, window.offset).await?;

        Ok(Page::new(rows, window).map(PostView::from))
    }

    /// Posts belonging to a group.
    pub async fn group_page(&self, group_id: Uuid, requested: Option<i64>) -> Result<Page<PostView>> {
        let total = post_repo::count_by_group(&self.pool, group_id).await?;
        let window = self.paginator.window(total, requested);
        let rows =
            post_repo::list_by_group(&self.pool, group_id, window.limit, window.offset).await?;

        Ok(Page::new(rows, window).map(PostView::from))
    }

    /// Posts authored by one user.
    pub async fn author_page(
        &self,
        author_id: Uuid,
        requested: Option<i64>,
    ) -> Result<Page<PostView>> {
        let total = post_repo::count_by_author(&self.pool, author_id).await?;
        let window = self.paginator.window(total, requested);
        let rows =
            post_repo::list_by_author(&self.pool, author_id, window.limit, window.offset).await?;

        Ok(Page::new(rows, window).map(PostView::from))
    }

    /// Posts authored by users the requester follows.
    pub async fn follow_page(
        &self,
        follower_id: Uuid,
        requested: Option<i64>,
    ) -> Result<Page<PostView>> {
        let total = post_repo::count_follow_feed(&self.pool, follower_id).await?;
        let window = self.paginator.window(total, requested);
        let rows =
            post_repo::list_follow_feed(&self.pool, follower_id, window.limit, window.offset)
                .await?;

        Ok(Page::new(rows, window).map(PostView::from))
    }
}
