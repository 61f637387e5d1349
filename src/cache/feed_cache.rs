use redis::{aio::ConnectionManager, AsyncCommands};
use std::time::Duration;
use tracing::debug;

use crate::error::Result;
use crate::metrics::FEED_CACHE_EVENTS;

/// Redis-backed cache for rendered global-feed pages.
///
/// Stores the serialized response body per page number, so two reads inside
/// the TTL window are byte-identical by construction. Keys carry a version
/// segment; `clear` bumps the version and lets stale entries age out on
/// their TTL.
#[derive(Clone)]
pub struct FeedCache {
    redis: ConnectionManager,
    ttl: Duration,
}

const VERSION_KEY: &str = "feed:index:version";

impl FeedCache {
    pub fn new(redis: ConnectionManager, ttl_secs: u64) -> Self {
        Self {
            redis,
            ttl: Duration::from_secs(ttl_secs),
        }
    }

    fn page_key(version: u64, page: i64) -> String {
        format!("feed:index:v{}:page:{}", version, page)
    }

    async fn current_version(&self) -> Result<u64> {
        let mut conn = self.redis.clone();
        let version: Option<u64> = conn.get(VERSION_KEY).await?;
        Ok(version.unwrap_or(0))
    }

    /// Cached body for a page of the global feed, if present.
    pub async fn read_page(&self, page: i64) -> Result<Option<String>> {
        let key = Self::page_key(self.current_version().await?, page);
        let mut conn = self.redis.clone();

        match conn.get::<_, Option<String>>(&key).await {
            Ok(Some(body)) => {
                debug!(page, "feed cache HIT");
                FEED_CACHE_EVENTS.with_label_values(&["hit"]).inc();
                Ok(Some(body))
            }
            Ok(None) => {
                debug!(page, "feed cache MISS");
                FEED_CACHE_EVENTS.with_label_values(&["miss"]).inc();
                Ok(None)
            }
            Err(e) => {
                FEED_CACHE_EVENTS.with_label_values(&["error"]).inc();
                Err(e.into())
            }
        }
    }

    /// Store a rendered page body for the configured TTL.
    pub async fn write_page(&self, page: i64, body: &str) -> Result<()> {
        let key = Self::page_key(self.current_version().await?, page);
        let mut conn = self.redis.clone();

        conn.set_ex::<_, _, ()>(&key, body, self.ttl.as_secs())
            .await?;

        debug!(page, ttl_secs = self.ttl.as_secs(), "feed cache WRITE");
        Ok(())
    }

    /// Invalidate every cached page at once by bumping the key version.
    /// Stale entries expire on their own TTL.
    pub async fn clear(&self) -> Result<()> {
        let mut conn = self.redis.clone();
        let version: u64 = conn.incr(VERSION_KEY, 1).await?;

        debug!(version, "feed cache CLEAR");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_key_includes_version_and_page() {
        assert_eq!(FeedCache::page_key(0, 1), "feed:index:v0:page:1");
        assert_eq!(FeedCache::page_key(3, 12), "feed:index:v3:page:12");
    }

    #[test]
    fn version_bump_changes_every_page_key() {
        let before = FeedCache::page_key(7, 1);
        let after = FeedCache::page_key(8, 1);
        assert_ne!(before, after);
    }
}
