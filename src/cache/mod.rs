//! Response caching layer.
//!
//! Holds the short-lived Redis cache for the global feed. The cache is an
//! explicit service with an injected TTL and a clear operation rather than
//! an ambient singleton.

pub mod feed_cache;

pub use feed_cache::FeedCache;
