//! Business logic layer for chronicle-service.
//!
//! High-level operations composed by the HTTP handlers:
//! - Post service: post creation, editing, detail assembly
//! - Comment service: comment creation
//! - Follow service: follow-graph changes and lookups
//! - Feed service: paginated post listings

pub mod comments;
pub mod feeds;
pub mod follows;
pub mod posts;

pub use comments::CommentService;
pub use feeds::FeedService;
pub use follows::FollowService;
pub use posts::PostService;
