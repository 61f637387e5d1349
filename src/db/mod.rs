//! Database access layer.
//!
//! One repository module per entity, each a set of plain async functions
//! over `&PgPool`. Schema lives in `migrations/` and is applied with
//! `sqlx::migrate!` at startup.

pub mod comment_repo;
pub mod follow_repo;
pub mod group_repo;
pub mod post_repo;
pub mod user_repo;
