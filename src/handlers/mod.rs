//! HTTP handlers for chronicle-service.
//!
//! One handler per user-facing action:
//! - Feeds: global index, group feed, follow feed
//! - Posts: detail, create, edit
//! - Comments: create
//! - Profiles: author page, follow, unfollow
//! - Media: image attachment upload

pub mod comments;
pub mod feed;
pub mod media;
pub mod posts;
pub mod profiles;

use actix_web::http::header;
use actix_web::HttpResponse;

// Re-export handler functions at module level
pub use comments::add_comment;
pub use feed::{flush_feed_cache, follow_feed, group_posts, index};
pub use media::upload_image;
pub use posts::{create_post, edit_post, post_detail};
pub use profiles::{profile, profile_follow, profile_unfollow};

/// 303 redirect issued after a successful (or deliberately swallowed)
/// mutation.
pub(crate) fn see_other(location: impl AsRef<str>) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location.as_ref().to_string()))
        .finish()
}
