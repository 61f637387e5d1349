//! Data models for chronicle-service.
//!
//! Entity structs mirror the PostgreSQL schema one-to-one; the `*View`
//! structs are the JSON view models handed to the presentation layer, built
//! from joined rows so listings never fan out into per-row lookups.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Directory entry for a user. Written by the external identity provider;
/// this service only reads it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// Named category a post may optionally belong to. The slug is the immutable
/// public identifier.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Group {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub group_id: Option<Uuid>,
    pub text: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Directed edge in the follow graph: follower sees author's posts in their
/// follow feed.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Follow {
    pub follower_id: Uuid,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Post row joined with its author and (optional) group, as fetched by the
/// listing and detail queries.
#[derive(Debug, Clone, FromRow)]
pub struct PostRow {
    pub id: Uuid,
    pub text: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub author_id: Uuid,
    pub author_username: String,
    pub group_slug: Option<String>,
    pub group_title: Option<String>,
}

/// Comment row joined with its author.
#[derive(Debug, Clone, FromRow)]
pub struct CommentRow {
    pub id: Uuid,
    pub post_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub author_id: Uuid,
    pub author_username: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthorView {
    pub id: Uuid,
    pub username: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupRef {
    pub slug: String,
    pub title: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    pub id: Uuid,
    pub text: String,
    pub author: AuthorView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<GroupRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    pub id: Uuid,
    pub post_id: Uuid,
    pub text: String,
    pub author: AuthorView,
    pub created_at: DateTime<Utc>,
}

/// URL path prefix attachments are served from by the presentation layer.
pub const MEDIA_URL_PREFIX: &str = "/media";

impl From<PostRow> for PostView {
    fn from(row: PostRow) -> Self {
        let group = match (row.group_slug, row.group_title) {
            (Some(slug), Some(title)) => Some(GroupRef { slug, title }),
            _ => None,
        };

        PostView {
            id: row.id,
            text: row.text,
            author: AuthorView {
                id: row.author_id,
                username: row.author_username,
            },
            group,
            image_url: row.image.map(|key| format!("{}/{}", MEDIA_URL_PREFIX, key)),
            created_at: row.created_at,
        }
    }
}

impl From<CommentRow> for CommentView {
    fn from(row: CommentRow) -> Self {
        CommentView {
            id: row.id,
            post_id: row.post_id,
            text: row.text,
            author: AuthorView {
                id: row.author_id,
                username: row.author_username,
            },
            created_at: row.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row(group: bool, image: bool) -> PostRow {
        PostRow {
            id: Uuid::new_v4(),
            text: "a post".to_string(),
            image: image.then(|| "posts/abc.gif".to_string()),
            created_at: Utc::now(),
            author_id: Uuid::new_v4(),
            author_username: "auth".to_string(),
            group_slug: group.then(|| "test_slug".to_string()),
            group_title: group.then(|| "Test group".to_string()),
        }
    }

    #[test]
    fn post_view_builds_media_url_from_stored_key() {
        let view = PostView::from(sample_row(false, true));
        assert_eq!(view.image_url.as_deref(), Some("/media/posts/abc.gif"));
        assert!(view.group.is_none());
    }

    #[test]
    fn post_view_keeps_group_reference() {
        let view = PostView::from(sample_row(true, false));
        let group = view.group.expect("group reference");
        assert_eq!(group.slug, "test_slug");
        assert!(view.image_url.is_none());
    }
}
