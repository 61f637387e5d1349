//! Authorization predicates for chronicle-service.
//!
//! Ownership checks are centralized here so every mutating handler applies
//! the same rule.

use uuid::Uuid;

use crate::models::Post;

/// A post may only be edited by its author.
pub fn can_edit(user_id: Uuid, post: &Post) -> bool {
    post.author_id == user_id
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn post_by(author_id: Uuid) -> Post {
        Post {
            id: Uuid::new_v4(),
            author_id,
            group_id: None,
            text: "a post".to_string(),
            image: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn author_can_edit_own_post() {
        let author = Uuid::new_v4();
        assert!(can_edit(author, &post_by(author)));
    }

    #[test]
    fn non_author_cannot_edit() {
        assert!(!can_edit(Uuid::new_v4(), &post_by(Uuid::new_v4())));
    }
}
