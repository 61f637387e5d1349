//! Typed submission schemas, one per mutating action.
//!
//! Fields are normalized (trimmed, empty optionals dropped) before
//! validation so a whitespace-only text never reaches the store. Validation
//! runs fully before any persistence call.

use serde::Deserialize;
use validator::Validate;

/// Post create/edit submission.
///
/// `group` is the target group's slug; an omitted or empty value clears the
/// association. `image` is a media key returned by a prior upload; omitting
/// it keeps the stored attachment on edit.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PostSubmission {
    #[validate(length(min = 1, max = 10000, message = "Text is required"))]
    pub text: String,

    pub group: Option<String>,

    pub image: Option<String>,
}

/// Comment submission.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CommentSubmission {
    #[validate(length(min = 1, max = 2000, message = "Text is required"))]
    pub text: String,
}

impl PostSubmission {
    pub fn normalized(mut self) -> Self {
        self.text = self.text.trim().to_string();
        self.group = self
            .group
            .take()
            .map(|slug| slug.trim().to_string())
            .filter(|slug| !slug.is_empty());
        self.image = self
            .image
            .take()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());
        self
    }
}

impl CommentSubmission {
    pub fn normalized(mut self) -> Self {
        self.text = self.text.trim().to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_submission_requires_text() {
        let submission = PostSubmission {
            text: "   ".to_string(),
            group: None,
            image: None,
        }
        .normalized();

        let errors = submission.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("text"));
    }

    #[test]
    fn post_submission_drops_empty_optionals() {
        let submission = PostSubmission {
            text: " a post ".to_string(),
            group: Some("  ".to_string()),
            image: Some("".to_string()),
        }
        .normalized();

        assert!(submission.validate().is_ok());
        assert_eq!(submission.text, "a post");
        assert!(submission.group.is_none());
        assert!(submission.image.is_none());
    }

    #[test]
    fn post_submission_keeps_group_and_image() {
        let submission = PostSubmission {
            text: "a post".to_string(),
            group: Some(" test_slug ".to_string()),
            image: Some("posts/abc.gif".to_string()),
        }
        .normalized();

        assert_eq!(submission.group.as_deref(), Some("test_slug"));
        assert_eq!(submission.image.as_deref(), Some("posts/abc.gif"));
    }

    #[test]
    fn comment_submission_rejects_blank_text() {
        let submission = CommentSubmission {
            text: "\n\t".to_string(),
        }
        .normalized();

        assert!(submission.validate().is_err());
    }
}
