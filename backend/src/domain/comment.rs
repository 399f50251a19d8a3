//! Comments attached to posts.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::account::AccountId;

/// Maximum comment length.
pub const COMMENT_MAX: usize = 500;

/// Validation failures for comment content.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommentValidationError {
    #[error("comment must be non-empty and at most {COMMENT_MAX} characters")]
    Content,
}

/// Comment body, bounded and non-blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentContent(String);

impl CommentContent {
    /// Validate and construct comment content.
    pub fn new(value: impl Into<String>) -> Result<Self, CommentValidationError> {
        let value = value.into();
        if value.trim().is_empty() || value.chars().count() > COMMENT_MAX {
            return Err(CommentValidationError::Content);
        }
        Ok(Self(value))
    }

    /// Borrow the comment text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Candidate comment assembled before persistence.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author: AccountId,
    pub content: CommentContent,
}

/// Persisted comment joined with its author's username for display.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author: AccountId,
    pub author_username: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_and_overlong_comments() {
        assert!(CommentContent::new("  ").is_err());
        assert!(CommentContent::new("c".repeat(COMMENT_MAX + 1)).is_err());
        assert!(CommentContent::new("nice post").is_ok());
    }
}
