//! Post entity with optimistic-concurrency versioning.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::account::AccountId;

/// Maximum title length.
pub const TITLE_MAX: usize = 100;
/// Maximum content length.
pub const CONTENT_MAX: usize = 300;

/// Validation failures for post value types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PostValidationError {
    #[error("title must be non-empty and at most {TITLE_MAX} characters")]
    Title,
    #[error("content must be non-empty and at most {CONTENT_MAX} characters")]
    Content,
    #[error("tags must be non-empty strings")]
    Tag,
}

/// Post title, bounded and non-blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PostTitle(String);

impl PostTitle {
    /// Validate and construct a title.
    pub fn new(value: impl Into<String>) -> Result<Self, PostValidationError> {
        let value = value.into();
        if value.trim().is_empty() || value.chars().count() > TITLE_MAX {
            return Err(PostValidationError::Title);
        }
        Ok(Self(value))
    }

    /// Borrow the title text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PostTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for PostTitle {
    type Error = PostValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PostTitle> for String {
    fn from(value: PostTitle) -> Self {
        value.0
    }
}

/// Post body, bounded and non-blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PostContent(String);

impl PostContent {
    /// Validate and construct post content.
    pub fn new(value: impl Into<String>) -> Result<Self, PostValidationError> {
        let value = value.into();
        if value.trim().is_empty() || value.chars().count() > CONTENT_MAX {
            return Err(PostValidationError::Content);
        }
        Ok(Self(value))
    }

    /// Borrow the content text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PostContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for PostContent {
    type Error = PostValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PostContent> for String {
    fn from(value: PostContent) -> Self {
        value.0
    }
}

/// Unordered tag collection attached to a post.
///
/// Duplicates are collapsed; order is preserved for display.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct TagSet(Vec<String>);

impl TagSet {
    /// Validate and construct a tag set.
    pub fn new(tags: Vec<String>) -> Result<Self, PostValidationError> {
        let mut seen = Vec::with_capacity(tags.len());
        for tag in tags {
            if tag.trim().is_empty() {
                return Err(PostValidationError::Tag);
            }
            if !seen.contains(&tag) {
                seen.push(tag);
            }
        }
        Ok(Self(seen))
    }

    /// Borrow the tags.
    pub fn as_slice(&self) -> &[String] {
        self.0.as_slice()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Clone the tags into a plain vector for persistence.
    pub fn to_vec(&self) -> Vec<String> {
        self.0.clone()
    }
}

impl TryFrom<Vec<String>> for TagSet {
    type Error = PostValidationError;

    fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TagSet> for Vec<String> {
    fn from(value: TagSet) -> Self {
        value.0
    }
}

/// Candidate post assembled before persistence.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub id: Uuid,
    pub author: AccountId,
    pub title: PostTitle,
    pub content: PostContent,
    pub tags: TagSet,
}

/// Field changes applied by a versioned update.
#[derive(Debug, Clone)]
pub struct PostChanges {
    pub title: PostTitle,
    pub content: PostContent,
    pub tags: TagSet,
}

/// Persisted post record.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    id: Uuid,
    author: AccountId,
    title: PostTitle,
    content: PostContent,
    tags: TagSet,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: i32,
}

/// Field bundle for [`Post::new`].
#[derive(Debug, Clone)]
pub struct PostParts {
    pub id: Uuid,
    pub author: AccountId,
    pub title: PostTitle,
    pub content: PostContent,
    pub tags: TagSet,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: i32,
}

impl Post {
    /// Assemble a post from validated parts.
    pub fn new(parts: PostParts) -> Self {
        let PostParts {
            id,
            author,
            title,
            content,
            tags,
            created_at,
            updated_at,
            version,
        } = parts;
        Self {
            id,
            author,
            title,
            content,
            tags,
            created_at,
            updated_at,
            version,
        }
    }

    /// Stable identifier.
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Authoring account.
    pub const fn author(&self) -> &AccountId {
        &self.author
    }

    /// Current title.
    pub const fn title(&self) -> &PostTitle {
        &self.title
    }

    /// Current content.
    pub const fn content(&self) -> &PostContent {
        &self.content
    }

    /// Attached tags.
    pub const fn tags(&self) -> &TagSet {
        &self.tags
    }

    /// Creation timestamp.
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last update timestamp.
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Optimistic-concurrency version counter.
    pub const fn version(&self) -> i32 {
        self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("T")]
    #[case("a title with spaces")]
    fn accepts_valid_titles(#[case] raw: &str) {
        assert!(PostTitle::new(raw).is_ok());
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn rejects_blank_titles(#[case] raw: &str) {
        assert_eq!(
            PostTitle::new(raw).expect_err("blank title"),
            PostValidationError::Title
        );
    }

    #[test]
    fn rejects_overlong_title_and_content() {
        assert!(PostTitle::new("t".repeat(TITLE_MAX + 1)).is_err());
        assert!(PostContent::new("c".repeat(CONTENT_MAX + 1)).is_err());
        assert!(PostTitle::new("t".repeat(TITLE_MAX)).is_ok());
        assert!(PostContent::new("c".repeat(CONTENT_MAX)).is_ok());
    }

    #[test]
    fn tag_set_deduplicates_preserving_order() {
        let tags = TagSet::new(vec![
            "rust".to_owned(),
            "web".to_owned(),
            "rust".to_owned(),
        ])
        .expect("valid tags");

        assert_eq!(tags.as_slice(), ["rust", "web"]);
    }

    #[test]
    fn tag_set_rejects_blank_tags() {
        assert_eq!(
            TagSet::new(vec![" ".to_owned()]).expect_err("blank tag"),
            PostValidationError::Tag
        );
    }
}
