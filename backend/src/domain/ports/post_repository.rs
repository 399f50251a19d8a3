//! Port for post persistence with optimistic-concurrency updates.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::post::{NewPost, Post, PostChanges};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by post repository adapters.
    pub enum PostPersistenceError {
        /// Repository connection could not be established or timed out.
        Connection { message: String } =>
            "post repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "post repository query failed: {message}",
        /// No row matched: the post is missing, or the supplied version is
        /// stale. Callers cannot distinguish the two and must re-fetch.
        NotFound => "post not found",
    }
}

/// Port for creating, reading, and mutating posts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Insert a post; the version counter starts at the storage default (1).
    async fn create(&self, post: &NewPost) -> Result<Post, PostPersistenceError>;

    /// Fetch a post by id.
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Post>, PostPersistenceError>;

    /// Apply `changes` if and only if the stored version still equals
    /// `expected_version`, atomically incrementing the version.
    async fn update(
        &self,
        id: &Uuid,
        expected_version: i32,
        changes: &PostChanges,
    ) -> Result<Post, PostPersistenceError>;

    /// Hard-delete a post. `NotFound` when nothing was deleted.
    async fn delete(&self, id: &Uuid) -> Result<(), PostPersistenceError>;
}

/// Fixture implementation for wiring tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePostRepository;

#[async_trait]
impl PostRepository for FixturePostRepository {
    async fn create(&self, post: &NewPost) -> Result<Post, PostPersistenceError> {
        let now = chrono::Utc::now();
        Ok(Post::new(crate::domain::post::PostParts {
            id: post.id,
            author: post.author,
            title: post.title.clone(),
            content: post.content.clone(),
            tags: post.tags.clone(),
            created_at: now,
            updated_at: now,
            version: 1,
        }))
    }

    async fn find_by_id(&self, _id: &Uuid) -> Result<Option<Post>, PostPersistenceError> {
        Ok(None)
    }

    async fn update(
        &self,
        _id: &Uuid,
        _expected_version: i32,
        _changes: &PostChanges,
    ) -> Result<Post, PostPersistenceError> {
        Err(PostPersistenceError::not_found())
    }

    async fn delete(&self, _id: &Uuid) -> Result<(), PostPersistenceError> {
        Err(PostPersistenceError::not_found())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::AccountId;
    use crate::domain::post::{PostContent, PostTitle, TagSet};

    #[tokio::test]
    async fn fixture_creates_at_version_one_and_finds_nothing() {
        let repo = FixturePostRepository;
        let candidate = NewPost {
            id: Uuid::new_v4(),
            author: AccountId::random(),
            title: PostTitle::new("T").expect("valid title"),
            content: PostContent::new("C").expect("valid content"),
            tags: TagSet::default(),
        };

        let created = repo.create(&candidate).await.expect("fixture create");
        assert_eq!(created.version(), 1);

        let found = repo.find_by_id(&candidate.id).await.expect("fixture find");
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn fixture_mutations_report_not_found() {
        let repo = FixturePostRepository;
        assert_eq!(
            repo.delete(&Uuid::new_v4()).await.expect_err("no post"),
            PostPersistenceError::NotFound
        );
    }
}
