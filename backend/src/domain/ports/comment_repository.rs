//! Port for comment persistence and per-post listings.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::comment::{Comment, NewComment};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by comment repository adapters.
    pub enum CommentPersistenceError {
        /// Repository connection could not be established or timed out.
        Connection { message: String } =>
            "comment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "comment repository query failed: {message}",
    }
}

/// Port for writing comments and reading them per post.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Insert a comment and return it joined with the author's username.
    async fn create(&self, comment: &NewComment) -> Result<Comment, CommentPersistenceError>;

    /// List a post's comments, newest first.
    async fn list_for_post(
        &self,
        post_id: &Uuid,
    ) -> Result<Vec<Comment>, CommentPersistenceError>;
}

/// Fixture implementation for wiring tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCommentRepository;

#[async_trait]
impl CommentRepository for FixtureCommentRepository {
    async fn create(&self, comment: &NewComment) -> Result<Comment, CommentPersistenceError> {
        Ok(Comment {
            id: comment.id,
            post_id: comment.post_id,
            author: comment.author,
            author_username: String::new(),
            content: comment.content.as_str().to_owned(),
            created_at: chrono::Utc::now(),
        })
    }

    async fn list_for_post(
        &self,
        _post_id: &Uuid,
    ) -> Result<Vec<Comment>, CommentPersistenceError> {
        Ok(Vec::new())
    }
}
