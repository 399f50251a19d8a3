//! Driving port for post and comment mutations, plus the serialisable post
//! payloads shared with queries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::account::{AccountId, Actor};
use crate::domain::comment::Comment;
use crate::domain::error::Error;
use crate::domain::post::Post;

/// Outward post representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostPayload {
    pub id: Uuid,
    #[schema(value_type = uuid::Uuid)]
    pub user_id: AccountId,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: i32,
}

impl From<Post> for PostPayload {
    fn from(value: Post) -> Self {
        Self {
            id: value.id(),
            user_id: *value.author(),
            title: value.title().as_str().to_owned(),
            content: value.content().as_str().to_owned(),
            tags: value.tags().to_vec(),
            created_at: value.created_at(),
            updated_at: value.updated_at(),
            version: value.version(),
        }
    }
}

/// Outward comment representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentPayload {
    pub id: Uuid,
    pub post_id: Uuid,
    #[schema(value_type = uuid::Uuid)]
    pub user_id: AccountId,
    #[schema(example = "alice")]
    pub author: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<Comment> for CommentPayload {
    fn from(value: Comment) -> Self {
        Self {
            id: value.id,
            post_id: value.post_id,
            user_id: value.author,
            author: value.author_username,
            content: value.content,
            created_at: value.created_at,
        }
    }
}

/// Input for creating a post.
#[derive(Debug, Clone)]
pub struct CreatePostRequest {
    pub author: AccountId,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
}

/// Input for a versioned partial update.
///
/// `expected_version` is the version the caller last read; a stale value is
/// rejected, never merged.
#[derive(Debug, Clone)]
pub struct UpdatePostRequest {
    pub actor: Actor,
    pub post_id: Uuid,
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub expected_version: i32,
}

/// Input for deleting a post.
#[derive(Debug, Clone, Copy)]
pub struct DeletePostRequest {
    pub actor: Actor,
    pub post_id: Uuid,
}

/// Input for commenting on a post.
#[derive(Debug, Clone)]
pub struct AddCommentRequest {
    pub author: AccountId,
    pub post_id: Uuid,
    pub content: String,
}

/// Driving port for post mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostsCommand: Send + Sync {
    /// Create a post owned by the author; version starts at 1.
    async fn create_post(&self, request: CreatePostRequest) -> Result<PostPayload, Error>;

    /// Apply a partial update guarded by the expected version.
    async fn update_post(&self, request: UpdatePostRequest) -> Result<PostPayload, Error>;

    /// Hard-delete a post.
    async fn delete_post(&self, request: DeletePostRequest) -> Result<(), Error>;

    /// Attach a comment to an existing post.
    async fn add_comment(&self, request: AddCommentRequest) -> Result<CommentPayload, Error>;
}

/// Fixture command rejecting every mutation.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePostsCommand;

#[async_trait]
impl PostsCommand for FixturePostsCommand {
    async fn create_post(&self, _request: CreatePostRequest) -> Result<PostPayload, Error> {
        Err(Error::service_unavailable("post store not configured"))
    }

    async fn update_post(&self, request: UpdatePostRequest) -> Result<PostPayload, Error> {
        Err(Error::not_found(format!("post {} not found", request.post_id)))
    }

    async fn delete_post(&self, request: DeletePostRequest) -> Result<(), Error> {
        Err(Error::not_found(format!("post {} not found", request.post_id)))
    }

    async fn add_comment(&self, request: AddCommentRequest) -> Result<CommentPayload, Error> {
        Err(Error::not_found(format!("post {} not found", request.post_id)))
    }
}
