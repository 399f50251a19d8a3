//! Driving port for post reads.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::error::Error;

use super::posts_command::{CommentPayload, PostPayload};

/// A post together with its comments, newest comment first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostWithComments {
    #[serde(flatten)]
    pub post: PostPayload,
    pub comments: Vec<CommentPayload>,
}

/// Driving port for reading posts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostsQuery: Send + Sync {
    /// Fetch a post and its comments.
    async fn get_post(&self, id: Uuid) -> Result<PostWithComments, Error>;
}

/// Fixture query that knows no posts.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePostsQuery;

#[async_trait]
impl PostsQuery for FixturePostsQuery {
    async fn get_post(&self, id: Uuid) -> Result<PostWithComments, Error> {
        Err(Error::not_found(format!("post {id} not found")))
    }
}
