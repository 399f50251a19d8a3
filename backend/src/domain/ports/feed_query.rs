//! Driving port for the personalised feed.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::account::AccountId;
use crate::domain::error::Error;
use crate::domain::feed::FeedItem;

use super::posts_command::PostPayload;

/// Raw feed query inputs; validated by the domain service before any storage
/// access.
#[derive(Debug, Clone)]
pub struct GetFeedRequest {
    pub viewer: AccountId,
    pub limit: i64,
    pub offset: i64,
    pub sort: String,
    pub tags: Vec<String>,
    pub search: String,
}

/// One feed row returned to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedItemPayload {
    #[serde(flatten)]
    pub post: PostPayload,
    #[schema(example = "alice")]
    pub author: String,
    pub comments_count: i64,
}

impl From<FeedItem> for FeedItemPayload {
    fn from(value: FeedItem) -> Self {
        Self {
            post: PostPayload::from(value.post),
            author: value.author_username,
            comments_count: value.comments_count,
        }
    }
}

/// Driving port producing feed pages.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedQuery: Send + Sync {
    /// Fetch the viewer's feed page; an empty page is a valid result.
    async fn get_feed(&self, request: GetFeedRequest) -> Result<Vec<FeedItemPayload>, Error>;
}

/// Fixture query returning an empty feed.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureFeedQuery;

#[async_trait]
impl FeedQuery for FixtureFeedQuery {
    async fn get_feed(&self, _request: GetFeedRequest) -> Result<Vec<FeedItemPayload>, Error> {
        Ok(Vec::new())
    }
}
