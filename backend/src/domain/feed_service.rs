//! Feed service: validates query inputs, then delegates to the read-only
//! feed repository.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::feed::FeedParams;
use crate::domain::ports::{
    FeedItemPayload, FeedPersistenceError, FeedQuery, FeedRepository, GetFeedRequest,
};

fn map_feed_error(error: FeedPersistenceError) -> Error {
    match error {
        FeedPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("feed store unavailable: {message}"))
        }
        FeedPersistenceError::Query { message } => {
            Error::internal(format!("feed store error: {message}"))
        }
    }
}

/// Service producing feed pages.
#[derive(Clone)]
pub struct FeedService {
    feed: Arc<dyn FeedRepository>,
}

impl FeedService {
    /// Create the service with its repository.
    pub fn new(feed: Arc<dyn FeedRepository>) -> Self {
        Self { feed }
    }
}

#[async_trait]
impl FeedQuery for FeedService {
    async fn get_feed(&self, request: GetFeedRequest) -> Result<Vec<FeedItemPayload>, Error> {
        let params = FeedParams::new(
            request.limit,
            request.offset,
            &request.sort,
            request.tags,
            request.search,
        )
        .map_err(|err| Error::invalid_request(err.to_string()))?;

        let items = self
            .feed
            .user_feed(&request.viewer, &params)
            .await
            .map_err(map_feed_error)?;

        Ok(items.into_iter().map(FeedItemPayload::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::AccountId;
    use crate::domain::error::ErrorCode;
    use crate::domain::feed::{FeedItem, SortOrder};
    use crate::domain::ports::MockFeedRepository;
    use crate::domain::post::{Post, PostContent, PostParts, PostTitle, TagSet};
    use chrono::Utc;
    use rstest::rstest;
    use uuid::Uuid;

    fn request(limit: i64, offset: i64, sort: &str) -> GetFeedRequest {
        GetFeedRequest {
            viewer: AccountId::random(),
            limit,
            offset,
            sort: sort.to_owned(),
            tags: Vec::new(),
            search: String::new(),
        }
    }

    fn feed_item(author_username: &str, comments_count: i64) -> FeedItem {
        let now = Utc::now();
        FeedItem {
            post: Post::new(PostParts {
                id: Uuid::new_v4(),
                author: AccountId::random(),
                title: PostTitle::new("T").expect("valid title"),
                content: PostContent::new("C").expect("valid content"),
                tags: TagSet::default(),
                created_at: now,
                updated_at: now,
                version: 1,
            }),
            author_username: author_username.to_owned(),
            comments_count,
        }
    }

    #[rstest]
    #[case(21, 0, "desc")]
    #[case(0, 0, "desc")]
    #[case(10, -1, "desc")]
    #[case(10, 0, "upward")]
    #[tokio::test]
    async fn invalid_parameters_never_reach_the_store(
        #[case] limit: i64,
        #[case] offset: i64,
        #[case] sort: &str,
    ) {
        let mut feed = MockFeedRepository::new();
        feed.expect_user_feed().times(0);

        let error = FeedService::new(Arc::new(feed))
            .get_feed(request(limit, offset, sort))
            .await
            .expect_err("invalid parameters");

        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn validated_parameters_are_forwarded() {
        let mut feed = MockFeedRepository::new();
        feed.expect_user_feed()
            .times(1)
            .withf(|_, params| {
                params.limit() == 5
                    && params.offset() == 10
                    && params.sort() == SortOrder::Asc
            })
            .returning(|_, _| Ok(vec![]));

        let items = FeedService::new(Arc::new(feed))
            .get_feed(request(5, 10, "asc"))
            .await
            .expect("valid query");

        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn rows_carry_author_and_comment_count() {
        let mut feed = MockFeedRepository::new();
        feed.expect_user_feed()
            .times(1)
            .returning(|_, _| Ok(vec![feed_item("alice", 3), feed_item("bob", 0)]));

        let items = FeedService::new(Arc::new(feed))
            .get_feed(request(20, 0, "desc"))
            .await
            .expect("valid query");

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].author, "alice");
        assert_eq!(items[0].comments_count, 3);
        assert_eq!(items[1].comments_count, 0);
    }

    #[tokio::test]
    async fn store_failures_map_to_service_unavailable() {
        let mut feed = MockFeedRepository::new();
        feed.expect_user_feed()
            .times(1)
            .returning(|_, _| Err(FeedPersistenceError::connection("timed out")));

        let error = FeedService::new(Arc::new(feed))
            .get_feed(request(20, 0, "desc"))
            .await
            .expect_err("store down");

        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    }
}
