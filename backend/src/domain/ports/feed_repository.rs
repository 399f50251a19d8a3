//! Port for the read-only feed query.

use async_trait::async_trait;

use crate::domain::account::AccountId;
use crate::domain::feed::{FeedItem, FeedParams};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by feed query adapters.
    pub enum FeedPersistenceError {
        /// Repository connection could not be established or timed out.
        Connection { message: String } =>
            "feed repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } =>
            "feed repository query failed: {message}",
    }
}

/// Port producing the viewer's feed page in one composed query.
///
/// Implementations never mutate; they read across posts, the follow graph,
/// and comment aggregates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedRepository: Send + Sync {
    /// Fetch the page of posts visible to `viewer` under `params`.
    async fn user_feed(
        &self,
        viewer: &AccountId,
        params: &FeedParams,
    ) -> Result<Vec<FeedItem>, FeedPersistenceError>;
}

/// Fixture implementation returning an empty feed.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureFeedRepository;

#[async_trait]
impl FeedRepository for FixtureFeedRepository {
    async fn user_feed(
        &self,
        _viewer: &AccountId,
        _params: &FeedParams,
    ) -> Result<Vec<FeedItem>, FeedPersistenceError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixture_feed_is_empty() {
        let repo = FixtureFeedRepository;
        let params = FeedParams::new(20, 0, "desc", Vec::new(), String::new())
            .expect("valid params");

        let page = repo
            .user_feed(&AccountId::random(), &params)
            .await
            .expect("fixture feed");
        assert!(page.is_empty());
    }
}
