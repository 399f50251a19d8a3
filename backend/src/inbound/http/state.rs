//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on the driving ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountsCommand, AccountsQuery, FeedQuery, FixtureAccountsCommand, FixtureAccountsQuery,
    FixtureFeedQuery, FixtureFollowCommand, FixtureLoginService, FixturePostsCommand,
    FixturePostsQuery, FollowCommand, LoginService, PostsCommand, PostsQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountsCommand>,
    pub accounts_query: Arc<dyn AccountsQuery>,
    pub login: Arc<dyn LoginService>,
    pub follows: Arc<dyn FollowCommand>,
    pub posts: Arc<dyn PostsCommand>,
    pub posts_query: Arc<dyn PostsQuery>,
    pub feed: Arc<dyn FeedQuery>,
}

impl HttpState {
    /// State backed entirely by fixtures; tests override the ports they
    /// exercise.
    pub fn fixture() -> Self {
        Self {
            accounts: Arc::new(FixtureAccountsCommand),
            accounts_query: Arc::new(FixtureAccountsQuery),
            login: Arc::new(FixtureLoginService),
            follows: Arc::new(FixtureFollowCommand),
            posts: Arc::new(FixturePostsCommand),
            posts_query: Arc::new(FixturePostsQuery),
            feed: Arc::new(FixtureFeedQuery),
        }
    }
}
