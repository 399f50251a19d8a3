//! Wiring from outbound adapters to the HTTP port bundle.

use std::sync::Arc;

use crate::domain::ports::{ProfileCache, WelcomeMailer};
use crate::domain::{
    AccountService, AccountServiceConfig, FeedService, FollowService, PostAuthorizationConfig,
    PostService,
};
use crate::inbound::http::state::HttpState;
use crate::outbound::persistence::{
    DbPool, DieselAccountRepository, DieselCommentRepository, DieselFeedRepository,
    DieselFollowRepository, DieselPostRepository, DieselRoleRepository,
};
use crate::server::config::AppConfig;

/// Build the full HTTP state against PostgreSQL-backed repositories.
pub fn build_http_state(
    pool: DbPool,
    cache: Arc<dyn ProfileCache>,
    mailer: Arc<dyn WelcomeMailer>,
    config: &AppConfig,
) -> HttpState {
    let account_service = Arc::new(AccountService::new(
        Arc::new(DieselAccountRepository::new(pool.clone())),
        cache,
        mailer,
        AccountServiceConfig {
            invitation_ttl: config.invitation_ttl,
            activation_base_url: config.activation_base_url.clone(),
        },
    ));

    let post_service = Arc::new(PostService::new(
        Arc::new(DieselPostRepository::new(pool.clone())),
        Arc::new(DieselCommentRepository::new(pool.clone())),
        Arc::new(DieselRoleRepository::new(pool.clone())),
        PostAuthorizationConfig::default(),
    ));

    HttpState {
        accounts: account_service.clone(),
        accounts_query: account_service.clone(),
        login: account_service,
        follows: Arc::new(FollowService::new(
            Arc::new(DieselFollowRepository::new(pool.clone())),
            config.self_follow,
        )),
        posts: post_service.clone(),
        posts_query: post_service,
        feed: Arc::new(FeedService::new(Arc::new(DieselFeedRepository::new(pool)))),
    }
}
