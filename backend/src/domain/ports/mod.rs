//! Domain ports defining the edges of the hexagon.
//!
//! Driven ports describe how the domain reaches databases, caches, and mail
//! delivery; driving ports are the use-case surface inbound adapters depend
//! on. Each driven port exposes strongly typed errors so adapters map their
//! failures into predictable variants.

mod macros;
pub(crate) use macros::define_port_error;

mod account_repository;
mod accounts_command;
mod accounts_query;
mod comment_repository;
mod feed_query;
mod feed_repository;
mod follow_command;
mod follow_repository;
mod login_service;
mod mailer;
mod post_repository;
mod posts_command;
mod posts_query;
mod profile_cache;
mod role_repository;

#[cfg(test)]
pub use account_repository::MockAccountRepository;
pub use account_repository::{
    AccountPersistenceError, AccountRepository, FixtureAccountRepository,
};
#[cfg(test)]
pub use accounts_command::MockAccountsCommand;
pub use accounts_command::{
    AccountsCommand, FixtureAccountsCommand, RegisterAccountRequest, RegisteredAccount,
};
#[cfg(test)]
pub use accounts_query::MockAccountsQuery;
pub use accounts_query::{AccountProfile, AccountsQuery, FixtureAccountsQuery, RolePayload};
#[cfg(test)]
pub use comment_repository::MockCommentRepository;
pub use comment_repository::{
    CommentPersistenceError, CommentRepository, FixtureCommentRepository,
};
#[cfg(test)]
pub use feed_query::MockFeedQuery;
pub use feed_query::{FeedItemPayload, FeedQuery, FixtureFeedQuery, GetFeedRequest};
#[cfg(test)]
pub use feed_repository::MockFeedRepository;
pub use feed_repository::{FeedPersistenceError, FeedRepository, FixtureFeedRepository};
#[cfg(test)]
pub use follow_command::MockFollowCommand;
pub use follow_command::{FixtureFollowCommand, FollowCommand, FollowRequest};
#[cfg(test)]
pub use follow_repository::MockFollowRepository;
pub use follow_repository::{FixtureFollowRepository, FollowPersistenceError, FollowRepository};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{FixtureLoginService, LoginService};
#[cfg(test)]
pub use mailer::MockWelcomeMailer;
pub use mailer::{FixtureWelcomeMailer, MailerError, WelcomeEmail, WelcomeMailer};
#[cfg(test)]
pub use post_repository::MockPostRepository;
pub use post_repository::{FixturePostRepository, PostPersistenceError, PostRepository};
#[cfg(test)]
pub use posts_command::MockPostsCommand;
pub use posts_command::{
    AddCommentRequest, CommentPayload, CreatePostRequest, DeletePostRequest, FixturePostsCommand,
    PostPayload, PostsCommand, UpdatePostRequest,
};
#[cfg(test)]
pub use posts_query::MockPostsQuery;
pub use posts_query::{FixturePostsQuery, PostWithComments, PostsQuery};
#[cfg(test)]
pub use profile_cache::MockProfileCache;
pub use profile_cache::{NoopProfileCache, ProfileCache, ProfileCacheError};
#[cfg(test)]
pub use role_repository::MockRoleRepository;
pub use role_repository::{FixtureRoleRepository, RolePersistenceError, RoleRepository};
