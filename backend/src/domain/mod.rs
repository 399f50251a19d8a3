//! Domain entities, ports, and services.
//!
//! Everything here is transport and storage agnostic: inbound adapters talk
//! to the driving ports, outbound adapters implement the driven ports, and
//! the services in between own the business rules.

pub mod account;
pub mod account_service;
pub mod activation;
pub mod comment;
pub mod credentials;
pub mod error;
pub mod feed;
pub mod feed_service;
pub mod follow_service;
pub mod ports;
pub mod post;
pub mod post_service;

pub use self::account::{
    Account, AccountId, AccountParts, AccountValidationError, Actor, EmailAddress, NewAccount,
    Role, Username,
};
pub use self::account_service::{AccountService, AccountServiceConfig};
pub use self::activation::{ActivationToken, TokenHash};
pub use self::comment::{Comment, CommentContent, CommentValidationError, NewComment};
pub use self::credentials::{
    CredentialError, LoginCredentials, PasswordHash, PlainPassword,
};
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::feed::{FeedItem, FeedParams, FeedValidationError, SortOrder};
pub use self::feed_service::FeedService;
pub use self::follow_service::{FollowService, SelfFollowPolicy};
pub use self::post::{
    NewPost, Post, PostChanges, PostContent, PostParts, PostTitle, PostValidationError, TagSet,
};
pub use self::post_service::{PostAuthorizationConfig, PostService};
