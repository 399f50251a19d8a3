//! PostgreSQL persistence adapters built on Diesel.

mod diesel_account_repository;
mod diesel_comment_repository;
mod diesel_feed_repository;
mod diesel_follow_repository;
mod diesel_post_repository;
mod diesel_role_repository;
mod error_mapping;
mod models;
mod pool;
pub mod schema;
mod timeout;

pub use diesel_account_repository::DieselAccountRepository;
pub use diesel_comment_repository::DieselCommentRepository;
pub use diesel_feed_repository::DieselFeedRepository;
pub use diesel_follow_repository::DieselFollowRepository;
pub use diesel_post_repository::DieselPostRepository;
pub use diesel_role_repository::DieselRoleRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
