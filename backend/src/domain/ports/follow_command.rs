//! Driving port for follow graph mutations.

use async_trait::async_trait;

use crate::domain::account::AccountId;
use crate::domain::error::Error;

/// Ordered follower/followed pair for a follow mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowRequest {
    pub follower: AccountId,
    pub followed: AccountId,
}

/// Driving port for creating and removing follow edges.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FollowCommand: Send + Sync {
    /// Create the edge. An existing edge is a `Conflict` ("already
    /// following"), not a fatal error.
    async fn follow(&self, request: FollowRequest) -> Result<(), Error>;

    /// Remove the edge; removing a missing edge succeeds.
    async fn unfollow(&self, request: FollowRequest) -> Result<(), Error>;
}

/// Fixture command accepting every mutation.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureFollowCommand;

#[async_trait]
impl FollowCommand for FixtureFollowCommand {
    async fn follow(&self, _request: FollowRequest) -> Result<(), Error> {
        Ok(())
    }

    async fn unfollow(&self, _request: FollowRequest) -> Result<(), Error> {
        Ok(())
    }
}
