//! Follow graph service.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::ports::{
    FollowCommand, FollowPersistenceError, FollowRepository, FollowRequest,
};

/// Whether an account may follow itself.
///
/// The feed already treats the viewer's own posts as visible, so allowing
/// self-edges is harmless; the policy exists for products that want the
/// graph kept clean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelfFollowPolicy {
    #[default]
    Allow,
    Deny,
}

fn map_follow_error(error: FollowPersistenceError) -> Error {
    match error {
        FollowPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("follow store unavailable: {message}"))
        }
        FollowPersistenceError::Query { message } => {
            Error::internal(format!("follow store error: {message}"))
        }
        FollowPersistenceError::DuplicateEdge => {
            Error::conflict("already following this account")
        }
    }
}

/// Service owning follow edge mutations.
#[derive(Clone)]
pub struct FollowService {
    follows: Arc<dyn FollowRepository>,
    self_follow: SelfFollowPolicy,
}

impl FollowService {
    /// Create the service with its repository and self-follow policy.
    pub fn new(follows: Arc<dyn FollowRepository>, self_follow: SelfFollowPolicy) -> Self {
        Self {
            follows,
            self_follow,
        }
    }
}

#[async_trait]
impl FollowCommand for FollowService {
    async fn follow(&self, request: FollowRequest) -> Result<(), Error> {
        if request.follower == request.followed
            && self.self_follow == SelfFollowPolicy::Deny
        {
            return Err(Error::invalid_request("an account cannot follow itself"));
        }

        self.follows
            .follow(&request.follower, &request.followed)
            .await
            .map_err(map_follow_error)
    }

    async fn unfollow(&self, request: FollowRequest) -> Result<(), Error> {
        self.follows
            .unfollow(&request.follower, &request.followed)
            .await
            .map_err(map_follow_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::AccountId;
    use crate::domain::error::ErrorCode;
    use crate::domain::ports::MockFollowRepository;

    fn request() -> FollowRequest {
        FollowRequest {
            follower: AccountId::random(),
            followed: AccountId::random(),
        }
    }

    #[tokio::test]
    async fn duplicate_edge_becomes_conflict() {
        let mut follows = MockFollowRepository::new();
        follows
            .expect_follow()
            .times(1)
            .returning(|_, _| Err(FollowPersistenceError::duplicate_edge()));

        let service = FollowService::new(Arc::new(follows), SelfFollowPolicy::Allow);
        let error = service.follow(request()).await.expect_err("already following");

        assert_eq!(error.code(), ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn non_duplicate_failures_are_not_swallowed() {
        let mut follows = MockFollowRepository::new();
        follows
            .expect_follow()
            .times(1)
            .returning(|_, _| Err(FollowPersistenceError::query("fk violation")));

        let service = FollowService::new(Arc::new(follows), SelfFollowPolicy::Allow);
        let error = service.follow(request()).await.expect_err("query failure");

        assert_eq!(error.code(), ErrorCode::InternalError);
    }

    #[tokio::test]
    async fn unfollowing_a_missing_edge_succeeds() {
        let mut follows = MockFollowRepository::new();
        follows.expect_unfollow().times(1).returning(|_, _| Ok(()));

        let service = FollowService::new(Arc::new(follows), SelfFollowPolicy::Allow);
        service.unfollow(request()).await.expect("idempotent unfollow");
    }

    #[tokio::test]
    async fn self_follow_respects_policy() {
        let id = AccountId::random();
        let self_request = FollowRequest {
            follower: id,
            followed: id,
        };

        let mut denying = MockFollowRepository::new();
        denying.expect_follow().times(0);
        let service = FollowService::new(Arc::new(denying), SelfFollowPolicy::Deny);
        let error = service
            .follow(self_request)
            .await
            .expect_err("self follow denied");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);

        let mut allowing = MockFollowRepository::new();
        allowing.expect_follow().times(1).returning(|_, _| Ok(()));
        let service = FollowService::new(Arc::new(allowing), SelfFollowPolicy::Allow);
        service.follow(self_request).await.expect("self follow allowed");
    }

    #[tokio::test]
    async fn connection_failures_surface_as_service_unavailable() {
        let mut follows = MockFollowRepository::new();
        follows
            .expect_unfollow()
            .times(1)
            .returning(|_, _| Err(FollowPersistenceError::connection("pool exhausted")));

        let service = FollowService::new(Arc::new(follows), SelfFollowPolicy::Allow);
        let error = service.unfollow(request()).await.expect_err("store down");

        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    }
}
