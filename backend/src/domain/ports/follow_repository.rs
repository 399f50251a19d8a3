//! Port for the directed follow relation.

use async_trait::async_trait;

use crate::domain::account::AccountId;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by follow graph adapters.
    pub enum FollowPersistenceError {
        /// Repository connection could not be established or timed out.
        Connection { message: String } =>
            "follow repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "follow repository query failed: {message}",
        /// The edge already exists for this ordered pair.
        DuplicateEdge => "follow edge already exists",
    }
}

/// Port maintaining follow edges and their uniqueness invariant.
///
/// Only the unique-violation case maps to `DuplicateEdge`; any other
/// insertion failure must surface as a query or connection error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FollowRepository: Send + Sync {
    /// Insert the edge `follower → followed`.
    async fn follow(
        &self,
        follower: &AccountId,
        followed: &AccountId,
    ) -> Result<(), FollowPersistenceError>;

    /// Delete the edge if present; deleting a missing edge succeeds.
    async fn unfollow(
        &self,
        follower: &AccountId,
        followed: &AccountId,
    ) -> Result<(), FollowPersistenceError>;
}

/// Fixture implementation for wiring tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureFollowRepository;

#[async_trait]
impl FollowRepository for FixtureFollowRepository {
    async fn follow(
        &self,
        _follower: &AccountId,
        _followed: &AccountId,
    ) -> Result<(), FollowPersistenceError> {
        Ok(())
    }

    async fn unfollow(
        &self,
        _follower: &AccountId,
        _followed: &AccountId,
    ) -> Result<(), FollowPersistenceError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixture_accepts_both_mutations() {
        let repo = FixtureFollowRepository;
        let a = AccountId::random();
        let b = AccountId::random();

        repo.follow(&a, &b).await.expect("fixture follow");
        repo.unfollow(&a, &b).await.expect("fixture unfollow");
    }

    #[test]
    fn duplicate_edge_has_a_stable_message() {
        assert_eq!(
            FollowPersistenceError::duplicate_edge().to_string(),
            "follow edge already exists"
        );
    }
}
