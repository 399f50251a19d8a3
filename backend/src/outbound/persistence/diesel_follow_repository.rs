//! PostgreSQL-backed `FollowRepository` implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::account::AccountId;
use crate::domain::ports::{FollowPersistenceError, FollowRepository};

use super::error_mapping::{map_diesel_error, map_pool_error, unique_violation_constraint};
use super::models::NewFollowerRow;
use super::pool::{DbPool, PoolError};
use super::schema::followers;
use super::timeout::{QUERY_TIMEOUT_MESSAGE, bounded};

/// Diesel-backed implementation of the follow graph port.
#[derive(Clone)]
pub struct DieselFollowRepository {
    pool: DbPool,
}

impl DieselFollowRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> FollowPersistenceError {
    map_pool_error(error, |message| FollowPersistenceError::connection(message))
}

fn timeout_error() -> FollowPersistenceError {
    FollowPersistenceError::connection(QUERY_TIMEOUT_MESSAGE)
}

/// Only a unique violation means "already following"; everything else is a
/// real failure and must propagate.
fn map_insert_error(error: diesel::result::Error) -> FollowPersistenceError {
    if unique_violation_constraint(&error).is_some() {
        return FollowPersistenceError::duplicate_edge();
    }
    map_diesel_error(
        error,
        |message| FollowPersistenceError::query(message),
        |message| FollowPersistenceError::connection(message),
    )
}

fn map_query_error(error: diesel::result::Error) -> FollowPersistenceError {
    map_diesel_error(
        error,
        |message| FollowPersistenceError::query(message),
        |message| FollowPersistenceError::connection(message),
    )
}

#[async_trait]
impl FollowRepository for DieselFollowRepository {
    async fn follow(
        &self,
        follower: &AccountId,
        followed: &AccountId,
    ) -> Result<(), FollowPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let edge = NewFollowerRow {
            user_id: *followed.as_uuid(),
            follower_id: *follower.as_uuid(),
        };

        bounded(
            async {
                diesel::insert_into(followers::table)
                    .values(&edge)
                    .execute(&mut conn)
                    .await
                    .map(|_| ())
                    .map_err(map_insert_error)
            },
            timeout_error,
        )
        .await
    }

    async fn unfollow(
        &self,
        follower: &AccountId,
        followed: &AccountId,
    ) -> Result<(), FollowPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        // Zero rows affected is fine: unfollow is idempotent.
        bounded(
            async {
                diesel::delete(
                    followers::table.filter(
                        followers::user_id
                            .eq(*followed.as_uuid())
                            .and(followers::follower_id.eq(*follower.as_uuid())),
                    ),
                )
                .execute(&mut conn)
                .await
                .map(|_| ())
                .map_err(map_query_error)
            },
            timeout_error,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

    use super::*;

    struct EdgeViolation;

    impl DatabaseErrorInformation for EdgeViolation {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            Some("followers")
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            Some("followers_pkey")
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    #[test]
    fn unique_violation_becomes_duplicate_edge() {
        let error = DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new(EdgeViolation),
        );
        assert_eq!(
            map_insert_error(error),
            FollowPersistenceError::DuplicateEdge
        );
    }

    #[test]
    fn foreign_key_violations_are_not_swallowed() {
        let error = DieselError::DatabaseError(
            DatabaseErrorKind::ForeignKeyViolation,
            Box::new("followed account does not exist".to_owned()),
        );
        assert!(matches!(
            map_insert_error(error),
            FollowPersistenceError::Query { .. }
        ));
    }
}
