//! PostgreSQL-backed `RoleRepository` implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::account::Role;
use crate::domain::ports::{RolePersistenceError, RoleRepository};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::RoleRow;
use super::pool::{DbPool, PoolError};
use super::schema::roles;
use super::timeout::{QUERY_TIMEOUT_MESSAGE, bounded};

/// Diesel-backed implementation of the role repository port.
#[derive(Clone)]
pub struct DieselRoleRepository {
    pool: DbPool,
}

impl DieselRoleRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> RolePersistenceError {
    map_pool_error(error, |message| RolePersistenceError::connection(message))
}

fn timeout_error() -> RolePersistenceError {
    RolePersistenceError::connection(QUERY_TIMEOUT_MESSAGE)
}

fn map_diesel(error: diesel::result::Error) -> RolePersistenceError {
    map_diesel_error(
        error,
        |message| RolePersistenceError::query(message),
        |message| RolePersistenceError::connection(message),
    )
}

#[async_trait]
impl RoleRepository for DieselRoleRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, RolePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row = bounded(
            async {
                roles::table
                    .filter(roles::name.eq(name))
                    .select(RoleRow::as_select())
                    .first::<RoleRow>(&mut conn)
                    .await
                    .optional()
                    .map_err(map_diesel)
            },
            timeout_error,
        )
        .await?;

        Ok(row.map(|row| Role {
            name: row.name,
            description: row.description,
            level: row.level,
        }))
    }
}
