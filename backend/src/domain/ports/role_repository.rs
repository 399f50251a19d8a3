//! Port for reading role definitions used in precedence checks.

use async_trait::async_trait;

use crate::domain::account::Role;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by role repository adapters.
    pub enum RolePersistenceError {
        /// Repository connection could not be established or timed out.
        Connection { message: String } =>
            "role repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } =>
            "role repository query failed: {message}",
    }
}

/// Port resolving roles by name.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Fetch a role definition by its unique name.
    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, RolePersistenceError>;
}

/// Fixture implementation resolving no roles.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRoleRepository;

#[async_trait]
impl RoleRepository for FixtureRoleRepository {
    async fn find_by_name(&self, _name: &str) -> Result<Option<Role>, RolePersistenceError> {
        Ok(None)
    }
}
