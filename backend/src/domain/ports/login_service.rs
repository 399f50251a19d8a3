//! Driving port for credential authentication.

use async_trait::async_trait;

use crate::domain::account::AccountId;
use crate::domain::credentials::LoginCredentials;
use crate::domain::error::Error;

/// Driving port verifying login credentials.
///
/// Failures are uniformly `Unauthorized`: callers cannot tell a wrong
/// password from an unknown or inactive account.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Authenticate and return the account id on success.
    async fn authenticate(&self, credentials: LoginCredentials) -> Result<AccountId, Error>;
}

/// Fixture login service rejecting all credentials.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(&self, _credentials: LoginCredentials) -> Result<AccountId, Error> {
        Err(Error::unauthorized("invalid email or password"))
    }
}
