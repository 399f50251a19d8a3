//! Driving port for the account lifecycle: registration and activation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::error::Error;

use super::accounts_query::AccountProfile;

/// Registration input as received from the transport layer; field validation
/// happens inside the domain service.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAccountRequest {
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "alice@example.com")]
    pub email: String,
    pub password: String,
}

/// Registration result: the created profile plus the one-time plaintext
/// activation token. Only this response ever carries the plaintext.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredAccount {
    pub account: AccountProfile,
    pub activation_token: String,
}

/// Driving port for account lifecycle mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountsCommand: Send + Sync {
    /// Register a new account and issue its activation token.
    async fn register(&self, request: RegisterAccountRequest) -> Result<RegisteredAccount, Error>;

    /// Consume an activation token, transitioning its account to active.
    async fn activate(&self, token: String) -> Result<(), Error>;
}

/// Fixture command rejecting every registration.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAccountsCommand;

#[async_trait]
impl AccountsCommand for FixtureAccountsCommand {
    async fn register(
        &self,
        _request: RegisterAccountRequest,
    ) -> Result<RegisteredAccount, Error> {
        Err(Error::service_unavailable("account store not configured"))
    }

    async fn activate(&self, _token: String) -> Result<(), Error> {
        Err(Error::not_found("invalid or expired activation token"))
    }
}
