//! Driving port for account lookups and the serialisable profile payload.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::account::{Account, AccountId, Actor, EmailAddress, Role, Username};
use crate::domain::error::Error;

/// Role fields exposed on profiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RolePayload {
    pub name: String,
    pub level: i32,
}

impl From<Role> for RolePayload {
    fn from(value: Role) -> Self {
        Self {
            name: value.name,
            level: value.level,
        }
    }
}

/// Outward account representation.
///
/// Deliberately has no credential field; this is the only account shape that
/// crosses the domain boundary (HTTP responses and the profile cache).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountProfile {
    #[schema(value_type = uuid::Uuid)]
    pub id: AccountId,
    #[schema(value_type = String, example = "alice")]
    pub username: Username,
    #[schema(value_type = String, example = "alice@example.com")]
    pub email: EmailAddress,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<RolePayload>,
}

impl AccountProfile {
    /// Actor view of this profile for authorisation checks.
    pub fn actor(&self) -> Actor {
        Actor {
            id: self.id,
            role_level: self.role.as_ref().map_or(0, |role| role.level),
        }
    }
}

impl From<Account> for AccountProfile {
    fn from(value: Account) -> Self {
        Self {
            id: *value.id(),
            username: value.username().clone(),
            email: value.email().clone(),
            is_active: value.is_active(),
            created_at: value.created_at(),
            role: value.role().cloned().map(RolePayload::from),
        }
    }
}

/// Driving port for reading account profiles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountsQuery: Send + Sync {
    /// Fetch the profile of an active account; inactive and missing accounts
    /// are both `NotFound`.
    async fn get_account(&self, id: AccountId) -> Result<AccountProfile, Error>;
}

/// Fixture query that knows no accounts.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAccountsQuery;

#[async_trait]
impl AccountsQuery for FixtureAccountsQuery {
    async fn get_account(&self, id: AccountId) -> Result<AccountProfile, Error> {
        Err(Error::not_found(format!("account {id} not found")))
    }
}
