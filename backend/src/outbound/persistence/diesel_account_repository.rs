//! PostgreSQL-backed `AccountRepository` implementation using Diesel.
//!
//! Registration and activation each run as one transaction so no partial
//! state (account without invitation, active account with live tokens) is
//! ever observable to other workers.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use diesel::prelude::*;
use diesel_async::AsyncConnection as _;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt as _;

use crate::domain::account::{
    Account, AccountId, AccountParts, EmailAddress, NewAccount, Role, Username,
};
use crate::domain::activation::TokenHash;
use crate::domain::credentials::PasswordHash;
use crate::domain::ports::{AccountPersistenceError, AccountRepository};

use super::error_mapping::{map_diesel_error, map_pool_error, unique_violation_constraint};
use super::models::{NewInvitationRow, NewUserRow, RoleRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{roles, user_invitations, users};
use super::timeout::{QUERY_TIMEOUT_MESSAGE, bounded};

const EMAIL_CONSTRAINT: &str = "users_email_key";
const USERNAME_CONSTRAINT: &str = "users_username_key";

/// Diesel-backed implementation of the account repository port.
#[derive(Clone)]
pub struct DieselAccountRepository {
    pool: DbPool,
}

impl DieselAccountRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> AccountPersistenceError {
    map_pool_error(error, |message| {
        AccountPersistenceError::connection(message)
    })
}

fn timeout_error() -> AccountPersistenceError {
    AccountPersistenceError::connection(QUERY_TIMEOUT_MESSAGE)
}

impl From<diesel::result::Error> for AccountPersistenceError {
    fn from(error: diesel::result::Error) -> Self {
        match unique_violation_constraint(&error) {
            Some(EMAIL_CONSTRAINT) => Self::DuplicateEmail,
            Some(USERNAME_CONSTRAINT) => Self::DuplicateUsername,
            _ => map_diesel_error(
                error,
                |message| Self::query(message),
                |message| Self::connection(message),
            ),
        }
    }
}

/// Convert a database row into a validated domain account.
fn row_to_account(
    row: UserRow,
    role: Option<RoleRow>,
) -> Result<Account, AccountPersistenceError> {
    let username = Username::new(row.username)
        .map_err(|err| AccountPersistenceError::query(err.to_string()))?;
    let email = EmailAddress::new(row.email)
        .map_err(|err| AccountPersistenceError::query(err.to_string()))?;

    Ok(Account::new(AccountParts {
        id: AccountId::from_uuid(row.id),
        username,
        email,
        password_hash: PasswordHash::from_stored(row.password_hash),
        is_active: row.is_active,
        created_at: row.created_at,
        role: role.map(|row| Role {
            name: row.name,
            description: row.description,
            level: row.level,
        }),
    }))
}

#[async_trait]
impl AccountRepository for DieselAccountRepository {
    async fn create_with_invitation(
        &self,
        account: &NewAccount,
        token_hash: &TokenHash,
        invitation_ttl: Duration,
    ) -> Result<Account, AccountPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let new_user = NewUserRow {
            id: *account.id.as_uuid(),
            username: account.username.as_str().to_owned(),
            email: account.email.as_str().to_owned(),
            password_hash: account.password_hash.as_str().to_owned(),
        };
        let invitation = NewInvitationRow {
            token_hash: token_hash.as_str().to_owned(),
            user_id: new_user.id,
            expiry: Utc::now() + invitation_ttl,
        };

        let row = bounded(
            conn.transaction(|conn| {
                async move {
                    let row = diesel::insert_into(users::table)
                        .values(&new_user)
                        .returning(UserRow::as_returning())
                        .get_result::<UserRow>(conn)
                        .await?;

                    diesel::insert_into(user_invitations::table)
                        .values(&invitation)
                        .execute(conn)
                        .await?;

                    Ok::<UserRow, AccountPersistenceError>(row)
                }
                .scope_boxed()
            }),
            timeout_error,
        )
        .await?;

        row_to_account(row, None)
    }

    async fn activate(&self, token_hash: &TokenHash) -> Result<(), AccountPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let token_hash = token_hash.as_str().to_owned();

        bounded(
            conn.transaction(|conn| {
                async move {
                    let invited: Option<UserRow> = users::table
                        .inner_join(user_invitations::table)
                        .filter(user_invitations::token_hash.eq(token_hash.as_str()))
                        .filter(user_invitations::expiry.gt(Utc::now()))
                        .select(UserRow::as_select())
                        .first::<UserRow>(conn)
                        .await
                        .optional()?;

                    let Some(user) = invited else {
                        return Err(AccountPersistenceError::not_found());
                    };

                    diesel::update(users::table.find(user.id))
                        .set(users::is_active.eq(true))
                        .execute(conn)
                        .await?;

                    // All invitations for the account go, not just the one
                    // consumed; stale tokens from repeated registrations must
                    // never activate the account later.
                    diesel::delete(
                        user_invitations::table.filter(user_invitations::user_id.eq(user.id)),
                    )
                    .execute(conn)
                    .await?;

                    Ok(())
                }
                .scope_boxed()
            }),
            timeout_error,
        )
        .await
    }

    async fn find_active_by_id(
        &self,
        id: &AccountId,
    ) -> Result<Option<Account>, AccountPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let found: Option<(UserRow, Option<RoleRow>)> = bounded(
            async {
                users::table
                    .left_join(roles::table)
                    .filter(users::id.eq(*id.as_uuid()))
                    .filter(users::is_active.eq(true))
                    .select((UserRow::as_select(), Option::<RoleRow>::as_select()))
                    .first(&mut conn)
                    .await
                    .optional()
                    .map_err(AccountPersistenceError::from)
            },
            timeout_error,
        )
        .await?;

        found.map(|(row, role)| row_to_account(row, role)).transpose()
    }

    async fn find_active_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Account>, AccountPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let found: Option<(UserRow, Option<RoleRow>)> = bounded(
            async {
                users::table
                    .left_join(roles::table)
                    .filter(users::email.eq(email.as_str()))
                    .filter(users::is_active.eq(true))
                    .select((UserRow::as_select(), Option::<RoleRow>::as_select()))
                    .first(&mut conn)
                    .await
                    .optional()
                    .map_err(AccountPersistenceError::from)
            },
            timeout_error,
        )
        .await?;

        found.map(|(row, role)| row_to_account(row, role)).transpose()
    }

    async fn delete(&self, id: &AccountId) -> Result<(), AccountPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let affected = bounded(
            async {
                diesel::delete(users::table.find(*id.as_uuid()))
                    .execute(&mut conn)
                    .await
                    .map_err(AccountPersistenceError::from)
            },
            timeout_error,
        )
        .await?;

        if affected == 0 {
            return Err(AccountPersistenceError::not_found());
        }
        Ok(())
    }
}
