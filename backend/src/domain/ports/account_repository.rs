//! Port for account persistence, including the transactional
//! registration/activation units.

use async_trait::async_trait;
use chrono::Duration;

use crate::domain::account::{Account, AccountId, EmailAddress, NewAccount};
use crate::domain::activation::TokenHash;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by account repository adapters.
    pub enum AccountPersistenceError {
        /// Repository connection could not be established or timed out.
        Connection { message: String } =>
            "account repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "account repository query failed: {message}",
        /// No matching account (or non-expired invitation) exists.
        NotFound => "account not found",
        /// The email uniqueness constraint was violated.
        DuplicateEmail => "an account with that email already exists",
        /// The username uniqueness constraint was violated.
        DuplicateUsername => "an account with that username already exists",
    }
}

/// Port for durable account records and their invitation lifecycle.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Insert the account row and its invitation row in one atomic unit.
    ///
    /// The invitation expires `invitation_ttl` from now. Uniqueness
    /// violations surface as `DuplicateEmail` / `DuplicateUsername`.
    async fn create_with_invitation(
        &self,
        account: &NewAccount,
        token_hash: &TokenHash,
        invitation_ttl: Duration,
    ) -> Result<Account, AccountPersistenceError>;

    /// Atomically flip the invited account to active and delete all of its
    /// invitations.
    ///
    /// Returns `NotFound` when no invitation matches the hash or the match
    /// has expired; the two cases are indistinguishable by design.
    async fn activate(&self, token_hash: &TokenHash) -> Result<(), AccountPersistenceError>;

    /// Fetch an active account by id. Inactive and missing accounts both
    /// yield `None`.
    async fn find_active_by_id(
        &self,
        id: &AccountId,
    ) -> Result<Option<Account>, AccountPersistenceError>;

    /// Fetch an active account by email. Inactive and missing accounts both
    /// yield `None`.
    async fn find_active_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Account>, AccountPersistenceError>;

    /// Hard-delete an account row. `NotFound` when nothing was deleted.
    async fn delete(&self, id: &AccountId) -> Result<(), AccountPersistenceError>;
}

/// Fixture implementation for wiring tests that never touch accounts.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAccountRepository;

#[async_trait]
impl AccountRepository for FixtureAccountRepository {
    async fn create_with_invitation(
        &self,
        account: &NewAccount,
        _token_hash: &TokenHash,
        _invitation_ttl: Duration,
    ) -> Result<Account, AccountPersistenceError> {
        Ok(crate::domain::account::Account::new(
            crate::domain::account::AccountParts {
                id: account.id,
                username: account.username.clone(),
                email: account.email.clone(),
                password_hash: account.password_hash.clone(),
                is_active: false,
                created_at: chrono::Utc::now(),
                role: None,
            },
        ))
    }

    async fn activate(&self, _token_hash: &TokenHash) -> Result<(), AccountPersistenceError> {
        Ok(())
    }

    async fn find_active_by_id(
        &self,
        _id: &AccountId,
    ) -> Result<Option<Account>, AccountPersistenceError> {
        Ok(None)
    }

    async fn find_active_by_email(
        &self,
        _email: &EmailAddress,
    ) -> Result<Option<Account>, AccountPersistenceError> {
        Ok(None)
    }

    async fn delete(&self, _id: &AccountId) -> Result<(), AccountPersistenceError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use super::*;
    use crate::domain::account::{EmailAddress, Username};
    use crate::domain::activation::ActivationToken;
    use crate::domain::credentials::PasswordHash;

    #[tokio::test]
    async fn fixture_creates_pending_accounts() {
        let repo = FixtureAccountRepository;
        let candidate = NewAccount {
            id: AccountId::random(),
            username: Username::new("alice").expect("valid username"),
            email: EmailAddress::new("alice@example.com").expect("valid email"),
            password_hash: PasswordHash::from_stored("$argon2id$stub"),
        };

        let account = repo
            .create_with_invitation(
                &candidate,
                &ActivationToken::generate().hash(),
                Duration::hours(72),
            )
            .await
            .expect("fixture create succeeds");

        assert_eq!(account.id(), &candidate.id);
        assert!(!account.is_active());
    }

    #[tokio::test]
    async fn fixture_lookups_return_none() {
        let repo = FixtureAccountRepository;
        let found = repo
            .find_active_by_id(&AccountId::random())
            .await
            .expect("fixture lookup succeeds");
        assert!(found.is_none());
    }

    #[test]
    fn duplicate_errors_format_their_cause() {
        assert!(
            AccountPersistenceError::duplicate_email()
                .to_string()
                .contains("email")
        );
        assert!(
            AccountPersistenceError::duplicate_username()
                .to_string()
                .contains("username")
        );
    }
}
