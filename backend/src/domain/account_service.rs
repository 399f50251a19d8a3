//! Account lifecycle services: registration, activation, lookup, and login.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use tracing::{error, warn};

use crate::domain::account::{AccountId, EmailAddress, NewAccount, Username};
use crate::domain::activation::ActivationToken;
use crate::domain::credentials::{LoginCredentials, PasswordHash, PlainPassword};
use crate::domain::error::Error;
use crate::domain::ports::{
    AccountPersistenceError, AccountProfile, AccountRepository, AccountsCommand, AccountsQuery,
    LoginService, ProfileCache, RegisterAccountRequest, RegisteredAccount, WelcomeEmail,
    WelcomeMailer,
};

const LOGIN_REJECTION: &str = "invalid email or password";

fn map_account_error(error: AccountPersistenceError) -> Error {
    match error {
        AccountPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("account store unavailable: {message}"))
        }
        AccountPersistenceError::Query { message } => {
            Error::internal(format!("account store error: {message}"))
        }
        AccountPersistenceError::NotFound => Error::not_found("account not found"),
        AccountPersistenceError::DuplicateEmail => Error::new(
            crate::domain::error::ErrorCode::DuplicateEmail,
            "an account with that email already exists",
        ),
        AccountPersistenceError::DuplicateUsername => Error::new(
            crate::domain::error::ErrorCode::DuplicateUsername,
            "an account with that username already exists",
        ),
    }
}

/// Tunables for the account lifecycle.
#[derive(Debug, Clone)]
pub struct AccountServiceConfig {
    /// How long a freshly issued invitation stays valid.
    pub invitation_ttl: Duration,
    /// Frontend base URL embedded in activation links.
    pub activation_base_url: String,
}

impl Default for AccountServiceConfig {
    fn default() -> Self {
        Self {
            invitation_ttl: Duration::hours(72),
            activation_base_url: "http://localhost:3000".to_owned(),
        }
    }
}

/// Service owning the account state machine and its lookups.
#[derive(Clone)]
pub struct AccountService {
    accounts: Arc<dyn AccountRepository>,
    cache: Arc<dyn ProfileCache>,
    mailer: Arc<dyn WelcomeMailer>,
    config: AccountServiceConfig,
}

impl AccountService {
    /// Create the service with its driven ports.
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        cache: Arc<dyn ProfileCache>,
        mailer: Arc<dyn WelcomeMailer>,
        config: AccountServiceConfig,
    ) -> Self {
        Self {
            accounts,
            cache,
            mailer,
            config,
        }
    }
}

#[async_trait]
impl AccountsCommand for AccountService {
    async fn register(&self, request: RegisterAccountRequest) -> Result<RegisteredAccount, Error> {
        let username = Username::new(request.username)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let email = EmailAddress::new(request.email)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let password = PlainPassword::new(request.password)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let password_hash = PasswordHash::hash(&password)
            .map_err(|err| Error::internal(format!("credential hashing failed: {err}")))?;

        let token = ActivationToken::generate();
        let candidate = NewAccount {
            id: AccountId::random(),
            username,
            email,
            password_hash,
        };

        let account = self
            .accounts
            .create_with_invitation(&candidate, &token.hash(), self.config.invitation_ttl)
            .await
            .map_err(map_account_error)?;

        let mail = WelcomeEmail {
            username: account.username().clone(),
            email: account.email().clone(),
            activation_url: format!(
                "{}/confirm/{}",
                self.config.activation_base_url,
                token.as_str()
            ),
        };

        // The mail trigger sits outside the registration transaction, so a
        // failed send leaves an unreachable account behind unless we delete
        // it here. Best effort only.
        if let Err(mail_error) = self.mailer.send_welcome(&mail).await {
            warn!(
                error = %mail_error,
                account_id = %account.id(),
                "welcome mail failed, rolling back registration"
            );
            if let Err(delete_error) = self.accounts.delete(account.id()).await {
                error!(
                    error = %delete_error,
                    account_id = %account.id(),
                    "failed to delete account after mail failure"
                );
            }
            return Err(Error::internal("failed to deliver activation email"));
        }

        Ok(RegisteredAccount {
            account: AccountProfile::from(account),
            activation_token: token.into_plaintext(),
        })
    }

    async fn activate(&self, token: String) -> Result<(), Error> {
        let token = ActivationToken::from_plaintext(token);
        self.accounts
            .activate(&token.hash())
            .await
            .map_err(|err| match err {
                AccountPersistenceError::NotFound => {
                    Error::not_found("invalid or expired activation token")
                }
                other => map_account_error(other),
            })
    }
}

#[async_trait]
impl AccountsQuery for AccountService {
    async fn get_account(&self, id: AccountId) -> Result<AccountProfile, Error> {
        match self.cache.get(&id).await {
            Ok(Some(profile)) => return Ok(profile),
            Ok(None) => {}
            Err(cache_error) => {
                warn!(error = %cache_error, "profile cache read failed, using store");
            }
        }

        let account = self
            .accounts
            .find_active_by_id(&id)
            .await
            .map_err(map_account_error)?
            .ok_or_else(|| Error::not_found(format!("account {id} not found")))?;

        let profile = AccountProfile::from(account);
        if let Err(cache_error) = self.cache.set(&profile).await {
            warn!(error = %cache_error, "profile cache write failed");
        }
        Ok(profile)
    }
}

#[async_trait]
impl LoginService for AccountService {
    async fn authenticate(&self, credentials: LoginCredentials) -> Result<AccountId, Error> {
        let Ok(email) = EmailAddress::new(credentials.email()) else {
            return Err(Error::unauthorized(LOGIN_REJECTION));
        };

        let account = self
            .accounts
            .find_active_by_email(&email)
            .await
            .map_err(map_account_error)?
            .ok_or_else(|| Error::unauthorized(LOGIN_REJECTION))?;

        let matches = account
            .password_hash()
            .verify(credentials.password())
            .map_err(|err| Error::internal(format!("credential verification failed: {err}")))?;
        if !matches {
            return Err(Error::unauthorized(LOGIN_REJECTION));
        }

        Ok(*account.id())
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
