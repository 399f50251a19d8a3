//! Tests for the account lifecycle service.

use std::sync::{Arc, Mutex};

use chrono::Utc;

use super::*;
use crate::domain::account::{Account, AccountParts};
use crate::domain::activation::TokenHash;
use crate::domain::error::ErrorCode;
use crate::domain::ports::{
    MockAccountRepository, MockProfileCache, MockWelcomeMailer, NoopProfileCache,
    ProfileCacheError,
};

fn account_from_candidate(candidate: &NewAccount) -> Account {
    Account::new(AccountParts {
        id: candidate.id,
        username: candidate.username.clone(),
        email: candidate.email.clone(),
        password_hash: candidate.password_hash.clone(),
        is_active: false,
        created_at: Utc::now(),
        role: None,
    })
}

fn active_account(email: &str, password: &str) -> Account {
    let plain = PlainPassword::new(password).expect("valid password");
    Account::new(AccountParts {
        id: AccountId::random(),
        username: Username::new("alice").expect("valid username"),
        email: EmailAddress::new(email).expect("valid email"),
        password_hash: PasswordHash::hash(&plain).expect("hashing succeeds"),
        is_active: true,
        created_at: Utc::now(),
        role: None,
    })
}

fn register_request() -> RegisterAccountRequest {
    RegisterAccountRequest {
        username: "alice".to_owned(),
        email: "alice@example.com".to_owned(),
        password: "correct horse battery".to_owned(),
    }
}

fn service_with(
    accounts: MockAccountRepository,
    mailer: MockWelcomeMailer,
) -> AccountService {
    AccountService::new(
        Arc::new(accounts),
        Arc::new(NoopProfileCache),
        Arc::new(mailer),
        AccountServiceConfig::default(),
    )
}

#[tokio::test]
async fn register_returns_plaintext_whose_hash_was_stored() {
    let stored_hash: Arc<Mutex<Option<TokenHash>>> = Arc::new(Mutex::new(None));
    let captured = Arc::clone(&stored_hash);

    let mut accounts = MockAccountRepository::new();
    accounts
        .expect_create_with_invitation()
        .times(1)
        .returning(move |candidate, token_hash, _ttl| {
            *captured.lock().expect("capture lock") = Some(token_hash.clone());
            Ok(account_from_candidate(candidate))
        });
    let mut mailer = MockWelcomeMailer::new();
    mailer.expect_send_welcome().times(1).returning(|_| Ok(()));

    let response = service_with(accounts, mailer)
        .register(register_request())
        .await
        .expect("registration succeeds");

    let stored = stored_hash
        .lock()
        .expect("capture lock")
        .clone()
        .expect("hash captured");
    let expected = ActivationToken::from_plaintext(response.activation_token.clone()).hash();
    assert_eq!(stored, expected);
    assert_ne!(stored.as_str(), response.activation_token.as_str());
}

#[tokio::test]
async fn register_maps_duplicate_email_and_skips_mail() {
    let mut accounts = MockAccountRepository::new();
    accounts
        .expect_create_with_invitation()
        .times(1)
        .returning(|_, _, _| Err(AccountPersistenceError::duplicate_email()));
    let mut mailer = MockWelcomeMailer::new();
    mailer.expect_send_welcome().times(0);

    let error = service_with(accounts, mailer)
        .register(register_request())
        .await
        .expect_err("duplicate email");

    assert_eq!(error.code(), ErrorCode::DuplicateEmail);
}

#[tokio::test]
async fn register_rejects_invalid_input_before_persistence() {
    let mut accounts = MockAccountRepository::new();
    accounts.expect_create_with_invitation().times(0);
    let mut mailer = MockWelcomeMailer::new();
    mailer.expect_send_welcome().times(0);

    let error = service_with(accounts, mailer)
        .register(RegisterAccountRequest {
            username: "a".to_owned(),
            email: "alice@example.com".to_owned(),
            password: "correct horse battery".to_owned(),
        })
        .await
        .expect_err("invalid username");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn register_deletes_account_when_mail_fails() {
    let mut accounts = MockAccountRepository::new();
    accounts
        .expect_create_with_invitation()
        .times(1)
        .returning(|candidate, _, _| Ok(account_from_candidate(candidate)));
    accounts.expect_delete().times(1).returning(|_| Ok(()));
    let mut mailer = MockWelcomeMailer::new();
    mailer
        .expect_send_welcome()
        .times(1)
        .returning(|_| Err(crate::domain::ports::MailerError::delivery("smtp down")));

    let error = service_with(accounts, mailer)
        .register(register_request())
        .await
        .expect_err("mail failure surfaces");

    assert_eq!(error.code(), ErrorCode::InternalError);
}

#[tokio::test]
async fn activate_hashes_the_supplied_token() {
    let plaintext = "4f2f1d06-9c2a-4be5-8f12-12e0b3a2a6a1";
    let expected = ActivationToken::from_plaintext(plaintext).hash();

    let mut accounts = MockAccountRepository::new();
    accounts
        .expect_activate()
        .times(1)
        .withf(move |hash| *hash == expected)
        .returning(|_| Ok(()));

    service_with(accounts, MockWelcomeMailer::new())
        .activate(plaintext.to_owned())
        .await
        .expect("activation succeeds");
}

#[tokio::test]
async fn activate_reports_consumed_or_expired_tokens_as_not_found() {
    let mut accounts = MockAccountRepository::new();
    accounts
        .expect_activate()
        .times(1)
        .returning(|_| Err(AccountPersistenceError::not_found()));

    let error = service_with(accounts, MockWelcomeMailer::new())
        .activate("already-used".to_owned())
        .await
        .expect_err("token already consumed");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.message(), "invalid or expired activation token");
}

#[tokio::test]
async fn get_account_prefers_cache_hits() {
    let account = active_account("alice@example.com", "correct horse battery");
    let id = *account.id();
    let profile = AccountProfile::from(account);
    let cached = profile.clone();

    let mut cache = MockProfileCache::new();
    cache
        .expect_get()
        .times(1)
        .returning(move |_| Ok(Some(cached.clone())));
    let mut accounts = MockAccountRepository::new();
    accounts.expect_find_active_by_id().times(0);

    let service = AccountService::new(
        Arc::new(accounts),
        Arc::new(cache),
        Arc::new(MockWelcomeMailer::new()),
        AccountServiceConfig::default(),
    );

    let found = service.get_account(id).await.expect("lookup succeeds");
    assert_eq!(found, profile);
}

#[tokio::test]
async fn get_account_populates_cache_on_miss() {
    let account = active_account("alice@example.com", "correct horse battery");
    let id = *account.id();

    let mut cache = MockProfileCache::new();
    cache.expect_get().times(1).returning(|_| Ok(None));
    cache
        .expect_set()
        .times(1)
        .withf(move |profile| profile.id == id)
        .returning(|_| Ok(()));
    let mut accounts = MockAccountRepository::new();
    accounts
        .expect_find_active_by_id()
        .times(1)
        .returning(move |_| Ok(Some(account.clone())));

    let service = AccountService::new(
        Arc::new(accounts),
        Arc::new(cache),
        Arc::new(MockWelcomeMailer::new()),
        AccountServiceConfig::default(),
    );

    service.get_account(id).await.expect("lookup succeeds");
}

#[tokio::test]
async fn get_account_degrades_to_store_when_cache_fails() {
    let account = active_account("alice@example.com", "correct horse battery");
    let id = *account.id();

    let mut cache = MockProfileCache::new();
    cache
        .expect_get()
        .times(1)
        .returning(|_| Err(ProfileCacheError::backend("redis down")));
    cache
        .expect_set()
        .times(1)
        .returning(|_| Err(ProfileCacheError::backend("redis down")));
    let mut accounts = MockAccountRepository::new();
    accounts
        .expect_find_active_by_id()
        .times(1)
        .returning(move |_| Ok(Some(account.clone())));

    let service = AccountService::new(
        Arc::new(accounts),
        Arc::new(cache),
        Arc::new(MockWelcomeMailer::new()),
        AccountServiceConfig::default(),
    );

    let found = service.get_account(id).await.expect("store still answers");
    assert_eq!(found.id, id);
}

#[tokio::test]
async fn get_account_treats_inactive_and_missing_identically() {
    let mut accounts = MockAccountRepository::new();
    accounts
        .expect_find_active_by_id()
        .times(1)
        .returning(|_| Ok(None));

    let error = service_with(accounts, MockWelcomeMailer::new())
        .get_account(AccountId::random())
        .await
        .expect_err("not found");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn authenticate_accepts_the_registered_password() {
    let account = active_account("alice@example.com", "correct horse battery");
    let expected_id = *account.id();

    let mut accounts = MockAccountRepository::new();
    accounts
        .expect_find_active_by_email()
        .times(1)
        .returning(move |_| Ok(Some(account.clone())));

    let id = service_with(accounts, MockWelcomeMailer::new())
        .authenticate(LoginCredentials::new(
            "alice@example.com",
            PlainPassword::new("correct horse battery").expect("valid password"),
        ))
        .await
        .expect("login succeeds");

    assert_eq!(id, expected_id);
}

#[tokio::test]
async fn authenticate_rejects_wrong_password_and_unknown_email_identically() {
    let account = active_account("alice@example.com", "correct horse battery");

    let mut accounts = MockAccountRepository::new();
    accounts
        .expect_find_active_by_email()
        .returning(move |email| {
            if email.as_str() == "alice@example.com" {
                Ok(Some(account.clone()))
            } else {
                Ok(None)
            }
        });

    let service = service_with(accounts, MockWelcomeMailer::new());

    let wrong_password = service
        .authenticate(LoginCredentials::new(
            "alice@example.com",
            PlainPassword::new("not the password").expect("valid password"),
        ))
        .await
        .expect_err("wrong password");
    let unknown_email = service
        .authenticate(LoginCredentials::new(
            "bob@example.com",
            PlainPassword::new("correct horse battery").expect("valid password"),
        ))
        .await
        .expect_err("unknown email");

    assert_eq!(wrong_password.code(), ErrorCode::Unauthorized);
    assert_eq!(unknown_email.code(), ErrorCode::Unauthorized);
    assert_eq!(wrong_password.message(), unknown_email.message());
}

#[tokio::test]
async fn authenticate_maps_connection_errors_to_service_unavailable() {
    let mut accounts = MockAccountRepository::new();
    accounts
        .expect_find_active_by_email()
        .times(1)
        .returning(|_| Err(AccountPersistenceError::connection("pool exhausted")));

    let error = service_with(accounts, MockWelcomeMailer::new())
        .authenticate(LoginCredentials::new(
            "alice@example.com",
            PlainPassword::new("correct horse battery").expect("valid password"),
        ))
        .await
        .expect_err("store down");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}
