//! Account entity and its validated value types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::credentials::PasswordHash;

/// Allowed username length bounds.
pub const USERNAME_MIN: usize = 3;
/// Maximum allowed username length.
pub const USERNAME_MAX: usize = 32;
/// Maximum email length accepted (RFC 5321 path limit).
pub const EMAIL_MAX: usize = 254;

/// Validation failures for account value types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountValidationError {
    #[error("username must be between {USERNAME_MIN} and {USERNAME_MAX} characters")]
    UsernameLength,
    #[error("username may only contain letters, numbers, and underscores")]
    UsernameCharacters,
    #[error("email must not be empty or exceed {EMAIL_MAX} characters")]
    EmailLength,
    #[error("email must contain a local part and a domain")]
    EmailShape,
}

/// Stable account identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(Uuid);

impl AccountId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique handle chosen at registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a username.
    pub fn new(value: impl Into<String>) -> Result<Self, AccountValidationError> {
        let value = value.into();
        let length = value.chars().count();
        if length < USERNAME_MIN || length > USERNAME_MAX {
            return Err(AccountValidationError::UsernameLength);
        }
        if !value.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(AccountValidationError::UsernameCharacters);
        }
        Ok(Self(value))
    }

    /// Borrow the handle as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Username {
    type Error = AccountValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

/// Unique email address for the account.
///
/// Validation is structural only (one `@`, non-empty parts); deliverability
/// is proven by the activation flow, not by parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an email address.
    pub fn new(value: impl Into<String>) -> Result<Self, AccountValidationError> {
        let value = value.into();
        if value.is_empty() || value.len() > EMAIL_MAX {
            return Err(AccountValidationError::EmailLength);
        }
        let Some((local, domain)) = value.split_once('@') else {
            return Err(AccountValidationError::EmailShape);
        };
        if local.is_empty() || domain.is_empty() || value.contains(char::is_whitespace) {
            return Err(AccountValidationError::EmailShape);
        }
        Ok(Self(value))
    }

    /// Borrow the address as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = AccountValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// Named role with a numeric precedence level.
///
/// Higher levels win precedence checks; the level ladder is seeded by the
/// schema migrations (`user` < `moderator` < `admin`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub name: String,
    pub description: Option<String>,
    pub level: i32,
}

/// Actor identity used for mutation authorisation.
///
/// `role_level` is zero when the account carries no role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: AccountId,
    pub role_level: i32,
}

/// Candidate account assembled by the registration flow before persistence.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub id: AccountId,
    pub username: Username,
    pub email: EmailAddress,
    pub password_hash: PasswordHash,
}

/// Persisted account record.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    id: AccountId,
    username: Username,
    email: EmailAddress,
    password_hash: PasswordHash,
    is_active: bool,
    created_at: DateTime<Utc>,
    role: Option<Role>,
}

/// Field bundle for [`Account::new`]; values are already validated by their
/// own constructors.
#[derive(Debug, Clone)]
pub struct AccountParts {
    pub id: AccountId,
    pub username: Username,
    pub email: EmailAddress,
    pub password_hash: PasswordHash,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub role: Option<Role>,
}

impl Account {
    /// Assemble an account from validated parts.
    pub fn new(parts: AccountParts) -> Self {
        let AccountParts {
            id,
            username,
            email,
            password_hash,
            is_active,
            created_at,
            role,
        } = parts;
        Self {
            id,
            username,
            email,
            password_hash,
            is_active,
            created_at,
            role,
        }
    }

    /// Stable identifier.
    pub const fn id(&self) -> &AccountId {
        &self.id
    }

    /// Unique handle.
    pub const fn username(&self) -> &Username {
        &self.username
    }

    /// Unique email address.
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Stored credential hash. Never serialised outward.
    pub const fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Whether the account completed activation.
    pub const fn is_active(&self) -> bool {
        self.is_active
    }

    /// Creation timestamp.
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Optional role.
    pub const fn role(&self) -> Option<&Role> {
        self.role.as_ref()
    }

    /// Actor view of this account for authorisation checks.
    pub fn actor(&self) -> Actor {
        Actor {
            id: self.id,
            role_level: self.role.as_ref().map_or(0, |role| role.level),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("alice")]
    #[case("al_ice_99")]
    #[case("abc")]
    fn accepts_valid_usernames(#[case] raw: &str) {
        let username = Username::new(raw).expect("valid username");
        assert_eq!(username.as_str(), raw);
    }

    #[rstest]
    #[case("ab", AccountValidationError::UsernameLength)]
    #[case("", AccountValidationError::UsernameLength)]
    #[case("a-very-long-username-over-32-characters", AccountValidationError::UsernameLength)]
    #[case("has space", AccountValidationError::UsernameCharacters)]
    #[case("has-dash", AccountValidationError::UsernameCharacters)]
    fn rejects_invalid_usernames(#[case] raw: &str, #[case] expected: AccountValidationError) {
        assert_eq!(Username::new(raw).expect_err("invalid username"), expected);
    }

    #[rstest]
    #[case("alice@example.com")]
    #[case("a@b")]
    fn accepts_valid_emails(#[case] raw: &str) {
        assert!(EmailAddress::new(raw).is_ok());
    }

    #[rstest]
    #[case("")]
    #[case("no-at-sign")]
    #[case("@missing-local")]
    #[case("missing-domain@")]
    #[case("spaced @example.com")]
    fn rejects_invalid_emails(#[case] raw: &str) {
        assert!(EmailAddress::new(raw).is_err());
    }

    #[test]
    fn actor_level_defaults_to_zero_without_role() {
        let account = Account::new(AccountParts {
            id: AccountId::random(),
            username: Username::new("alice").expect("valid username"),
            email: EmailAddress::new("alice@example.com").expect("valid email"),
            password_hash: PasswordHash::from_stored("$argon2id$stub"),
            is_active: true,
            created_at: Utc::now(),
            role: None,
        });

        assert_eq!(account.actor().role_level, 0);
    }

    #[test]
    fn actor_level_reflects_role() {
        let account = Account::new(AccountParts {
            id: AccountId::random(),
            username: Username::new("mod").expect("valid username"),
            email: EmailAddress::new("mod@example.com").expect("valid email"),
            password_hash: PasswordHash::from_stored("$argon2id$stub"),
            is_active: true,
            created_at: Utc::now(),
            role: Some(Role {
                name: "moderator".to_owned(),
                description: None,
                level: 2,
            }),
        });

        assert_eq!(account.actor().role_level, 2);
    }
}
