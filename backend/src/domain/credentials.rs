//! Password credential handling.
//!
//! Plaintext passwords are wrapped so they are scrubbed from memory on drop
//! and can never be logged or serialised; storage only ever sees the Argon2id
//! hash string.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    PasswordHash as ParsedHash, PasswordHasher, PasswordVerifier, SaltString,
};
use zeroize::Zeroizing;

/// Accepted plaintext password length bounds.
pub const PASSWORD_MIN: usize = 8;
/// Maximum plaintext password length.
pub const PASSWORD_MAX: usize = 72;

/// Failures raised while handling credentials.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    #[error("password must be between {PASSWORD_MIN} and {PASSWORD_MAX} characters")]
    Length,
    #[error("failed to hash password")]
    Hashing,
    #[error("stored credential hash is malformed")]
    MalformedHash,
}

/// Plaintext password held only for the duration of a request.
pub struct PlainPassword(Zeroizing<String>);

impl PlainPassword {
    /// Validate and wrap a plaintext password.
    pub fn new(value: impl Into<String>) -> Result<Self, CredentialError> {
        let value = Zeroizing::new(value.into());
        let length = value.chars().count();
        if length < PASSWORD_MIN || length > PASSWORD_MAX {
            return Err(CredentialError::Length);
        }
        Ok(Self(value))
    }

    fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl std::fmt::Debug for PlainPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PlainPassword(redacted)")
    }
}

/// Argon2id credential hash in PHC string format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash a plaintext password with a fresh random salt.
    pub fn hash(password: &PlainPassword) -> Result<Self, CredentialError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|_| CredentialError::Hashing)?;
        Ok(Self(hash.to_string()))
    }

    /// Wrap a hash string loaded from storage.
    pub fn from_stored(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Verify a plaintext password against this hash.
    pub fn verify(&self, password: &PlainPassword) -> Result<bool, CredentialError> {
        let parsed = ParsedHash::new(&self.0).map_err(|_| CredentialError::MalformedHash)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    /// Borrow the PHC hash string for persistence.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Email/password pair presented at login.
#[derive(Debug)]
pub struct LoginCredentials {
    email: String,
    password: PlainPassword,
}

impl LoginCredentials {
    /// Construct login credentials, validating the password shape only.
    ///
    /// The email is kept raw; lookup failure and malformed addresses are both
    /// reported as unauthorised so login does not leak which part was wrong.
    pub fn new(email: impl Into<String>, password: PlainPassword) -> Self {
        Self {
            email: email.into(),
            password,
        }
    }

    /// Presented email address.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Presented plaintext password.
    pub const fn password(&self) -> &PlainPassword {
        &self.password
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn hash_then_verify_accepts_original_password() {
        let password = PlainPassword::new("correct horse battery").expect("valid password");
        let hash = PasswordHash::hash(&password).expect("hashing succeeds");

        assert!(hash.verify(&password).expect("verification runs"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let password = PlainPassword::new("correct horse battery").expect("valid password");
        let other = PlainPassword::new("incorrect horse").expect("valid password");
        let hash = PasswordHash::hash(&password).expect("hashing succeeds");

        assert!(!hash.verify(&other).expect("verification runs"));
    }

    #[test]
    fn stored_hash_never_contains_plaintext() {
        let password = PlainPassword::new("hunter2hunter2").expect("valid password");
        let hash = PasswordHash::hash(&password).expect("hashing succeeds");

        assert!(hash.as_str().starts_with("$argon2"));
        assert!(!hash.as_str().contains("hunter2hunter2"));
    }

    #[test]
    fn malformed_stored_hash_is_an_error_not_a_match() {
        let password = PlainPassword::new("hunter2hunter2").expect("valid password");
        let hash = PasswordHash::from_stored("not-a-phc-string");

        assert_eq!(
            hash.verify(&password).expect_err("malformed hash"),
            CredentialError::MalformedHash
        );
    }

    #[rstest]
    #[case("short")]
    #[case("")]
    fn rejects_out_of_range_passwords(#[case] raw: &str) {
        assert_eq!(
            PlainPassword::new(raw).expect_err("invalid password"),
            CredentialError::Length
        );
    }

    #[test]
    fn debug_output_is_redacted() {
        let password = PlainPassword::new("hunter2hunter2").expect("valid password");
        assert_eq!(format!("{password:?}"), "PlainPassword(redacted)");
    }
}
