//! One-time activation tokens issued at registration.
//!
//! The plaintext token leaves the system exactly once, in the registration
//! response; storage and lookups only ever see the SHA-256 hex digest.

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Opaque plaintext activation token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationToken(String);

impl ActivationToken {
    /// Mint a fresh random token.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap a token supplied by an activation request.
    pub fn from_plaintext(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Digest used for storage and lookup.
    pub fn hash(&self) -> TokenHash {
        let digest = Sha256::digest(self.0.as_bytes());
        TokenHash(hex::encode(digest))
    }

    /// Consume the token, exposing the plaintext for the registration
    /// response.
    pub fn into_plaintext(self) -> String {
        self.0
    }

    /// Borrow the plaintext.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Lowercase hex SHA-256 digest of an activation token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenHash(String);

impl TokenHash {
    /// Borrow the digest as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for TokenHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
