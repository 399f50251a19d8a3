//! Port for the read-through profile cache.
//!
//! The cache is an optional acceleration path in front of the account store:
//! misses are an explicit `None`, never an error, and adapter failures must
//! be survivable so callers can degrade to store-only reads.

use async_trait::async_trait;

use crate::domain::account::AccountId;

use super::accounts_query::AccountProfile;
use super::define_port_error;

define_port_error! {
    /// Errors surfaced by profile cache adapters.
    pub enum ProfileCacheError {
        /// Cache backend is unavailable or timing out.
        Backend { message: String } =>
            "profile cache backend failure: {message}",
        /// Serialisation of cached content failed.
        Serialization { message: String } =>
            "profile cache serialisation failed: {message}",
    }
}

/// Port for short-TTL profile caching keyed by account id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileCache: Send + Sync {
    /// Look up a cached profile; a miss is `Ok(None)`.
    async fn get(&self, id: &AccountId) -> Result<Option<AccountProfile>, ProfileCacheError>;

    /// Store a profile under the adapter's fixed TTL.
    async fn set(&self, profile: &AccountProfile) -> Result<(), ProfileCacheError>;
}

/// No-op cache used when no backend is configured: always misses, discards
/// writes.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProfileCache;

#[async_trait]
impl ProfileCache for NoopProfileCache {
    async fn get(&self, _id: &AccountId) -> Result<Option<AccountProfile>, ProfileCacheError> {
        Ok(None)
    }

    async fn set(&self, _profile: &AccountProfile) -> Result<(), ProfileCacheError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn noop_cache_always_misses_and_accepts_writes() {
        let cache = NoopProfileCache;
        let id = AccountId::random();

        assert!(cache.get(&id).await.expect("get succeeds").is_none());
    }
}
