//! Redis-backed profile cache adapter.
//!
//! Cached payloads are the outward [`AccountProfile`] shape, so credentials
//! never reach the cache. Keys are namespaced (`profile:v1:<id>`) for
//! version-safe invalidation and the TTL carries a little jitter so a burst
//! of lookups does not expire in lockstep.

use async_trait::async_trait;
use bb8_redis::redis::AsyncCommands;
use bb8_redis::{RedisConnectionManager, bb8};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::domain::account::AccountId;
use crate::domain::ports::{AccountProfile, ProfileCache, ProfileCacheError};

/// Base lifetime for cached profiles.
const PROFILE_TTL_SECS: u64 = 60;
/// Upper bound of the random TTL spread.
const PROFILE_TTL_JITTER_SECS: u64 = 5;

fn cache_key(id: &AccountId) -> String {
    format!("profile:v1:{id}")
}

fn ttl_with_jitter() -> u64 {
    let mut rng = SmallRng::from_entropy();
    PROFILE_TTL_SECS + rng.gen_range(0..=PROFILE_TTL_JITTER_SECS)
}

/// Redis implementation of the profile cache port.
#[derive(Clone)]
pub struct RedisProfileCache {
    pool: bb8::Pool<RedisConnectionManager>,
}

impl RedisProfileCache {
    /// Build the cache against a Redis URL.
    pub async fn connect(redis_url: &str) -> Result<Self, ProfileCacheError> {
        let manager = RedisConnectionManager::new(redis_url)
            .map_err(|err| ProfileCacheError::backend(err.to_string()))?;
        let pool = bb8::Pool::builder()
            .build(manager)
            .await
            .map_err(|err| ProfileCacheError::backend(err.to_string()))?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl ProfileCache for RedisProfileCache {
    async fn get(&self, id: &AccountId) -> Result<Option<AccountProfile>, ProfileCacheError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| ProfileCacheError::backend(err.to_string()))?;

        let raw: Option<String> = conn
            .get(cache_key(id))
            .await
            .map_err(|err| ProfileCacheError::backend(err.to_string()))?;

        raw.map(|payload| {
            serde_json::from_str(&payload)
                .map_err(|err| ProfileCacheError::serialization(err.to_string()))
        })
        .transpose()
    }

    async fn set(&self, profile: &AccountProfile) -> Result<(), ProfileCacheError> {
        let payload = serde_json::to_string(profile)
            .map_err(|err| ProfileCacheError::serialization(err.to_string()))?;

        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| ProfileCacheError::backend(err.to_string()))?;

        let _: () = conn
            .set_ex(cache_key(&profile.id), payload, ttl_with_jitter())
            .await
            .map_err(|err| ProfileCacheError::backend(err.to_string()))?;
        Ok(())
    }
}
