//! Time-bounded signing-key cache.
//!
//! Refresh policy:
//! - A fetched key set is served until its TTL (plus up to
//!   `jitter_ratio` of random extra time) elapses.
//! - A token naming an unknown `kid` forces a refetch, but no more than once
//!   per `min_refresh_interval`, so a flood of forged key ids cannot hammer
//!   the issuer.
//! - Each refetch makes up to `max_attempts` requests, `retry_delay` apart.
//! - If every attempt fails and the stale set still holds the requested key,
//!   the stale key is used and a warning is logged.
//! - After a failed refetch no further fetch is made for
//!   `min_refresh_interval`; lookups in that window are answered from the
//!   stale set, or fail as unavailable, without touching the issuer.
//!
//! Refetches are single-flight: the cache lock is held across the fetch so
//! concurrent requests wait for one result instead of fetching in parallel.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::jwk::{Jwk, JwkSet};
use mockable::Clock;
use rand::Rng;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::{KeySetFetchError, KeySetSource};
use crate::domain::AuthError;

/// Tunables for [`CachedKeySet`].
#[derive(Debug, Clone, PartialEq)]
pub struct KeySetCachePolicy {
    /// How long a fetched key set is trusted.
    pub ttl: Duration,
    /// Upper bound of extra TTL, as a fraction of `ttl`.
    pub jitter_ratio: f64,
    /// Minimum spacing between refetches triggered by unknown key ids.
    pub min_refresh_interval: Duration,
    /// Requests per refetch, at least one.
    pub max_attempts: u32,
    /// Pause between attempts.
    pub retry_delay: Duration,
}

impl Default for KeySetCachePolicy {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(3600),
            jitter_ratio: 0.1,
            min_refresh_interval: Duration::from_secs(30),
            max_attempts: 2,
            retry_delay: Duration::from_millis(200),
        }
    }
}

struct Snapshot {
    keys: JwkSet,
    fetched_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

struct RefreshFailure {
    at: DateTime<Utc>,
    message: String,
}

#[derive(Default)]
struct CacheState {
    snapshot: Option<Snapshot>,
    failure: Option<RefreshFailure>,
}

impl CacheState {
    fn stale_or_unavailable(&self, kid: &str, message: &str) -> Result<Jwk, AuthError> {
        match self.snapshot.as_ref().and_then(|current| current.keys.find(kid)) {
            Some(jwk) => Ok(jwk.clone()),
            None => Err(AuthError::key_set_unavailable(message)),
        }
    }
}

/// Key set cache in front of a [`KeySetSource`].
pub struct CachedKeySet<S> {
    source: S,
    policy: KeySetCachePolicy,
    clock: Arc<dyn Clock>,
    state: Mutex<CacheState>,
}

impl<S: KeySetSource> CachedKeySet<S> {
    /// Empty cache; the first lookup fetches.
    pub fn new(source: S, policy: KeySetCachePolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            source,
            policy,
            clock,
            state: Mutex::new(CacheState::default()),
        }
    }

    /// Return the key published under `kid`.
    ///
    /// # Errors
    /// [`AuthError::UnknownKey`] when the (possibly refreshed) key set has no
    /// such key, [`AuthError::KeySetUnavailable`] when no key set could be
    /// fetched and nothing usable is cached.
    pub async fn key_for(&self, kid: &str) -> Result<Jwk, AuthError> {
        let mut state = self.state.lock().await;
        let now = self.clock.utc();

        if let Some(current) = state.snapshot.as_ref() {
            let fresh = now < current.expires_at;
            match current.keys.find(kid) {
                Some(jwk) if fresh => return Ok(jwk.clone()),
                None if fresh && now < after(current.fetched_at, self.policy.min_refresh_interval) => {
                    debug!(kid, "unknown key id within refresh interval");
                    return Err(AuthError::UnknownKey);
                }
                _ => {}
            }
        }

        let backoff = state
            .failure
            .as_ref()
            .filter(|failure| now < after(failure.at, self.policy.min_refresh_interval));
        if let Some(failure) = backoff {
            debug!(kid, "key set refresh backing off after failure");
            return state.stale_or_unavailable(kid, &failure.message);
        }

        match self.fetch_with_retry().await {
            Ok(keys) => {
                info!(key_count = keys.keys.len(), "signing key set refreshed");
                let found = keys.find(kid).cloned();
                state.snapshot = Some(Snapshot {
                    keys,
                    fetched_at: now,
                    expires_at: after(now, self.jittered_ttl()),
                });
                state.failure = None;
                found.ok_or(AuthError::UnknownKey)
            }
            Err(error) => {
                let message = error.to_string();
                let outcome = state.stale_or_unavailable(kid, &message);
                if outcome.is_ok() {
                    warn!(%error, kid, "key set refresh failed; using stale key");
                } else {
                    warn!(%error, "key set refresh failed");
                }
                state.failure = Some(RefreshFailure { at: now, message });
                outcome
            }
        }
    }

    async fn fetch_with_retry(&self) -> Result<JwkSet, KeySetFetchError> {
        let attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.source.fetch().await {
                Ok(keys) => return Ok(keys),
                Err(error) if attempt < attempts => {
                    debug!(%error, attempt, "key set fetch failed; retrying");
                    attempt += 1;
                    tokio::time::sleep(self.policy.retry_delay).await;
                }
                Err(error) => return Err(error),
            }
        }
    }

    fn jittered_ttl(&self) -> Duration {
        let ratio = self.policy.jitter_ratio.clamp(0.0, 1.0);
        let extra = rand::thread_rng().gen_range(0.0..=ratio);
        self.policy.ttl + self.policy.ttl.mul_f64(extra)
    }
}

fn after(at: DateTime<Utc>, span: Duration) -> DateTime<Utc> {
    TimeDelta::from_std(span)
        .ok()
        .and_then(|delta| at.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
