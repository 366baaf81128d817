// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWKS (JSON Web Key Set) fetching and caching.
//!
//! ## Cache Policy
//!
//! - Key sets are cached as immutable snapshots for a configurable TTL
//! - A TTL of zero disables the cache: every verification refetches
//! - A `kid` missing from a cached snapshot forces one refresh (key rotation),
//!   unless the snapshot is younger than the refresh cooldown
//! - Forced refreshes are serialized; a caller that waited on another
//!   caller's refresh reuses its result instead of fetching again
//! - The lock is never held across the network fetch, so in-flight
//!   verifications keep using the previous snapshot while a refresh runs

use std::sync::Arc;
use std::time::{Duration, Instant};

use jsonwebtoken::jwk::{Jwk, JwkSet};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use super::error::AuthError;
use crate::config::AuthConfig;

/// JWKS cache entry.
struct CacheEntry {
    jwks: Arc<JwkSet>,
    fetched_at: Instant,
}

/// Where key sets come from.
#[derive(Clone)]
enum KeySource {
    /// HTTPS endpoint of the identity provider
    Remote {
        url: String,
        client: reqwest::Client,
    },
    /// Fixed key set (tests, offline operation)
    Static(Arc<JwkSet>),
}

/// JWKS manager with caching.
///
/// Cheap to clone; clones share the cache.
#[derive(Clone)]
pub struct JwksManager {
    source: KeySource,
    /// Cache TTL
    cache_ttl: Duration,
    /// Minimum snapshot age before an unknown `kid` refetches
    refresh_cooldown: Duration,
    /// Cached JWKS
    cache: Arc<RwLock<Option<CacheEntry>>>,
    /// Held for the duration of a forced refresh
    refresh_lock: Arc<Mutex<()>>,
}

impl JwksManager {
    /// Create a manager fetching from the identity provider configured in `config`.
    pub fn remote(config: &AuthConfig) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(config.jwks_fetch_timeout)
            .user_agent(concat!("coffee-shop-server/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AuthError::KeySetUnavailable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            source: KeySource::Remote {
                url: config.jwks_url(),
                client,
            },
            cache_ttl: config.jwks_cache_ttl,
            refresh_cooldown: config.jwks_refresh_cooldown,
            cache: Arc::new(RwLock::new(None)),
            refresh_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Create a manager serving a fixed key set.
    pub fn from_static(jwks: JwkSet) -> Self {
        Self {
            source: KeySource::Static(Arc::new(jwks)),
            cache_ttl: Duration::ZERO,
            refresh_cooldown: Duration::ZERO,
            cache: Arc::new(RwLock::new(None)),
            refresh_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Get the JWKS URL, if the source is remote.
    pub fn jwks_url(&self) -> Option<&str> {
        match &self.source {
            KeySource::Remote { url, .. } => Some(url),
            KeySource::Static(_) => None,
        }
    }

    /// Current key set, from cache when fresh.
    pub async fn key_set(&self) -> Result<Arc<JwkSet>, AuthError> {
        if let Some(entry) = self.cached().await {
            return Ok(entry.jwks);
        }
        self.refresh().await
    }

    /// Find the key whose `kid` equals `kid`.
    ///
    /// A miss against a cached snapshot triggers a single refetch before
    /// giving up with [`AuthError::KeyNotFound`].
    pub async fn find_key(&self, kid: &str) -> Result<Jwk, AuthError> {
        let (jwks, seen_at) = match self.cached().await {
            Some(entry) => (entry.jwks, Some(entry.fetched_at)),
            None => (self.refresh().await?, None),
        };

        if let Some(jwk) = select_key(&jwks, kid) {
            return Ok(jwk.clone());
        }

        if let Some(seen_at) = seen_at {
            if let Some(jwks) = self.refresh_after_miss(kid, seen_at).await? {
                if let Some(jwk) = select_key(&jwks, kid) {
                    return Ok(jwk.clone());
                }
            }
        }

        Err(AuthError::KeyNotFound)
    }

    /// Refetch for a `kid` that was missing from the snapshot fetched at `seen_at`.
    ///
    /// Returns `None` when the snapshot is still inside the cooldown.
    async fn refresh_after_miss(
        &self,
        kid: &str,
        seen_at: Instant,
    ) -> Result<Option<Arc<JwkSet>>, AuthError> {
        let _refreshing = self.refresh_lock.lock().await;

        if let Some(entry) = self.cached().await {
            if entry.fetched_at > seen_at {
                debug!(kid, "JWKS refreshed by another request");
                return Ok(Some(entry.jwks));
            }
        }

        if seen_at.elapsed() < self.refresh_cooldown {
            debug!(kid, "kid not in cached JWKS, refresh cooling down");
            return Ok(None);
        }

        debug!(kid, "kid not in cached JWKS, refreshing");
        self.refresh().await.map(Some)
    }

    /// Fetch the key set and replace the cached snapshot.
    pub async fn refresh(&self) -> Result<Arc<JwkSet>, AuthError> {
        let jwks = self.fetch_jwks().await?;

        if !self.cache_ttl.is_zero() {
            let mut cache = self.cache.write().await;
            *cache = Some(CacheEntry {
                jwks: jwks.clone(),
                fetched_at: Instant::now(),
            });
        }

        Ok(jwks)
    }

    /// Check if JWKS is currently cached and valid.
    pub async fn is_cached(&self) -> bool {
        self.cached().await.is_some()
    }

    async fn cached(&self) -> Option<CacheEntry> {
        let cache = self.cache.read().await;
        cache
            .as_ref()
            .filter(|entry| entry.fetched_at.elapsed() < self.cache_ttl)
            .map(|entry| CacheEntry {
                jwks: entry.jwks.clone(),
                fetched_at: entry.fetched_at,
            })
    }

    /// Fetch JWKS from the source.
    async fn fetch_jwks(&self) -> Result<Arc<JwkSet>, AuthError> {
        let (url, client) = match &self.source {
            KeySource::Static(jwks) => return Ok(jwks.clone()),
            KeySource::Remote { url, client } => (url, client),
        };

        debug!(url = %url, "fetching JWKS");

        let response = client.get(url).send().await.map_err(|e| {
            warn!(url = %url, error = %e, "JWKS request failed");
            AuthError::KeySetUnavailable(if e.is_timeout() {
                "request timed out".to_string()
            } else {
                e.to_string()
            })
        })?;

        if !response.status().is_success() {
            warn!(url = %url, status = %response.status(), "JWKS endpoint returned an error");
            return Err(AuthError::KeySetUnavailable(format!(
                "HTTP {} from JWKS endpoint",
                response.status()
            )));
        }

        let jwks: JwkSet = response.json().await.map_err(|e| {
            warn!(url = %url, error = %e, "JWKS payload is not a key set");
            AuthError::KeySetUnavailable(format!("invalid JWKS payload: {e}"))
        })?;

        debug!(keys = jwks.keys.len(), "fetched JWKS");
        Ok(Arc::new(jwks))
    }
}

fn select_key<'a>(jwks: &'a JwkSet, kid: &str) -> Option<&'a Jwk> {
    jwks.keys
        .iter()
        .find(|k| k.common.key_id.as_deref() == Some(kid))
}
