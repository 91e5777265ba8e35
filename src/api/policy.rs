//! Cache policy around the league client
//!
//! Decides whether a request can be answered from disk, whether a fresh
//! result is persisted, and whether a failure is remembered. Failures for
//! past seasons are stored as a "no data" marker since those seasons are
//! final; failures for the current season are left uncached so the next
//! call tries the network again.

use chrono::{Datelike, Local};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::client::LeagueClient;
use crate::cache::{CacheEntry, CacheStore, RequestKey};
use crate::config::Config;

/// Per-call cache switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// Answer from the cache when an entry exists
    pub use_cache: bool,
    /// Skip the cache read and always contact the API
    pub force_refresh: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            use_cache: true,
            force_refresh: false,
        }
    }
}

/// Cached access to league data
pub struct LeagueData<'a> {
    client: LeagueClient,
    store: CacheStore,
    config: &'a Config,
    current_year: i32,
}

impl<'a> LeagueData<'a> {
    /// Creates the policy with the current calendar year as the mutability cutoff
    pub fn new(client: LeagueClient, store: CacheStore, config: &'a Config) -> Self {
        Self {
            client,
            store,
            config,
            current_year: Local::now().year(),
        }
    }

    /// Overrides the year treated as "current"
    pub fn with_current_year(mut self, year: i32) -> Self {
        self.current_year = year;
        self
    }

    /// The underlying cache store
    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    /// Builds a request key for the configured league
    pub fn key<I, S>(&self, year: i32, period: u32, views: I) -> RequestKey
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RequestKey::new(self.config.league_id.as_str(), year, period, views)
    }

    /// Returns league data for `key`, or `None` when no valid data exists
    ///
    /// Never fails: network, HTTP and shape failures are logged by the client
    /// and collapse to `None`, as does a stored "no data" marker.
    pub async fn get_league_data(&self, key: &RequestKey, options: FetchOptions) -> Option<Value> {
        if options.use_cache && !options.force_refresh {
            if let Some(entry) = self.store.get(key) {
                debug!(%key, "serving league data from cache");
                return entry.into_payload();
            }
        }

        info!(%key, "fetching league data");
        let outcome = self
            .client
            .fetch(key, &self.config.credentials, &self.config.headers)
            .await;

        match outcome {
            Ok(payload) => {
                self.persist(
                    key,
                    &CacheEntry::Payload {
                        data: payload.clone(),
                    },
                );
                Some(payload)
            }
            Err(_) if key.year < self.current_year => {
                debug!(%key, "caching permanent miss for past season");
                self.persist(key, &CacheEntry::NoData);
                None
            }
            Err(_) => {
                info!(%key, "skipping cache for current-year miss");
                None
            }
        }
    }

    fn persist(&self, key: &RequestKey, entry: &CacheEntry) {
        if let Err(e) = self.store.put(key, entry) {
            warn!(%key, error = %e, "failed to write cache entry");
        }
    }
}
