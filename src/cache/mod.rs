//! Cache module for storing league API responses on disk
//!
//! Entries are keyed by league, season, scoring period and view set. An entry
//! is either a validated payload or an explicit "no data" marker recorded for
//! seasons that can no longer change. There is no time-based expiry.

mod key;
mod store;

pub use key::{RequestKey, DEFAULT_VIEWS};
pub use store::{CacheEntry, CacheStore};
