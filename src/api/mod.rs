//! League API access
//!
//! `LeagueClient` talks to the upstream API and classifies responses;
//! `LeagueData` wraps it with the on-disk cache and its retry policy.

mod client;
mod policy;

pub use client::{
    validate_payload, ClientError, FetchFailure, FetchOutcome, LeagueClient, FETCH_TIMEOUT,
};
pub use policy::{FetchOptions, LeagueData};
