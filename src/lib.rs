//! fflcache library
//!
//! Fetches fantasy league data through a disk cache and reshapes it into
//! weekly score records. Modules are exposed for the binary and for
//! integration tests.

pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod report;
