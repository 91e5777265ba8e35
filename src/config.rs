//! Runtime configuration read from the environment
//!
//! Values come from process environment variables, optionally seeded from a
//! `.env` file by the binary. The resulting [`Config`] is built once at
//! startup and passed by reference to the API client and cache policy.

use chrono::{Datelike, Local};
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

/// Default upstream base URL for fantasy football league reads
pub const DEFAULT_BASE_URL: &str = "https://lm-api-reads.fantasy.espn.com/apis/v3/games/ffl";

/// Errors raised while building configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No league identifier was configured
    #[error("LEAGUE_ID is not set (pass --league or set it in the environment)")]
    MissingLeagueId,

    /// A year value could not be parsed
    #[error("Invalid year: '{0}'")]
    InvalidYear(String),

    /// The year list parsed to nothing
    #[error("No valid years in '{0}'")]
    NoYears(String),
}

/// Session cookies passed through to the API
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// `swid` cookie value
    pub swid: Option<String>,
    /// `espn_s2` cookie value
    pub espn_s2: Option<String>,
}

impl Credentials {
    /// Builds the `Cookie` header value, or `None` when no cookie is set
    pub fn cookie_header(&self) -> Option<String> {
        let pairs: Vec<String> = [("swid", &self.swid), ("espn_s2", &self.espn_s2)]
            .into_iter()
            .filter_map(|(name, value)| value.as_ref().map(|v| format!("{}={}", name, v)))
            .collect();
        if pairs.is_empty() {
            None
        } else {
            Some(pairs.join("; "))
        }
    }
}

/// Headers that identify the client to the API as a first-party app
pub fn default_headers() -> BTreeMap<String, String> {
    [
        ("User-Agent", "Mozilla/5.0"),
        ("Accept", "application/json"),
        ("X-Fantasy-Source", "kona"),
        ("X-Fantasy-Platform", "kona-PROD-ffl"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// League to query
    pub league_id: String,
    /// Default season, used when no year list is given
    pub year: i32,
    /// Seasons to fetch
    pub years: Vec<i32>,
    /// Session cookies
    pub credentials: Credentials,
    /// Headers sent with every request
    pub headers: BTreeMap<String, String>,
    /// Cache root override; `None` uses the XDG cache directory
    pub cache_dir: Option<PathBuf>,
    /// API base URL
    pub base_url: String,
}

impl Config {
    /// Creates a configuration for `league_id` with defaults for everything else
    pub fn new(league_id: impl Into<String>) -> Self {
        let year = Local::now().year();
        Self {
            league_id: league_id.into(),
            year,
            years: vec![year],
            credentials: Credentials::default(),
            headers: default_headers(),
            cache_dir: None,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Reads configuration from the process environment
    ///
    /// `LEAGUE_ID` may be absent here when the CLI supplies it; use
    /// [`Config::from_lookup`] directly to control the source in tests.
    pub fn from_env(league_override: Option<&str>) -> Result<Self, ConfigError> {
        Self::from_lookup(league_override, |name| std::env::var(name).ok())
    }

    /// Builds configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(league_override: Option<&str>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let league_id = league_override
            .map(str::to_string)
            .or_else(|| lookup("LEAGUE_ID"))
            .filter(|id| !id.trim().is_empty())
            .ok_or(ConfigError::MissingLeagueId)?;

        let mut config = Self::new(league_id);

        if let Some(raw) = lookup("YEAR").filter(|v| !v.trim().is_empty()) {
            config.year = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidYear(raw.clone()))?;
        }
        config.years = match lookup("YEARS") {
            Some(raw) => parse_years(&raw, config.year)?,
            None => vec![config.year],
        };

        config.credentials = Credentials {
            swid: lookup("SWID").filter(|v| !v.is_empty()),
            espn_s2: lookup("ESPN_S2").filter(|v| !v.is_empty()),
        };
        config.cache_dir = lookup("FFL_CACHE_DIR")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        if let Some(url) = lookup("FFL_BASE_URL").filter(|v| !v.is_empty()) {
            config.base_url = url.trim_end_matches('/').to_string();
        }

        Ok(config)
    }
}

/// Parses a comma-separated year list
///
/// Blank input yields `[default_year]`. Entries that are not plain digits
/// are skipped; if none remain the list is rejected.
pub fn parse_years(raw: &str, default_year: i32) -> Result<Vec<i32>, ConfigError> {
    if raw.trim().is_empty() {
        return Ok(vec![default_year]);
    }
    let years: Vec<i32> = raw
        .split(',')
        .map(str::trim)
        .filter(|y| !y.is_empty() && y.chars().all(|c| c.is_ascii_digit()))
        .filter_map(|y| y.parse().ok())
        .collect();
    if years.is_empty() {
        return Err(ConfigError::NoYears(raw.to_string()));
    }
    Ok(years)
}
