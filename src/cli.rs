//! Command-line interface parsing for fflcache
//!
//! Flags here override values read from the environment (see
//! [`crate::config`]) and select the per-call cache behavior.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use thiserror::Error;

use crate::api::FetchOptions;
use crate::cache::DEFAULT_VIEWS;
use crate::config::{parse_years, Config, ConfigError};

/// Error types for CLI argument handling
#[derive(Debug, Error)]
pub enum CliError {
    /// A view name contains characters the API does not use
    #[error("Invalid view: '{0}'. Views are alphanumeric names such as mTeam or mMatchup")]
    InvalidView(String),

    /// The year list could not be used
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Output format for collected scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Owner by season table
    #[default]
    Table,
    /// Ranked records as JSON
    Json,
}

/// fflcache - fetch, cache and summarize fantasy league scores
#[derive(Parser, Debug)]
#[command(name = "fflcache")]
#[command(about = "Fetch and cache fantasy football league data, then summarize weekly scores")]
#[command(version)]
pub struct Cli {
    /// League identifier (defaults to LEAGUE_ID)
    #[arg(long, value_name = "ID")]
    pub league: Option<String>,

    /// Comma-separated seasons to fetch (defaults to YEARS, then YEAR)
    ///
    /// Example: --years 2020,2021,2022
    #[arg(long, value_name = "YEARS")]
    pub years: Option<String>,

    /// Scoring period (week) to fetch
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub period: u32,

    /// Views to request, comma-separated
    #[arg(long, value_delimiter = ',', default_values_t = DEFAULT_VIEWS.map(String::from))]
    pub views: Vec<String>,

    /// Ignore cached entries (results are still written)
    #[arg(long)]
    pub no_cache: bool,

    /// Always contact the API and overwrite cached entries
    #[arg(long)]
    pub refresh: bool,

    /// Cache root directory (defaults to FFL_CACHE_DIR or the user cache dir)
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Drop seasons before this year from the output
    #[arg(long, value_name = "YEAR")]
    pub min_year: Option<i32>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Scale each season to 0..1 in table output
    #[arg(long)]
    pub normalize: bool,

    /// Delete every cached entry for the league before fetching
    #[arg(long)]
    pub clear_cache: bool,

    /// Log debug output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Cache switches selected by the flags
    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            use_cache: !self.no_cache,
            force_refresh: self.refresh,
        }
    }

    /// Validated view names
    pub fn views(&self) -> Result<Vec<String>, CliError> {
        self.views
            .iter()
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(|v| {
                if v.chars().all(|c| c.is_ascii_alphanumeric()) {
                    Ok(v.to_string())
                } else {
                    Err(CliError::InvalidView(v.to_string()))
                }
            })
            .collect()
    }

    /// Applies flag overrides on top of environment configuration
    pub fn apply_to(&self, config: &mut Config) -> Result<(), CliError> {
        if let Some(raw) = &self.years {
            config.years = parse_years(raw, config.year)?;
        }
        if let Some(dir) = &self.cache_dir {
            config.cache_dir = Some(dir.clone());
        }
        Ok(())
    }
}
