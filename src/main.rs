//! fflcache - summarize weekly fantasy league scores across seasons
//!
//! Fetches one scoring period per season through the on-disk cache and prints
//! an owner by season table or ranked JSON records.

use clap::Parser;
use tracing::Level;

use fflcache::api::{LeagueClient, LeagueData};
use fflcache::cache::CacheStore;
use fflcache::cli::{Cli, OutputFormat};
use fflcache::config::Config;
use fflcache::data::{filter_recent, normalize_per_column, pivot_scores};
use fflcache::report::{collect_week_scores, render_json, render_table};

/// Installs the stderr log subscriber
fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::from_env(cli.league.as_deref())?;
    cli.apply_to(&mut config)?;
    let views = cli.views()?;

    let store = match &config.cache_dir {
        Some(dir) => CacheStore::with_dir(dir),
        None => CacheStore::new().ok_or("could not determine a cache directory")?,
    };
    if cli.clear_cache {
        store.clear_league(&config.league_id)?;
        tracing::info!(league = %config.league_id, "cleared cache");
    }

    let client = LeagueClient::with_base_url(config.base_url.as_str())?;
    let data = LeagueData::new(client, store, &config);

    let collected =
        collect_week_scores(&data, &config.years, cli.period, &views, cli.fetch_options()).await;
    let scores = match cli.min_year {
        Some(min_year) => filter_recent(&collected.scores, min_year),
        None => collected.scores,
    };

    match cli.format {
        OutputFormat::Json => println!("{}", render_json(&scores, &collected.owners)?),
        OutputFormat::Table => {
            let pivot = pivot_scores(&scores, &collected.owners);
            if cli.normalize {
                print!("{}", render_table(&normalize_per_column(&pivot), true));
            } else {
                print!("{}", render_table(&pivot, false));
            }
        }
    }

    Ok(())
}
