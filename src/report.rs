//! Multi-season collection and text output
//!
//! Walks the configured seasons through the cache policy, skipping any season
//! without data, and renders the resulting scores.

use serde::Serialize;
use tracing::{info, warn};

use crate::api::{FetchOptions, LeagueData};
use crate::data::{
    add_ranks, build_owner_lookup, extract_teams, extract_week_scores, OwnerLookup, RankedScore,
    ScorePivot, WeekScore,
};

/// Scores gathered across seasons for one scoring period
#[derive(Debug, Clone, Default)]
pub struct SeasonScores {
    /// Every score found, in season order
    pub scores: Vec<WeekScore>,
    /// Owner names from the most recent season that returned data, or
    /// team names when that season lists no members
    pub owners: OwnerLookup,
    /// Seasons that returned no data
    pub missing: Vec<i32>,
}

/// Fetches `period` for each season in `years`
///
/// A season without data is recorded in [`SeasonScores::missing`] and does
/// not stop the remaining seasons.
pub async fn collect_week_scores(
    data: &LeagueData<'_>,
    years: &[i32],
    period: u32,
    views: &[String],
    options: FetchOptions,
) -> SeasonScores {
    let mut years = years.to_vec();
    years.sort_unstable();
    years.dedup();

    let mut result = SeasonScores::default();
    for year in years {
        let key = data.key(year, period, views.iter().cloned());
        match data.get_league_data(&key, options).await {
            Some(payload) => {
                let scores = extract_week_scores(&payload, year, period);
                info!(year, period, teams = scores.len(), "collected week scores");
                result.scores.extend(scores);

                let mut owners = build_owner_lookup(&payload);
                if owners.is_empty() {
                    // Without member data, fall back to team names
                    match extract_teams(&payload) {
                        Ok(teams) => {
                            for team in teams {
                                owners.insert(team.id, team.name);
                            }
                        }
                        Err(e) => warn!(year, error = %e, "team names unavailable"),
                    }
                }
                if !owners.is_empty() {
                    result.owners = owners;
                }
            }
            None => {
                warn!(year, period, "no data for season");
                result.missing.push(year);
            }
        }
    }
    result
}

/// Renders a pivot as an aligned text table
///
/// Cells show points rounded to whole numbers, or two decimals when
/// `decimals` is set. Missing cells show `-`.
pub fn render_table(pivot: &ScorePivot, decimals: bool) -> String {
    let owner_width = pivot
        .rows
        .iter()
        .map(|r| r.owner.chars().count())
        .chain(std::iter::once("Owner".len()))
        .max()
        .unwrap_or(5);
    let cell_width = if decimals { 6 } else { 5 };

    let mut out = format!("{:<width$}", "Owner", width = owner_width);
    for season in &pivot.seasons {
        out.push_str(&format!(" {:>width$}", season, width = cell_width));
    }
    out.push('\n');

    for row in &pivot.rows {
        out.push_str(&format!("{:<width$}", row.owner, width = owner_width));
        for value in &row.values {
            let cell = match value {
                Some(v) if decimals => format!("{:.2}", v),
                Some(v) => format!("{:.0}", v),
                None => "-".to_string(),
            };
            out.push_str(&format!(" {:>width$}", cell, width = cell_width));
        }
        out.push('\n');
    }
    out
}

/// One record in JSON output
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonRecord<'a> {
    #[serde(flatten)]
    ranked: &'a RankedScore,
    owner: String,
}

/// Renders ranked scores as a JSON array
pub fn render_json(scores: &[WeekScore], owners: &OwnerLookup) -> serde_json::Result<String> {
    let ranked = add_ranks(scores);
    let records: Vec<JsonRecord<'_>> = ranked
        .iter()
        .map(|r| JsonRecord {
            ranked: r,
            owner: owners.display(r.score.team_id),
        })
        .collect();
    serde_json::to_string_pretty(&records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::LeagueClient;
    use crate::cache::{CacheEntry, CacheStore};
    use crate::config::Config;
    use crate::data::pivot_scores;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    fn score(season: i32, team_id: i64, points: f64) -> WeekScore {
        WeekScore {
            season,
            team_id,
            points,
        }
    }

    #[test]
    fn test_render_table_layout() {
        let mut owners = OwnerLookup::default();
        owners.insert(1, "Smith");
        let records = vec![score(2022, 1, 101.4), score(2023, 1, 99.6), score(2022, 2, 80.0)];
        let table = render_table(&pivot_scores(&records, &owners), false);

        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "Owner  2022  2023");
        assert_eq!(lines[1], "Smith   101   100");
        assert_eq!(lines[2], "2        80     -");
    }

    #[test]
    fn test_render_table_with_decimals() {
        let records = vec![score(2022, 1, 0.5)];
        let table = render_table(&pivot_scores(&records, &OwnerLookup::default()), true);
        assert!(table.contains("  0.50"));
    }

    #[test]
    fn test_render_json_includes_rank_and_owner() {
        let mut owners = OwnerLookup::default();
        owners.insert(2, "Jones");
        let json = render_json(&[score(2022, 1, 50.0), score(2022, 2, 60.0)], &owners).unwrap();
        let parsed: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed[0]["teamId"], 1);
        assert_eq!(parsed[0]["rank"], 2);
        assert_eq!(parsed[0]["owner"], "1");
        assert_eq!(parsed[1]["owner"], "Jones");
        assert_eq!(parsed[1]["rank"], 1);
    }

    #[tokio::test]
    async fn test_collect_skips_missing_seasons() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::new("77");
        // Unroutable base URL: every lookup below must come from the cache
        config.base_url = "http://127.0.0.1:9".to_string();
        let store = CacheStore::with_dir(temp_dir.path());
        let views = vec!["mTeam".to_string(), "mMatchup".to_string()];

        let payload = json!({
            "teams": [{"id": 1, "primaryOwner": "{A}"}],
            "members": [{"id": "{A}", "lastName": "Smith"}],
            "schedule": [{"matchupPeriodId": 1, "home": {"teamId": 1, "totalPoints": 95.0}}]
        });
        let client = LeagueClient::with_base_url(config.base_url.as_str()).unwrap();
        let data = LeagueData::new(client, store.clone(), &config).with_current_year(2030);
        store
            .put(&data.key(2021, 1, views.iter().cloned()), &CacheEntry::Payload { data: payload })
            .unwrap();
        store
            .put(&data.key(2020, 1, views.iter().cloned()), &CacheEntry::NoData)
            .unwrap();

        let result =
            collect_week_scores(&data, &[2021, 2020, 2021], 1, &views, FetchOptions::default())
                .await;

        assert_eq!(result.scores, vec![score(2021, 1, 95.0)]);
        assert_eq!(result.missing, vec![2020]);
        assert_eq!(result.owners.get(1), Some("Smith"));
    }

    #[tokio::test]
    async fn test_collect_uses_team_names_without_members() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::new("78");
        let store = CacheStore::with_dir(temp_dir.path());
        let client = LeagueClient::with_base_url("http://127.0.0.1:9").unwrap();
        let data = LeagueData::new(client, store.clone(), &config).with_current_year(2030);
        let views = vec!["mTeam".to_string()];

        let payload = json!({
            "teams": [{"id": 3, "location": "Gold", "nickname": "Rush"}],
            "schedule": [{"matchupPeriodId": 2, "home": {"teamId": 3, "totalPoints": 71.0}}]
        });
        store
            .put(&data.key(2022, 2, views.iter().cloned()), &CacheEntry::Payload { data: payload })
            .unwrap();

        let result = collect_week_scores(&data, &[2022], 2, &views, FetchOptions::default()).await;

        assert_eq!(result.owners.display(3), "Gold Rush");
        assert!(result.missing.is_empty());
    }

    #[tokio::test]
    async fn test_collect_survives_unnamed_team_without_members() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::new("79");
        let store = CacheStore::with_dir(temp_dir.path());
        let client = LeagueClient::with_base_url("http://127.0.0.1:9").unwrap();
        let data = LeagueData::new(client, store.clone(), &config).with_current_year(2030);
        let views = vec!["mTeam".to_string()];

        let payload = json!({
            "teams": [{"id": 3, "location": "Gold", "nickname": "Rush"}, {"id": 4}],
            "schedule": [{"matchupPeriodId": 2, "home": {"teamId": 4, "totalPoints": 64.5}}]
        });
        store
            .put(&data.key(2022, 2, views.iter().cloned()), &CacheEntry::Payload { data: payload })
            .unwrap();

        let result = collect_week_scores(&data, &[2022], 2, &views, FetchOptions::default()).await;

        assert_eq!(result.scores, vec![score(2022, 4, 64.5)]);
        assert!(result.owners.is_empty());
        assert_eq!(result.owners.display(4), "4");
        assert!(result.missing.is_empty());
    }
}
