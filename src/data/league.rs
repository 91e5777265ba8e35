//! Extraction of teams, scores and owners from a league payload

use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

use super::{OwnerLookup, TeamName, WeekScore};

/// Errors that can occur when reshaping a payload
#[derive(Debug, Error)]
pub enum ReshapeError {
    /// Payload has no `teams` array
    #[error("payload has no `teams` array")]
    MissingTeams,

    /// A team carries none of the known name fields
    #[error("no team name field found for team {0}")]
    MissingTeamName(i64),
}

fn as_team_id(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f as i64))
}

/// Lists team ids and display names
///
/// The name is `location nickname` when both are present, otherwise `name`,
/// otherwise `abbrev`.
pub fn extract_teams(payload: &Value) -> Result<Vec<TeamName>, ReshapeError> {
    let teams = payload
        .get("teams")
        .and_then(Value::as_array)
        .ok_or(ReshapeError::MissingTeams)?;

    teams
        .iter()
        .filter_map(|team| team.get("id").and_then(as_team_id).map(|id| (id, team)))
        .map(|(id, team)| -> Result<TeamName, ReshapeError> {
            let field = |name: &str| team.get(name).and_then(Value::as_str);
            let name = match (field("location"), field("nickname")) {
                (Some(location), Some(nickname)) => format!("{} {}", location, nickname),
                _ => field("name")
                    .or_else(|| field("abbrev"))
                    .map(str::to_string)
                    .ok_or(ReshapeError::MissingTeamName(id))?,
            };
            Ok(TeamName { id, name })
        })
        .collect()
}

/// Collects one score per side of every matchup in `week`
///
/// A side without `totalPoints` scores 0.
pub fn extract_week_scores(payload: &Value, season: i32, week: u32) -> Vec<WeekScore> {
    let Some(schedule) = payload.get("schedule").and_then(Value::as_array) else {
        return Vec::new();
    };

    schedule
        .iter()
        .filter(|row| row.get("matchupPeriodId").and_then(Value::as_f64) == Some(f64::from(week)))
        .flat_map(|row| ["home", "away"].into_iter().filter_map(move |side| row.get(side)))
        .filter(|side| !side.is_null())
        .filter_map(|side| {
            let team_id = side.get("teamId").and_then(as_team_id)?;
            let points = side
                .get("totalPoints")
                .and_then(Value::as_f64)
                .unwrap_or(0.0);
            Some(WeekScore {
                season,
                team_id,
                points,
            })
        })
        .collect()
}

/// Maps each team to its primary owner's last name
///
/// Teams whose owner is not listed in `members` are left out.
pub fn build_owner_lookup(payload: &Value) -> OwnerLookup {
    let last_names: HashMap<&str, &str> = payload
        .get("members")
        .and_then(Value::as_array)
        .map(|members| {
            members
                .iter()
                .filter_map(|m| {
                    Some((
                        m.get("id")?.as_str()?,
                        m.get("lastName")?.as_str()?,
                    ))
                })
                .collect()
        })
        .unwrap_or_default();

    let mut owners = OwnerLookup::default();
    let teams = payload.get("teams").and_then(Value::as_array);
    for team in teams.into_iter().flatten() {
        let Some(team_id) = team.get("id").and_then(as_team_id) else {
            continue;
        };
        let owner = team.get("primaryOwner").and_then(Value::as_str);
        if let Some(last_name) = owner.and_then(|id| last_names.get(id)) {
            owners.insert(team_id, *last_name);
        }
    }
    owners
}
