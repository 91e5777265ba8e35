//! Tabular records derived from league payloads
//!
//! The API returns an untyped JSON document. These types hold the few fields
//! the summaries need, converted right after the payload is validated.

pub mod analysis;
pub mod league;

pub use analysis::{
    add_ranks, filter_recent, normalize_per_column, pivot_scores, PivotRow, ScorePivot,
    DEFAULT_MIN_YEAR,
};
pub use league::{build_owner_lookup, extract_teams, extract_week_scores, ReshapeError};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Points scored by one team in one scoring period of a season
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekScore {
    /// Season year
    pub season: i32,
    /// Team identifier within the league
    pub team_id: i64,
    /// Total points for the period
    pub points: f64,
}

/// A week score with its rank inside the season
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedScore {
    #[serde(flatten)]
    pub score: WeekScore,
    /// 1 is the highest score; ties share the lowest rank
    pub rank: u32,
}

/// Team identifier and display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamName {
    pub id: i64,
    pub name: String,
}

/// Maps team identifiers to owner display names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnerLookup {
    names: BTreeMap<i64, String>,
}

impl OwnerLookup {
    /// Records the owner name for a team
    pub fn insert(&mut self, team_id: i64, name: impl Into<String>) {
        self.names.insert(team_id, name.into());
    }

    /// Owner name for a team, if known
    pub fn get(&self, team_id: i64) -> Option<&str> {
        self.names.get(&team_id).map(String::as_str)
    }

    /// Owner name, or the team id as text when unknown
    pub fn display(&self, team_id: i64) -> String {
        self.get(team_id)
            .map(str::to_string)
            .unwrap_or_else(|| team_id.to_string())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
