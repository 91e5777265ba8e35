//! Request keys identifying one cached league response

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Views requested when the caller does not name any
pub const DEFAULT_VIEWS: [&str; 2] = ["mMatchup", "mTeam"];

/// Identifies a single upstream request: league, season, scoring period and views.
///
/// Views are held in a sorted set, so two keys built from the same views in a
/// different order compare equal and map to the same cache file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestKey {
    /// Opaque league identifier
    pub league_id: String,
    /// Season year
    pub year: i32,
    /// Scoring period (week), starting at 1
    pub period: u32,
    /// Requested views
    pub views: BTreeSet<String>,
}

impl RequestKey {
    /// Builds a key, falling back to [`DEFAULT_VIEWS`] when `views` is empty.
    pub fn new<I, S>(league_id: impl Into<String>, year: i32, period: u32, views: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut views: BTreeSet<String> = views.into_iter().map(Into::<String>::into).collect();
        if views.is_empty() {
            views = DEFAULT_VIEWS.iter().map(|v| v.to_string()).collect();
        }
        Self {
            league_id: league_id.into(),
            year,
            period,
            views,
        }
    }

    /// Returns the views in sorted order
    pub fn views(&self) -> impl Iterator<Item = &str> {
        self.views.iter().map(String::as_str)
    }

    /// File name for this key inside its league/year directory
    pub(crate) fn file_name(&self) -> String {
        let views: Vec<String> = self.views().map(sanitize).collect();
        format!("period_{:02}_{}.json", self.period, views.join("_"))
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let views: Vec<&str> = self.views().collect();
        write!(
            f,
            "league={} year={} period={} views=[{}]",
            self.league_id,
            self.year,
            self.period,
            views.join(",")
        )
    }
}

/// Encodes a value as a path component
///
/// ASCII alphanumerics pass through; every other byte, `-` included, becomes
/// `-XX` (lowercase hex). Distinct inputs always give distinct outputs, and
/// `_` never appears in an encoded value so it can join several of them.
/// The empty string encodes as `-`.
pub(crate) fn sanitize(component: &str) -> String {
    if component.is_empty() {
        return "-".to_string();
    }
    let mut encoded = String::with_capacity(component.len());
    for byte in component.bytes() {
        if byte.is_ascii_alphanumeric() {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("-{:02x}", byte));
        }
    }
    encoded
}
