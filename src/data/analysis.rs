//! Season summaries over week scores

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use super::{OwnerLookup, RankedScore, WeekScore};

/// Earliest season kept by [`filter_recent`] when no cutoff is given
pub const DEFAULT_MIN_YEAR: i32 = 2020;

/// Ranks scores within each season, highest points first
///
/// Tied scores share the lowest rank ("min" ranking): 100, 90, 90, 80 rank
/// as 1, 2, 2, 4.
pub fn add_ranks(records: &[WeekScore]) -> Vec<RankedScore> {
    records
        .iter()
        .map(|record| {
            let better = records
                .iter()
                .filter(|other| other.season == record.season && other.points > record.points)
                .count();
            RankedScore {
                score: record.clone(),
                rank: better as u32 + 1,
            }
        })
        .collect()
}

/// Keeps records from `min_year` onwards
pub fn filter_recent(records: &[WeekScore], min_year: i32) -> Vec<WeekScore> {
    records
        .iter()
        .filter(|r| r.season >= min_year)
        .cloned()
        .collect()
}

/// One owner's points across seasons
#[derive(Debug, Clone, PartialEq)]
pub struct PivotRow {
    pub team_id: i64,
    pub owner: String,
    /// One cell per season in [`ScorePivot::seasons`]
    pub values: Vec<Option<f64>>,
}

impl PivotRow {
    /// Mean over the seasons that have a value
    pub fn mean(&self) -> Option<f64> {
        let present: Vec<f64> = self.values.iter().flatten().copied().collect();
        if present.is_empty() {
            None
        } else {
            Some(present.iter().sum::<f64>() / present.len() as f64)
        }
    }
}

/// Owners by seasons table of points
#[derive(Debug, Clone, PartialEq)]
pub struct ScorePivot {
    /// Column headers, ascending
    pub seasons: Vec<i32>,
    pub rows: Vec<PivotRow>,
}

impl ScorePivot {
    /// Values of one season column
    fn column(&self, index: usize) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().filter_map(move |row| row.values[index])
    }
}

/// Builds an owner-by-season table, rows ordered by mean points descending
///
/// A team scoring twice in the same season keeps its last record. Rows
/// without any value sort last.
pub fn pivot_scores(records: &[WeekScore], owners: &OwnerLookup) -> ScorePivot {
    let seasons: Vec<i32> = records
        .iter()
        .map(|r| r.season)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let column: BTreeMap<i32, usize> = seasons.iter().enumerate().map(|(i, s)| (*s, i)).collect();

    let mut cells: BTreeMap<i64, Vec<Option<f64>>> = BTreeMap::new();
    for record in records {
        let row = cells
            .entry(record.team_id)
            .or_insert_with(|| vec![None; seasons.len()]);
        row[column[&record.season]] = Some(record.points);
    }

    let mut rows: Vec<PivotRow> = cells
        .into_iter()
        .map(|(team_id, values)| PivotRow {
            team_id,
            owner: owners.display(team_id),
            values,
        })
        .collect();

    rows.sort_by(|a, b| match (a.mean(), b.mean()) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    ScorePivot { seasons, rows }
}

/// Min-max scales each season column to `[0, 1]`
///
/// A column whose values are all equal becomes 0.5; missing cells stay missing.
pub fn normalize_per_column(pivot: &ScorePivot) -> ScorePivot {
    let mut normed = pivot.clone();
    for index in 0..pivot.seasons.len() {
        let (min, max) = pivot
            .column(index)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        if min > max {
            continue;
        }
        for row in &mut normed.rows {
            if let Some(value) = row.values[index] {
                row.values[index] = Some(if max > min {
                    (value - min) / (max - min)
                } else {
                    0.5
                });
            }
        }
    }
    normed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(season: i32, team_id: i64, points: f64) -> WeekScore {
        WeekScore {
            season,
            team_id,
            points,
        }
    }

    #[test]
    fn test_ranks_are_per_season_with_min_ties() {
        let records = vec![
            score(2022, 1, 100.0),
            score(2022, 2, 90.0),
            score(2022, 3, 90.0),
            score(2022, 4, 80.0),
            score(2023, 1, 10.0),
        ];
        let ranks: Vec<u32> = add_ranks(&records).iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 2, 4, 1]);
    }

    #[test]
    fn test_filter_recent() {
        let records = vec![score(2018, 1, 1.0), score(2020, 1, 2.0), score(2024, 1, 3.0)];
        let recent = filter_recent(&records, DEFAULT_MIN_YEAR);
        assert_eq!(recent.len(), 2);
        assert!(recent.iter().all(|r| r.season >= 2020));
    }

    #[test]
    fn test_pivot_orders_rows_by_mean() {
        let mut owners = OwnerLookup::default();
        owners.insert(1, "Low");
        owners.insert(2, "High");
        let records = vec![
            score(2022, 1, 80.0),
            score(2023, 1, 90.0),
            score(2022, 2, 120.0),
            score(2024, 3, 100.0),
        ];

        let pivot = pivot_scores(&records, &owners);

        assert_eq!(pivot.seasons, vec![2022, 2023, 2024]);
        let owners: Vec<&str> = pivot.rows.iter().map(|r| r.owner.as_str()).collect();
        assert_eq!(owners, vec!["High", "3", "Low"]);
        assert_eq!(pivot.rows[2].values, vec![Some(80.0), Some(90.0), None]);
        assert_eq!(pivot.rows[2].mean(), Some(85.0));
    }

    #[test]
    fn test_pivot_of_nothing_is_empty() {
        let pivot = pivot_scores(&[], &OwnerLookup::default());
        assert!(pivot.seasons.is_empty());
        assert!(pivot.rows.is_empty());
    }

    #[test]
    fn test_normalize_scales_each_column() {
        let records = vec![
            score(2022, 1, 50.0),
            score(2022, 2, 150.0),
            score(2022, 3, 100.0),
            score(2023, 1, 70.0),
            score(2023, 2, 70.0),
        ];
        let pivot = pivot_scores(&records, &OwnerLookup::default());
        let normed = normalize_per_column(&pivot);

        let by_team = |id: i64| {
            normed
                .rows
                .iter()
                .find(|r| r.team_id == id)
                .map(|r| r.values.clone())
                .unwrap()
        };
        assert_eq!(by_team(1), vec![Some(0.0), Some(0.5)]);
        assert_eq!(by_team(2), vec![Some(1.0), Some(0.5)]);
        assert_eq!(by_team(3), vec![Some(0.5), None]);
    }
}
