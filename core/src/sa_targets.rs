//! SA season target table.
//!
//! The SA season runs ten months, April through January. Each month
//! carries a cumulative completion target that never decreases.

use crate::types::{Percentage, TeamName};
use chrono::Month;
use serde::{Deserialize, Serialize};

/// Season months in order, with their cumulative target percentage.
pub const SEASON_TARGETS: [(Month, Percentage); 10] = [
    (Month::April, 5.0),
    (Month::May, 10.0),
    (Month::June, 20.0),
    (Month::July, 30.0),
    (Month::August, 40.0),
    (Month::September, 50.0),
    (Month::October, 60.0),
    (Month::November, 75.0),
    (Month::December, 90.0),
    (Month::January, 100.0),
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TeamProgress {
    pub team_name:      TeamName,
    pub jobs_completed: u64,
    pub target_jobs:    u64,
    pub completed:      Percentage,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SaTarget {
    pub month:          String,
    /// Cumulative target percentage for this month.
    pub target:         Percentage,
    pub completed:      Percentage,
    pub jobs_completed: u64,
    pub total_jobs:     u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_breakdown: Option<Vec<TeamProgress>>,
    /// Jobs added this month. Raises `total_jobs` for this and later months.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_clients:    Option<u64>,
}

impl SaTarget {
    /// Positive when ahead of the cumulative target.
    pub fn completion_gap(&self) -> Percentage {
        self.completed - self.target
    }

    pub fn team(&self, name: &str) -> Option<&TeamProgress> {
        self.team_breakdown
            .as_ref()
            .and_then(|teams| teams.iter().find(|t| t.team_name == name))
    }
}

/// Completed share as a percentage, one decimal place. Zero jobs → 0.
pub fn completion_percentage(jobs_completed: u64, total_jobs: u64) -> Percentage {
    if total_jobs == 0 {
        return 0.0;
    }
    round1(jobs_completed as f64 / total_jobs as f64 * 100.0)
}

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// An empty season table for `total_jobs` returns.
pub fn default_season_targets(total_jobs: u64) -> Vec<SaTarget> {
    SEASON_TARGETS
        .iter()
        .map(|(month, target)| SaTarget {
            month: month.name().to_string(),
            target: *target,
            completed: 0.0,
            jobs_completed: 0,
            total_jobs,
            team_breakdown: None,
            new_clients: None,
        })
        .collect()
}

/// Fold each month's new clients into its own and every later month's
/// `total_jobs`, and recompute `completed` against the grown totals.
///
/// Takes the raw table and returns a new one; applying it to its own
/// output would count the new clients twice.
pub fn with_new_clients(targets: &[SaTarget]) -> Vec<SaTarget> {
    let mut added = 0;
    targets
        .iter()
        .map(|t| {
            added += t.new_clients.unwrap_or(0);
            if added == 0 {
                return t.clone();
            }
            let total_jobs = t.total_jobs + added;
            SaTarget {
                total_jobs,
                completed: completion_percentage(t.jobs_completed, total_jobs),
                ..t.clone()
            }
        })
        .collect()
}
