//! SA completion forecasting.
//!
//! A linear projection: the average monthly throughput over months that
//! recorded any completions, carried forward to the end of the season.
//! Works the same for the whole organisation or a single team; team
//! scope just reads the team's jobs and target from the breakdown.

use crate::{
    error::{BonusError, BonusResult},
    sa_targets::{round1, with_new_clients, SaTarget},
    types::{Percentage, TeamName},
    validation::validate_sa_targets,
};
use chrono::{Datelike, Month, NaiveDate};
use serde::{Deserialize, Serialize};

/// At or above this forecast a season counts as on track. One point of
/// slack absorbs rounding in the projection.
pub const ON_TRACK_THRESHOLD: Percentage = 99.0;

const CALENDAR: [Month; 12] = [
    Month::January, Month::February, Month::March, Month::April,
    Month::May, Month::June, Month::July, Month::August,
    Month::September, Month::October, Month::November, Month::December,
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyThroughput {
    pub jobs_completed: u64,
    pub total_jobs:     u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionPoint {
    pub month:          String,
    /// Projected running total of completed jobs, capped at the total.
    pub projected_jobs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SaForecast {
    pub completed_jobs:        u64,
    pub total_jobs:            u64,
    pub months_with_data:      usize,
    pub avg_monthly_rate:      f64,
    pub months_remaining:      u32,
    pub projected_total_jobs:  f64,
    /// Projected year-end completion, capped at 100, one decimal place.
    pub forecasted_completion: Percentage,
    pub is_on_track:           bool,
    pub required_monthly_rate: u64,
    pub projected_shortfall:   u64,
    pub projection:            Vec<ProjectionPoint>,
}

/// Months from `current` until the season ends. Landing on the end month
/// itself counts as a full cycle: the next season has just begun.
pub fn months_until(current: NaiveDate, season_end: Month) -> u32 {
    let end0 = season_end.number_from_month() - 1;
    let distance = (end0 + 12 - current.month0()) % 12;
    if distance == 0 {
        12
    } else {
        distance
    }
}

fn projection(
    current: NaiveDate,
    months_remaining: u32,
    completed_jobs: u64,
    avg_monthly_rate: f64,
    total_jobs: u64,
) -> Vec<ProjectionPoint> {
    (1..=months_remaining)
        .map(|step| {
            let month = CALENDAR[((current.month0() + step) % 12) as usize];
            let running = completed_jobs as f64 + avg_monthly_rate * step as f64;
            ProjectionPoint {
                month: month.name().to_string(),
                projected_jobs: (running.round() as u64).min(total_jobs),
            }
        })
        .collect()
}

/// Project year-end SA completion from monthly history.
///
/// `total_jobs` is read from the most recent entry, which already includes
/// any clients added during the season.
pub fn forecast(history: &[MonthlyThroughput], current: NaiveDate, season_end: Month) -> SaForecast {
    let completed_jobs: u64 = history.iter().map(|h| h.jobs_completed).sum();
    let total_jobs = history.last().map(|h| h.total_jobs).unwrap_or(0);
    let months_with_data = history.iter().filter(|h| h.jobs_completed > 0).count();
    let months_remaining = months_until(current, season_end);

    if total_jobs == 0 {
        log::debug!("forecast: no jobs in scope, nothing to project");
        return SaForecast {
            completed_jobs,
            total_jobs,
            months_with_data,
            avg_monthly_rate: 0.0,
            months_remaining,
            projected_total_jobs: completed_jobs as f64,
            forecasted_completion: 100.0,
            is_on_track: true,
            required_monthly_rate: 0,
            projected_shortfall: 0,
            projection: Vec::new(),
        };
    }

    if months_with_data == 0 {
        log::info!("forecast: no completions recorded yet, {total_jobs} jobs outstanding");
        return SaForecast {
            completed_jobs,
            total_jobs,
            months_with_data,
            avg_monthly_rate: 0.0,
            months_remaining,
            projected_total_jobs: 0.0,
            forecasted_completion: 0.0,
            is_on_track: false,
            required_monthly_rate: (total_jobs as f64 / months_remaining as f64).round() as u64,
            projected_shortfall: total_jobs,
            projection: projection(current, months_remaining, 0, 0.0, total_jobs),
        };
    }

    let avg_monthly_rate = completed_jobs as f64 / months_with_data as f64;
    let projected_total_jobs = completed_jobs as f64 + avg_monthly_rate * months_remaining as f64;
    let forecasted_completion =
        round1((projected_total_jobs / total_jobs as f64 * 100.0).min(100.0));
    let is_on_track = forecasted_completion >= ON_TRACK_THRESHOLD;

    let outstanding = total_jobs.saturating_sub(completed_jobs) as f64;
    let required_monthly_rate = if months_remaining > 0 {
        (outstanding / months_remaining as f64).round() as u64
    } else {
        outstanding.round() as u64
    };
    let projected_shortfall = (total_jobs as f64 - projected_total_jobs).max(0.0).round() as u64;

    log::info!(
        "forecast: {completed_jobs}/{total_jobs} done, {avg_monthly_rate:.1}/month over {months_remaining} months -> {forecasted_completion}% (on_track={is_on_track})"
    );

    SaForecast {
        completed_jobs,
        total_jobs,
        months_with_data,
        avg_monthly_rate,
        months_remaining,
        projected_total_jobs,
        forecasted_completion,
        is_on_track,
        required_monthly_rate,
        projected_shortfall,
        projection: projection(current, months_remaining, completed_jobs, avg_monthly_rate, total_jobs),
    }
}

// ── Scope ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "scope", content = "team", rename_all = "snake_case")]
pub enum ForecastScope {
    Organization,
    Team(TeamName),
}

/// Monthly rows for the given scope. A month with no breakdown entry for
/// the team contributes a zero row.
pub fn throughput_for_scope(targets: &[SaTarget], scope: &ForecastScope) -> Vec<MonthlyThroughput> {
    targets
        .iter()
        .map(|t| match scope {
            ForecastScope::Organization => MonthlyThroughput {
                jobs_completed: t.jobs_completed,
                total_jobs:     t.total_jobs,
            },
            ForecastScope::Team(name) => match t.team(name) {
                Some(team) => MonthlyThroughput {
                    jobs_completed: team.jobs_completed,
                    total_jobs:     team.target_jobs,
                },
                None => MonthlyThroughput { jobs_completed: 0, total_jobs: 0 },
            },
        })
        .collect()
}

/// Forecast straight from the season's target table.
///
/// `targets` must already have mid-season clients folded in by
/// `with_new_clients`; `total_jobs` is read as-is. Use `evaluate_forecast`
/// for a raw table. A team scope that matches no breakdown row in any
/// month is an error.
pub fn forecast_sa(
    targets: &[SaTarget],
    current: NaiveDate,
    scope: &ForecastScope,
    season_end: Month,
) -> BonusResult<SaForecast> {
    if let ForecastScope::Team(name) = scope {
        if !targets.iter().any(|t| t.team(name).is_some()) {
            return Err(BonusError::UnknownTeam { name: name.clone() });
        }
    }

    let mut history = throughput_for_scope(targets, scope);
    // Team rows for months missing the team carry no total; use the last known one.
    if let Some(last_total) = history.iter().rev().map(|h| h.total_jobs).find(|t| *t > 0) {
        if let Some(last) = history.last_mut() {
            last.total_jobs = last.total_jobs.max(last_total);
        }
    }
    Ok(forecast(&history, current, season_end))
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ForecastOutcome {
    Forecast(SaForecast),
    Rejected { errors: Vec<String> },
}

/// Validate a raw target table, fold in new clients, then forecast.
/// An invalid table is returned as `Rejected` without forecasting.
pub fn evaluate_forecast(
    raw_targets: &[SaTarget],
    current: NaiveDate,
    scope: &ForecastScope,
    season_end: Month,
) -> BonusResult<ForecastOutcome> {
    let errors = validate_sa_targets(raw_targets);
    if !errors.is_empty() {
        log::warn!("forecast: rejected target table: {}", errors.join("; "));
        return Ok(ForecastOutcome::Rejected { errors });
    }

    let targets = with_new_clients(raw_targets);
    Ok(ForecastOutcome::Forecast(forecast_sa(&targets, current, scope, season_end)?))
}
