//! SA completion forecast tests.

use chrono::{Month, NaiveDate};
use kpi_bonus_core::{
    error::BonusError,
    forecast::{
        evaluate_forecast, forecast, forecast_sa, months_until, throughput_for_scope, ForecastOutcome,
        ForecastScope, MonthlyThroughput,
    },
    sa_targets::{default_season_targets, SaTarget, TeamProgress},
};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn history(completed: &[u64], total: u64) -> Vec<MonthlyThroughput> {
    completed
        .iter()
        .map(|&jobs_completed| MonthlyThroughput { jobs_completed, total_jobs: total })
        .collect()
}

fn team(name: &str, jobs_completed: u64, target_jobs: u64) -> TeamProgress {
    TeamProgress {
        team_name: name.into(),
        jobs_completed,
        target_jobs,
        completed: 0.0,
    }
}

/// A season three months in: April–June recorded, the rest still to come.
fn season_table() -> Vec<SaTarget> {
    let mut targets = default_season_targets(1000);
    let recorded = [(60, 20, 40), (50, 15, 35), (70, 30, 40)];
    for (t, (org, audit, personal)) in targets.iter_mut().zip(recorded) {
        t.jobs_completed = org;
        t.team_breakdown = Some(vec![team("Audit", audit, 346), team("Personal", personal, 462)]);
    }
    targets
}

#[test]
fn months_until_wraps_and_treats_zero_as_full_cycle() {
    assert_eq!(months_until(date(2024, 6, 20), Month::January), 7);
    assert_eq!(months_until(date(2024, 12, 1), Month::January), 1);
    assert_eq!(months_until(date(2025, 1, 15), Month::January), 12);
    assert_eq!(months_until(date(2025, 2, 1), Month::January), 11);
    assert_eq!(months_until(date(2024, 3, 1), Month::April), 1);
}

#[test]
fn linear_projection_off_track() {
    let fc = forecast(&history(&[60, 50, 70, 0, 0], 1000), date(2024, 6, 20), Month::January);

    assert_eq!(fc.completed_jobs, 180);
    assert_eq!(fc.total_jobs, 1000);
    assert_eq!(fc.months_with_data, 3);
    assert!(approx(fc.avg_monthly_rate, 60.0));
    assert_eq!(fc.months_remaining, 7);
    assert!(approx(fc.projected_total_jobs, 600.0));
    assert!(approx(fc.forecasted_completion, 60.0));
    assert!(!fc.is_on_track);
    assert_eq!(fc.required_monthly_rate, 117); // 820 / 7 = 117.14
    assert_eq!(fc.projected_shortfall, 400);

    let months: Vec<&str> = fc.projection.iter().map(|p| p.month.as_str()).collect();
    assert_eq!(
        months,
        ["July", "August", "September", "October", "November", "December", "January"]
    );
    assert_eq!(fc.projection[0].projected_jobs, 240);
    assert_eq!(fc.projection[6].projected_jobs, 600);
}

#[test]
fn projection_is_capped_at_total_and_forecast_at_hundred() {
    let fc = forecast(&history(&[100, 100], 300), date(2024, 11, 10), Month::January);

    assert_eq!(fc.months_remaining, 2);
    assert!(approx(fc.forecasted_completion, 100.0));
    assert!(fc.is_on_track);
    assert_eq!(fc.required_monthly_rate, 50);
    assert_eq!(fc.projected_shortfall, 0);
    assert_eq!(fc.projection.len(), 2);
    assert_eq!(fc.projection[0].projected_jobs, 300);
    assert_eq!(fc.projection[1].projected_jobs, 300);
}

#[test]
fn on_track_threshold_is_ninety_nine() {
    let on = forecast(&history(&[90; 10], 1000), date(2024, 12, 5), Month::January);
    assert!(approx(on.forecasted_completion, 99.0));
    assert!(on.is_on_track);

    let off = forecast(&history(&[89; 10], 1000), date(2024, 12, 5), Month::January);
    assert!(approx(off.forecasted_completion, 97.9));
    assert!(!off.is_on_track);
}

#[test]
fn forecast_is_rounded_to_one_decimal() {
    // 65 + 21.67 × 7 = 216.67 of 346 → 62.62%
    let fc = forecast(
        &[
            MonthlyThroughput { jobs_completed: 20, total_jobs: 346 },
            MonthlyThroughput { jobs_completed: 15, total_jobs: 346 },
            MonthlyThroughput { jobs_completed: 30, total_jobs: 346 },
        ],
        date(2024, 6, 20),
        Month::January,
    );
    assert!(approx(fc.forecasted_completion, 62.6), "got {}", fc.forecasted_completion);
}

#[test]
fn no_completions_gives_zero_confidence_forecast() {
    let fc = forecast(&history(&[0, 0, 0], 840), date(2024, 6, 1), Month::January);

    assert_eq!(fc.forecasted_completion, 0.0);
    assert!(!fc.is_on_track);
    assert_eq!(fc.required_monthly_rate, 120); // 840 / 7
    assert_eq!(fc.projected_shortfall, 840);
    assert!(fc.projection.iter().all(|p| p.projected_jobs == 0));
}

#[test]
fn nothing_to_do_is_complete() {
    let fc = forecast(&[], date(2024, 6, 1), Month::January);
    assert_eq!(fc.total_jobs, 0);
    assert_eq!(fc.forecasted_completion, 100.0);
    assert!(fc.is_on_track);
    assert_eq!(fc.projected_shortfall, 0);
}

#[test]
fn more_months_remaining_never_lowers_the_forecast() {
    let hist = history(&[40, 55, 35], 2000);
    // December (1 month left) back to February (11 months left).
    let dates = [
        date(2024, 12, 1), date(2024, 11, 1), date(2024, 10, 1), date(2024, 9, 1),
        date(2024, 8, 1), date(2024, 7, 1), date(2024, 6, 1), date(2024, 5, 1),
        date(2024, 4, 1), date(2024, 3, 1), date(2024, 2, 1),
    ];
    let mut last = 0.0;
    for (i, d) in dates.iter().enumerate() {
        let fc = forecast(&hist, *d, Month::January);
        assert_eq!(fc.months_remaining as usize, i + 1);
        assert!(fc.forecasted_completion >= last, "forecast dropped at {d}");
        assert_eq!(fc.is_on_track, fc.forecasted_completion >= 99.0);
        last = fc.forecasted_completion;
    }
}

#[test]
fn organisation_scope_reads_global_totals() {
    let targets = season_table();
    let fc = forecast_sa(&targets, date(2024, 6, 20), &ForecastScope::Organization, Month::January).unwrap();

    assert_eq!(fc.completed_jobs, 180);
    assert_eq!(fc.total_jobs, 1000);
    assert!(approx(fc.forecasted_completion, 60.0));
}

#[test]
fn team_scope_reads_team_breakdown() {
    let targets = season_table();
    let rows = throughput_for_scope(&targets, &ForecastScope::Team("Audit".into()));
    assert_eq!(rows.len(), 10);
    assert_eq!(rows[0], MonthlyThroughput { jobs_completed: 20, total_jobs: 346 });
    assert_eq!(rows[9], MonthlyThroughput { jobs_completed: 0, total_jobs: 0 });

    let fc = forecast_sa(&targets, date(2024, 6, 20), &ForecastScope::Team("Audit".into()), Month::January).unwrap();
    assert_eq!(fc.completed_jobs, 65);
    assert_eq!(fc.total_jobs, 346);
    assert!(approx(fc.forecasted_completion, 62.6), "got {}", fc.forecasted_completion);
}

#[test]
fn unknown_team_scope_is_an_error() {
    let result = forecast_sa(
        &season_table(),
        date(2024, 6, 20),
        &ForecastScope::Team("Nobody".into()),
        Month::January,
    );
    assert!(matches!(result, Err(BonusError::UnknownTeam { .. })));
}

#[test]
fn raw_table_has_new_clients_folded_in() {
    let mut targets = season_table();
    targets[1].new_clients = Some(200);

    let outcome = evaluate_forecast(&targets, date(2024, 6, 20), &ForecastScope::Organization, Month::January).unwrap();
    let ForecastOutcome::Forecast(fc) = outcome else {
        panic!("expected a forecast, got {outcome:?}");
    };
    // 180 done + 60/month over 7 months = 600 of 1200.
    assert_eq!(fc.total_jobs, 1200);
    assert!(approx(fc.forecasted_completion, 50.0), "got {}", fc.forecasted_completion);
}

#[test]
fn invalid_table_is_rejected_without_forecasting() {
    let mut targets = season_table();
    targets[3].target = 1.0;
    targets[0].jobs_completed = 5000;

    let outcome = evaluate_forecast(&targets, date(2024, 6, 20), &ForecastScope::Organization, Month::January).unwrap();
    match outcome {
        ForecastOutcome::Rejected { errors } => {
            assert_eq!(errors.len(), 2, "{errors:?}");
            assert!(errors.iter().any(|e| e.contains("exceeds")));
            assert!(errors.iter().any(|e| e.contains("cumulative target")));
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}
