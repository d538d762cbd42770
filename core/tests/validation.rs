//! Input validation tests.

use kpi_bonus_core::{
    bonus::KpiScores,
    sa_targets::default_season_targets,
    seasonal::TeamMonthInput,
    validation::{validate_kpi_input, validate_sa_targets, validate_team_months},
};

fn scores(accounts: Vec<f64>, vat: Vec<f64>, sa: Vec<f64>) -> KpiScores {
    KpiScores { accounts, vat, sa }
}

#[test]
fn well_formed_input_has_no_errors() {
    let errors = validate_kpi_input(&scores(vec![1.0, 2.0, 3.0], vec![1.0, 2.0, 3.0], vec![1.0, 2.0, 3.0]));
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");

    let bounds = validate_kpi_input(&scores(vec![0.0, 100.0, 50.0], vec![0.0; 3], vec![100.0; 3]));
    assert!(bounds.is_empty(), "0 and 100 are valid: {bounds:?}");
}

#[test]
fn wrong_length_names_the_category() {
    let errors = validate_kpi_input(&scores(vec![1.0, 2.0], vec![1.0, 2.0, 3.0], vec![1.0, 2.0, 3.0]));
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("accounts"), "got {errors:?}");

    let errors = validate_kpi_input(&scores(vec![1.0, 2.0, 3.0], vec![1.0, 2.0, 3.0, 4.0], vec![]));
    assert!(errors.iter().any(|e| e.contains("vat")));
    assert!(errors.iter().any(|e| e.contains("sa")));
}

#[test]
fn out_of_range_value_names_the_month() {
    let errors = validate_kpi_input(&scores(vec![1.0, 2.0, 3.0], vec![1.0, 2.0, 3.0], vec![1.0, 150.0, 3.0]));
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("sa month 2"), "got {errors:?}");
    assert!(errors[0].contains("150"));

    let errors = validate_kpi_input(&scores(vec![-0.5, 2.0, 3.0], vec![1.0, 2.0, 3.0], vec![1.0, 2.0, 3.0]));
    assert!(errors[0].contains("accounts month 1"), "got {errors:?}");
}

#[test]
fn non_finite_values_are_rejected() {
    let errors = validate_kpi_input(&scores(
        vec![f64::NAN, 2.0, 3.0],
        vec![1.0, f64::INFINITY, 3.0],
        vec![1.0, 2.0, 3.0],
    ));
    assert_eq!(errors.len(), 2, "got {errors:?}");
    assert!(errors.iter().all(|e| e.contains("finite")));
}

#[test]
fn team_months_need_calendar_month_and_valid_values() {
    let rows = vec![
        TeamMonthInput { month: 13, accounts: 90.0, vat: 90.0, sa: 90.0 },
        TeamMonthInput { month: 6, accounts: 90.0, vat: 101.0, sa: 90.0 },
        TeamMonthInput { month: 7, accounts: 90.0, vat: 90.0, sa: 0.0 },
    ];
    let errors = validate_team_months(&rows);
    assert_eq!(errors.len(), 2, "got {errors:?}");
    assert!(errors[0].contains("row 1"));
    assert!(errors[1].contains("row 2 vat"));
}

#[test]
fn default_season_table_is_valid() {
    assert!(validate_sa_targets(&default_season_targets(500)).is_empty());
}

#[test]
fn decreasing_cumulative_target_is_reported() {
    let mut targets = default_season_targets(500);
    targets[4].target = 25.0; // August below July's 30

    let errors = validate_sa_targets(&targets);
    assert_eq!(errors.len(), 1, "got {errors:?}");
    assert!(errors[0].contains("August"));
}

#[test]
fn completed_jobs_above_total_is_reported() {
    let mut targets = default_season_targets(100);
    targets[0].jobs_completed = 101;

    let errors = validate_sa_targets(&targets);
    assert!(errors.iter().any(|e| e.contains("April") && e.contains("101")));
}
