//! Input validation.
//!
//! Bad user data is reported, never raised: each function returns the list
//! of problems found, and an empty list means the input is valid. Callers
//! must not score input that produced errors.

use crate::{
    bonus::KpiScores,
    sa_targets::SaTarget,
    seasonal::TeamMonthInput,
    types::{KpiCategory, Percentage, MONTHS_PER_QUARTER},
};

fn check_percentage(label: &str, value: Percentage, errors: &mut Vec<String>) {
    if !value.is_finite() {
        errors.push(format!("{label}: value is not a finite number"));
    } else if !(0.0..=100.0).contains(&value) {
        errors.push(format!("{label}: {value} is outside the range 0-100"));
    }
}

/// Check shape and range of an employee's KPI scores.
pub fn validate_kpi_input(scores: &KpiScores) -> Vec<String> {
    let mut errors = Vec::new();

    for category in KpiCategory::ALL {
        let months = scores.category(category);
        if months.len() != MONTHS_PER_QUARTER {
            errors.push(format!(
                "{category}: expected {MONTHS_PER_QUARTER} monthly values, got {}",
                months.len()
            ));
        }
        for (i, value) in months.iter().enumerate() {
            check_percentage(&format!("{category} month {}", i + 1), *value, &mut errors);
        }
    }

    if !errors.is_empty() {
        log::warn!("validation: {} KPI input error(s)", errors.len());
    }
    errors
}

/// Check dashboard month rows: a real calendar month and in-range values.
pub fn validate_team_months(months: &[TeamMonthInput]) -> Vec<String> {
    let mut errors = Vec::new();

    for (i, row) in months.iter().enumerate() {
        if !(1..=12).contains(&row.month) {
            errors.push(format!("row {}: month {} is not a calendar month", i + 1, row.month));
        }
        check_percentage(&format!("row {} accounts", i + 1), row.accounts, &mut errors);
        check_percentage(&format!("row {} vat", i + 1), row.vat, &mut errors);
        check_percentage(&format!("row {} sa", i + 1), row.sa, &mut errors);
    }
    errors
}

/// Cumulative SA targets must stay in [0, 100] and never decrease.
pub fn validate_sa_targets(targets: &[SaTarget]) -> Vec<String> {
    let mut errors = Vec::new();
    let mut previous: Option<&SaTarget> = None;

    for target in targets {
        check_percentage(&format!("{} target", target.month), target.target, &mut errors);
        check_percentage(&format!("{} completed", target.month), target.completed, &mut errors);

        if target.jobs_completed > target.total_jobs {
            errors.push(format!(
                "{}: {} jobs completed exceeds {} total jobs",
                target.month, target.jobs_completed, target.total_jobs
            ));
        }

        if let Some(prev) = previous {
            if target.target < prev.target {
                errors.push(format!(
                    "{}: cumulative target {} is below {}'s {}",
                    target.month, target.target, prev.month, prev.target
                ));
            }
        }
        previous = Some(target);
    }
    errors
}
