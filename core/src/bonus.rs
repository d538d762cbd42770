//! Bonus calculation.
//!
//! Two entry points, serving two different screens:
//!   - `calculate_bonus` - the per-employee bonus calculator. Category
//!     points scale with the configured weights; SA passes through the
//!     fiscal-period hook before aggregation.
//!   - `calculate_team_bonus` - the team dashboard. Fixed 40/30/30 caps,
//!     the seasonal multiplier table, and the missing-SA branches.
//!
//! Both are pure: identical inputs always give identical output.

use crate::{
    aggregate::{aggregate, KpiResult},
    config::{check_divisor, BonusConfig, KpiWeights, SeasonalFactors, TOTAL_WEIGHT},
    error::BonusResult,
    fiscal::{determine_fiscal_period, FiscalPeriod},
    seasonal::{adjust_sa_for_fiscal_period, team_month_score, TeamMonthInput, TeamMonthScore},
    types::{EmployeeId, KpiCategory, Percentage, Points, MONTHS_PER_QUARTER},
    validation::validate_kpi_input,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ── Inputs ─────────────────────────────────────────────────────────

/// Raw monthly percentages per category. Each list should hold exactly
/// three values; `validate_kpi_input` reports any that do not.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct KpiScores {
    #[serde(default)]
    pub accounts: Vec<Percentage>,
    #[serde(default)]
    pub vat:      Vec<Percentage>,
    #[serde(default)]
    pub sa:       Vec<Percentage>,
}

impl KpiScores {
    pub fn new(
        accounts: [Percentage; MONTHS_PER_QUARTER],
        vat: [Percentage; MONTHS_PER_QUARTER],
        sa: [Percentage; MONTHS_PER_QUARTER],
    ) -> Self {
        Self {
            accounts: accounts.to_vec(),
            vat:      vat.to_vec(),
            sa:       sa.to_vec(),
        }
    }

    pub fn category(&self, category: KpiCategory) -> &[Percentage] {
        match category {
            KpiCategory::Accounts => &self.accounts,
            KpiCategory::Vat      => &self.vat,
            KpiCategory::Sa       => &self.sa,
        }
    }

    fn category_mut(&mut self, category: KpiCategory) -> &mut Vec<Percentage> {
        match category {
            KpiCategory::Accounts => &mut self.accounts,
            KpiCategory::Vat      => &mut self.vat,
            KpiCategory::Sa       => &mut self.sa,
        }
    }

    /// The three months of a category. Missing months read as 0.
    pub fn months(&self, category: KpiCategory) -> [Percentage; MONTHS_PER_QUARTER] {
        let values = self.category(category);
        std::array::from_fn(|i| values.get(i).copied().unwrap_or(0.0))
    }

    /// Edit a single month (0-based), filling any gap before it with 0.
    pub fn set_month(&mut self, category: KpiCategory, month: usize, value: Percentage) {
        let values = self.category_mut(category);
        if values.len() <= month {
            values.resize(month + 1, 0.0);
        }
        values[month] = value;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeData {
    pub id:             EmployeeId,
    pub name:           String,
    pub monthly_salary: f64,
    #[serde(default)]
    pub kpi_scores:     KpiScores,
}

// ── Employee bonus ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BonusCalculation {
    pub employee_id:      EmployeeId,
    pub fiscal_period:    FiscalPeriod,
    pub accounts:         KpiResult,
    pub vat:              KpiResult,
    pub sa:               KpiResult,
    /// Sum of the three categories' total points, 0–100.
    pub total_score:      Points,
    pub bonus_percentage: f64,
    pub bonus_amount:     f64,
    pub quarterly_pool:   f64,
}

/// Score an employee's quarter and derive the bonus.
///
/// Expects input that already passed `validate_kpi_input`. Only the
/// divisor is checked here, since a zero divisor is a configuration bug.
pub fn calculate_bonus(
    employee: &EmployeeData,
    weights: &KpiWeights,
    bonus_pool_divisor: f64,
    fiscal_period: FiscalPeriod,
) -> BonusResult<BonusCalculation> {
    check_divisor(bonus_pool_divisor).map_err(|e| {
        log::warn!("bonus: employee={} {e}", employee.id);
        e
    })?;

    let quarterly_pool = employee.monthly_salary / bonus_pool_divisor;
    let scores = &employee.kpi_scores;

    let accounts = aggregate(scores.months(KpiCategory::Accounts), weights.accounts_weight);
    let vat = aggregate(scores.months(KpiCategory::Vat), weights.vat_weight);
    let sa_months = adjust_sa_for_fiscal_period(scores.months(KpiCategory::Sa), fiscal_period);
    let sa = aggregate(sa_months, weights.sa_weight);

    let total_score = accounts.total_points + vat.total_points + sa.total_points;
    let bonus_percentage = total_score / TOTAL_WEIGHT;
    let bonus_amount = bonus_percentage * quarterly_pool;

    log::debug!(
        "bonus: employee={} {fiscal_period} accounts={:.2} vat={:.2} sa={:.2}",
        employee.id, accounts.total_points, vat.total_points, sa.total_points
    );

    Ok(BonusCalculation {
        employee_id: employee.id.clone(),
        fiscal_period,
        accounts,
        vat,
        sa,
        total_score,
        bonus_percentage,
        bonus_amount,
        quarterly_pool,
    })
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BonusOutcome {
    Calculated(BonusCalculation),
    Rejected {
        employee_id: EmployeeId,
        errors:      Vec<String>,
    },
}

/// Validate, then calculate. Invalid KPI input is returned as
/// `Rejected` without running the calculation.
pub fn evaluate_employee(
    employee: &EmployeeData,
    config: &BonusConfig,
    date: NaiveDate,
) -> BonusResult<BonusOutcome> {
    let errors = validate_kpi_input(&employee.kpi_scores);
    if !errors.is_empty() {
        log::warn!("bonus: employee={} rejected: {}", employee.id, errors.join("; "));
        return Ok(BonusOutcome::Rejected {
            employee_id: employee.id.clone(),
            errors,
        });
    }

    let fiscal_period = determine_fiscal_period(date);
    let calc = calculate_bonus(
        employee,
        &config.weights,
        config.weights.bonus_pool_divisor,
        fiscal_period,
    )?;

    log::info!(
        "bonus: employee={} {fiscal_period} score={:.2} amount={:.2}",
        employee.id, calc.total_score, calc.bonus_amount
    );
    Ok(BonusOutcome::Calculated(calc))
}

/// `evaluate_employee` over a batch. Stops at the first configuration error.
pub fn evaluate_all(
    employees: &[EmployeeData],
    config: &BonusConfig,
    date: NaiveDate,
) -> BonusResult<Vec<BonusOutcome>> {
    employees
        .iter()
        .map(|e| evaluate_employee(e, config, date))
        .collect()
}

// ── Team dashboard bonus ───────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TeamBonus {
    pub months:         Vec<TeamMonthScore>,
    /// Mean of the monthly adjusted scores. May exceed 100 in peak months.
    pub average_score:  Points,
    /// `average_score` capped at 100; the share of the pool paid out.
    pub payout_score:   Points,
    pub quarterly_pool: f64,
    pub bonus_amount:   f64,
}

/// Dashboard bonus for a team (or staff member) over any run of months.
pub fn calculate_team_bonus(
    months: &[TeamMonthInput],
    salary_pool: f64,
    bonus_pool_divisor: f64,
    factors: &SeasonalFactors,
) -> BonusResult<TeamBonus> {
    check_divisor(bonus_pool_divisor)?;

    let scores: Vec<TeamMonthScore> = months
        .iter()
        .map(|m| team_month_score(m, factors))
        .collect();

    let average_score = if scores.is_empty() {
        0.0
    } else {
        scores.iter().map(|s| s.adjusted_points).sum::<f64>() / scores.len() as f64
    };
    let payout_score = average_score.clamp(0.0, TOTAL_WEIGHT);
    let quarterly_pool = salary_pool / bonus_pool_divisor;
    let bonus_amount = payout_score / TOTAL_WEIGHT * quarterly_pool;

    log::info!(
        "bonus: team dashboard over {} months score={average_score:.2} amount={bonus_amount:.2}",
        scores.len()
    );

    Ok(TeamBonus {
        months: scores,
        average_score,
        payout_score,
        quarterly_pool,
        bonus_amount,
    })
}
