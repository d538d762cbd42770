//! Seasonal SA adjustments.
//!
//! Two unrelated paths share this module:
//!   1. `adjust_sa_for_fiscal_period` - the per-quarter hook used by the
//!      bonus calculator. It is currently an identity transform in every
//!      quarter. Keep the four arms: quarter-specific stringency goes there.
//!   2. `team_month_score` - the team dashboard score, which applies the
//!      calendar-month multiplier table and handles months with no SA data.

use crate::{
    config::SeasonalFactors,
    fiscal::FiscalPeriod,
    scoring::fixed_points_for,
    types::{KpiCategory, Percentage, Points, MONTHS_PER_QUARTER},
};
use serde::{Deserialize, Serialize};

/// Calendar months outside the SA filing season (Apr–Sep).
pub const NON_SA_MONTHS: [u32; 6] = [4, 5, 6, 7, 8, 9];

/// Calendar months inside the SA filing season (Oct–Mar).
pub const SA_SEASON_MONTHS: [u32; 6] = [10, 11, 12, 1, 2, 3];

/// Accounts + VAT fixed caps; the share rescaled up to 100 when SA is absent.
pub const ACCOUNTS_VAT_SHARE: Points = 70.0;

/// Applied to the Accounts + VAT sum when SA is missing in season.
pub const SA_SEASON_PENALTY: f64 = 0.8;

// ── Bonus-calculator hook ──────────────────────────────────────────

/// Quarter-aware rescaling of raw SA percentages.
///
/// Intentionally inert: every quarter passes the values through unchanged.
pub fn adjust_sa_for_fiscal_period(
    monthly_percentages: [Percentage; MONTHS_PER_QUARTER],
    fiscal_period: FiscalPeriod,
) -> [Percentage; MONTHS_PER_QUARTER] {
    match fiscal_period {
        FiscalPeriod::Q1 => monthly_percentages,
        FiscalPeriod::Q2 => monthly_percentages,
        FiscalPeriod::Q3 => monthly_percentages,
        FiscalPeriod::Q4 => monthly_percentages,
    }
}

// ── Team dashboard path ────────────────────────────────────────────

pub fn is_sa_season_month(month: u32) -> bool {
    SA_SEASON_MONTHS.contains(&month)
}

pub fn is_non_sa_month(month: u32) -> bool {
    NON_SA_MONTHS.contains(&month)
}

/// One team's (or staff member's) raw percentages for a calendar month.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TeamMonthInput {
    /// Calendar month, 1 = January.
    pub month:    u32,
    #[serde(default)]
    pub accounts: Percentage,
    #[serde(default)]
    pub vat:      Percentage,
    #[serde(default)]
    pub sa:       Percentage,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBranch {
    /// All three categories scored normally.
    Standard,
    /// No SA outside the season: Accounts + VAT rescaled from 70 to 100.
    AccountsVatRescaled,
    /// No SA during the season: Accounts + VAT penalised.
    SaSeasonPenalty,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TeamMonthScore {
    pub month:           u32,
    pub accounts_points: Points,
    pub vat_points:      Points,
    pub sa_points:       Points,
    /// Sum of the three fixed-cap point values.
    pub base_points:     Points,
    pub branch:          ScoreBranch,
    pub seasonal_factor: f64,
    /// Final score after the branch adjustment and seasonal multiplier.
    pub adjusted_points: Points,
}

pub fn team_month_score(input: &TeamMonthInput, factors: &SeasonalFactors) -> TeamMonthScore {
    let accounts_points = fixed_points_for(KpiCategory::Accounts, input.accounts);
    let vat_points = fixed_points_for(KpiCategory::Vat, input.vat);
    let sa_points = fixed_points_for(KpiCategory::Sa, input.sa);
    let base_points = accounts_points + vat_points + sa_points;
    let seasonal_factor = factors.factor_for(input.month);

    let missing_sa = input.sa == 0.0 && (input.accounts > 0.0 || input.vat > 0.0);
    let accounts_vat = accounts_points + vat_points;

    let (branch, before_season) = if missing_sa && is_non_sa_month(input.month) {
        (ScoreBranch::AccountsVatRescaled, accounts_vat * (100.0 / ACCOUNTS_VAT_SHARE))
    } else if missing_sa && is_sa_season_month(input.month) {
        (ScoreBranch::SaSeasonPenalty, accounts_vat * SA_SEASON_PENALTY)
    } else {
        (ScoreBranch::Standard, base_points)
    };

    let adjusted_points = before_season * seasonal_factor;

    log::debug!(
        "seasonal: month={} base={base_points:.2} branch={branch:?} factor={seasonal_factor:.2} adjusted={adjusted_points:.2}",
        input.month
    );

    TeamMonthScore {
        month: input.month,
        accounts_points,
        vat_points,
        sa_points,
        base_points,
        branch,
        seasonal_factor,
        adjusted_points,
    }
}
