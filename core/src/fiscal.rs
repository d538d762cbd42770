//! Fiscal period classification for an April-start fiscal year.

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum FiscalPeriod {
    Q1, // Apr–Jun
    Q2, // Jul–Sep
    Q3, // Oct–Dec
    Q4, // Jan–Mar
}

impl FiscalPeriod {
    /// Calendar months (1 = January) covered by this quarter.
    pub fn months(&self) -> [u32; 3] {
        match self {
            FiscalPeriod::Q1 => [4, 5, 6],
            FiscalPeriod::Q2 => [7, 8, 9],
            FiscalPeriod::Q3 => [10, 11, 12],
            FiscalPeriod::Q4 => [1, 2, 3],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FiscalPeriod::Q1 => "Q1",
            FiscalPeriod::Q2 => "Q2",
            FiscalPeriod::Q3 => "Q3",
            FiscalPeriod::Q4 => "Q4",
        }
    }
}

impl fmt::Display for FiscalPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a calendar date into its fiscal quarter.
pub fn determine_fiscal_period(date: NaiveDate) -> FiscalPeriod {
    match date.month0() {
        3..=5 => FiscalPeriod::Q1,
        6..=8 => FiscalPeriod::Q2,
        9..=11 => FiscalPeriod::Q3,
        _ => FiscalPeriod::Q4,
    }
}

/// The fiscal quarter for today's local date. Prefer passing an explicit
/// date to `determine_fiscal_period` anywhere results must be reproducible.
pub fn current_fiscal_period() -> FiscalPeriod {
    determine_fiscal_period(Local::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn every_month_maps_to_its_quarter() {
        for period in [FiscalPeriod::Q1, FiscalPeriod::Q2, FiscalPeriod::Q3, FiscalPeriod::Q4] {
            for month in period.months() {
                assert_eq!(determine_fiscal_period(d(2024, month, 1)), period, "month {month}");
            }
        }
    }

    #[test]
    fn current_period_covers_todays_month() {
        let today = Local::now().date_naive();
        let period = current_fiscal_period();
        // Tolerate the clock crossing midnight into a new quarter mid-test.
        let later = Local::now().date_naive();
        assert!(
            period.months().contains(&today.month()) || period.months().contains(&later.month()),
            "{period} does not cover {today}"
        );
    }
}
