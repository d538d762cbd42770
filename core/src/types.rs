//! Shared primitive types used across the scoring engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A completion percentage in [0, 100].
pub type Percentage = f64;

/// A point value produced by the tier converter.
pub type Points = f64;

/// A stable identifier for a staff member.
pub type EmployeeId = String;

/// A team's unique name. Used as the key for capacities and allocations.
pub type TeamName = String;

/// Number of consecutive months scored per quarter.
pub const MONTHS_PER_QUARTER: usize = 3;

/// The three KPI categories every staff member is scored on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum KpiCategory {
    Accounts,
    Vat,
    Sa,
}

impl KpiCategory {
    pub const ALL: [KpiCategory; 3] = [KpiCategory::Accounts, KpiCategory::Vat, KpiCategory::Sa];

    /// Lower-case key used in validation messages and JSON.
    pub fn key(&self) -> &'static str {
        match self {
            KpiCategory::Accounts => "accounts",
            KpiCategory::Vat      => "vat",
            KpiCategory::Sa       => "sa",
        }
    }
}

impl fmt::Display for KpiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
