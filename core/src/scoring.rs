//! Tiered point conversion.
//!
//! Two converters live here and they must stay separate:
//!   - `points_for` scales with a configured category weight. The bonus
//!     calculator uses it.
//!   - `fixed_points_for` / `sa_points_for` use the fixed 40/30/30 caps of
//!     the team dashboard, whatever the configured weights are.
//!
//! Bands use inclusive lower bounds. No rounding happens here and inputs
//! are not clamped; validate percentages first.

use crate::types::{KpiCategory, Percentage, Points};

/// (lower bound, share of max points), highest band first.
pub const TIERS: [(Percentage, f64); 4] = [
    (90.0, 1.00),
    (80.0, 0.85),
    (70.0, 0.65),
    (60.0, 0.35),
];

pub const ACCOUNTS_FIXED_MAX: Points = 40.0;
pub const VAT_FIXED_MAX: Points = 30.0;
pub const SA_FIXED_MAX: Points = 30.0;

/// Share of the category maximum earned at `percentage`.
pub fn tier_share(percentage: Percentage) -> f64 {
    TIERS
        .iter()
        .find(|(lower, _)| percentage >= *lower)
        .map(|(_, share)| *share)
        .unwrap_or(0.0)
}

/// Points for one month against a configurable maximum.
pub fn points_for(percentage: Percentage, max_points: Points) -> Points {
    max_points * tier_share(percentage)
}

pub fn fixed_max_points(category: KpiCategory) -> Points {
    match category {
        KpiCategory::Accounts => ACCOUNTS_FIXED_MAX,
        KpiCategory::Vat      => VAT_FIXED_MAX,
        KpiCategory::Sa       => SA_FIXED_MAX,
    }
}

/// Dashboard converter with fixed per-category caps.
pub fn fixed_points_for(category: KpiCategory, percentage: Percentage) -> Points {
    points_for(percentage, fixed_max_points(category))
}

/// SA points on the fixed 30-point cap: 30, 25.5, 19.5, 10.5 or 0.
pub fn sa_points_for(percentage: Percentage) -> Points {
    fixed_points_for(KpiCategory::Sa, percentage)
}
