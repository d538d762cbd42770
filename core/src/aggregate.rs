//! Per-category aggregation of three monthly percentages.

use crate::{
    scoring::points_for,
    types::{Percentage, Points, MONTHS_PER_QUARTER},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KpiResult {
    pub monthly_scores:     [Percentage; MONTHS_PER_QUARTER],
    pub monthly_points:     [Points; MONTHS_PER_QUARTER],
    pub average_percentage: Percentage,
    /// Mean of the monthly points, NOT their sum.
    pub total_points:       Points,
    pub max_points:         Points,
    /// `total_points / max_points × 100`, or 0 when the category weight is 0.
    pub percentage:         Percentage,
}

/// Score one category over a quarter.
///
/// `total_points` averages the three monthly point values. Summing them
/// would let a category earn up to three times its weight; the mean keeps
/// `total_points <= max_points`.
pub fn aggregate(monthly_percentages: [Percentage; MONTHS_PER_QUARTER], max_points: Points) -> KpiResult {
    let monthly_points = monthly_percentages.map(|p| points_for(p, max_points));
    let months = MONTHS_PER_QUARTER as f64;

    let average_percentage = monthly_percentages.iter().sum::<f64>() / months;
    let total_points = monthly_points.iter().sum::<f64>() / months;

    let percentage = if max_points > 0.0 {
        total_points / max_points * 100.0
    } else {
        0.0
    };

    KpiResult {
        monthly_scores: monthly_percentages,
        monthly_points,
        average_percentage,
        total_points,
        max_points,
        percentage,
    }
}
