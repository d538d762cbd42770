//! Category aggregation tests.

use kpi_bonus_core::aggregate::aggregate;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn total_points_is_mean_of_monthly_points_not_sum() {
    let r = aggregate([95.0, 88.0, 92.0], 40.0);

    for (got, want) in r.monthly_points.iter().zip([40.0, 34.0, 40.0]) {
        assert!(approx(*got, want), "monthly points {:?}", r.monthly_points);
    }
    assert!(approx(r.total_points, 38.0), "got {}", r.total_points);
    assert!(approx(r.average_percentage, 275.0 / 3.0));
    assert!(approx(r.percentage, 95.0));
    assert_eq!(r.max_points, 40.0);
    assert_eq!(r.monthly_scores, [95.0, 88.0, 92.0]);
}

#[test]
fn total_points_never_exceeds_max_points() {
    let grid = [0.0, 30.0, 59.999, 60.0, 69.5, 70.0, 79.9, 80.0, 89.99, 90.0, 100.0];
    for max in [0.0, 10.0, 33.3, 40.0, 100.0] {
        for &a in &grid {
            for &b in &grid {
                for &c in &grid {
                    let r = aggregate([a, b, c], max);
                    assert!(
                        r.total_points >= 0.0 && r.total_points <= max + 1e-9,
                        "total {} out of [0, {max}] for {:?}",
                        r.total_points,
                        [a, b, c]
                    );
                }
            }
        }
    }
}

#[test]
fn zero_weight_category_reports_zero_percentage() {
    let r = aggregate([100.0, 100.0, 100.0], 0.0);
    assert_eq!(r.total_points, 0.0);
    assert_eq!(r.percentage, 0.0);
    assert!(!r.percentage.is_nan());
}

#[test]
fn all_zero_months_score_nothing() {
    let r = aggregate([0.0, 0.0, 0.0], 30.0);
    assert_eq!(r.total_points, 0.0);
    assert_eq!(r.average_percentage, 0.0);
}
