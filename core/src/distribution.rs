//! Capacity-weighted distribution of a workload target across teams.
//!
//! Each team gets `round(total × weight / Σweight)`. Independent rounding
//! can drift from `total`, so the signed difference is added to the team
//! holding the largest allocation (first in list order on a tie). The
//! shares therefore always sum to `total` exactly.

use crate::{
    config::{check_capacities, TeamCapacity},
    error::BonusResult,
    sa_targets::TeamProgress,
    types::TeamName,
};
use std::collections::BTreeMap;

/// Allocation in team list order. Shares are signed: for very small totals
/// spread over many teams the reconciliation can push one share below zero.
pub fn distribute_ordered(total_units: u64, teams: &[TeamCapacity]) -> BonusResult<Vec<(TeamName, i64)>> {
    let weight_total = check_capacities(teams).map_err(|e| {
        log::warn!("distribution: rejected team list: {e}");
        e
    })?;

    let total = total_units as f64;
    let mut shares: Vec<(TeamName, i64)> = teams
        .iter()
        .map(|t| {
            let share = (total * t.capacity_weight / weight_total).round() as i64;
            (t.team_name.clone(), share)
        })
        .collect();

    let allocated: i64 = shares.iter().map(|(_, s)| *s).sum();
    let difference = total_units as i64 - allocated;

    if difference != 0 {
        let mut largest = 0;
        for (i, (_, share)) in shares.iter().enumerate() {
            if *share > shares[largest].1 {
                largest = i;
            }
        }
        shares[largest].1 += difference;
        log::debug!(
            "distribution: reconciled {difference:+} units onto {}",
            shares[largest].0
        );
    }

    Ok(shares)
}

/// Allocate `total_units` across teams by capacity weight.
pub fn distribute(total_units: u64, teams: &[TeamCapacity]) -> BonusResult<BTreeMap<TeamName, i64>> {
    let shares = distribute_ordered(total_units, teams)?;
    log::info!("distribution: {total_units} units across {} teams", shares.len());
    Ok(shares.into_iter().collect())
}

/// Move any negative shares back to zero, taking the deficit one unit at a
/// time from the largest remaining share (first in list order on a tie).
/// The sum is unchanged.
fn settle_negative_shares(shares: &mut [(TeamName, i64)]) {
    let deficit: i64 = shares.iter().map(|(_, s)| (-*s).max(0)).sum();
    if deficit == 0 {
        return;
    }
    for (_, share) in shares.iter_mut() {
        *share = (*share).max(0);
    }
    for _ in 0..deficit {
        let mut largest = 0;
        for (i, (_, share)) in shares.iter().enumerate() {
            if *share > shares[largest].1 {
                largest = i;
            }
        }
        shares[largest].1 -= 1;
    }
    log::debug!("distribution: settled {deficit} negative units onto the largest shares");
}

/// Fresh per-team progress rows for a month with `total_jobs` to do.
///
/// Targets are never negative and always sum to `total_jobs`.
pub fn team_breakdown(total_jobs: u64, teams: &[TeamCapacity]) -> BonusResult<Vec<TeamProgress>> {
    let mut shares = distribute_ordered(total_jobs, teams)?;
    settle_negative_shares(&mut shares);
    Ok(shares
        .into_iter()
        .map(|(team_name, share)| TeamProgress {
            team_name,
            jobs_completed: 0,
            target_jobs: u64::try_from(share).unwrap_or(0),
            completed: 0.0,
        })
        .collect())
}
