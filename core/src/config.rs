//! Organisation-wide configuration: KPI weights, team capacities and the
//! seasonal multiplier table.
//!
//! Configuration is always an explicit value handed to the engine. Nothing
//! in the core reads ambient state.

use crate::{
    error::{BonusError, BonusResult},
    types::{KpiCategory, Points, TeamName},
};
use chrono::Month;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Tolerance used when checking that the three weights sum to 100.
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.01;

pub const TOTAL_WEIGHT: Points = 100.0;

// ── KPI weights ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KpiWeights {
    pub accounts_weight:    Points,
    pub vat_weight:         Points,
    pub sa_weight:          Points,
    pub bonus_pool_divisor: f64,
}

impl Default for KpiWeights {
    fn default() -> Self {
        Self {
            accounts_weight:    40.0,
            vat_weight:         30.0,
            sa_weight:          30.0,
            bonus_pool_divisor: 4.0,
        }
    }
}

impl KpiWeights {
    pub fn weight(&self, category: KpiCategory) -> Points {
        match category {
            KpiCategory::Accounts => self.accounts_weight,
            KpiCategory::Vat      => self.vat_weight,
            KpiCategory::Sa       => self.sa_weight,
        }
    }

    fn weight_mut(&mut self, category: KpiCategory) -> &mut Points {
        match category {
            KpiCategory::Accounts => &mut self.accounts_weight,
            KpiCategory::Vat      => &mut self.vat_weight,
            KpiCategory::Sa       => &mut self.sa_weight,
        }
    }

    pub fn total(&self) -> Points {
        self.accounts_weight + self.vat_weight + self.sa_weight
    }

    /// Set one weight and rescale the other two so all three still sum to 100.
    ///
    /// The other two keep their relative proportions. If both are zero the
    /// remainder is split evenly between them. A non-finite value is
    /// ignored and leaves the weights untouched.
    pub fn set_weight(&mut self, category: KpiCategory, value: Points) {
        if !value.is_finite() {
            log::warn!("config: ignoring non-finite {category} weight {value}");
            return;
        }
        let value = value.clamp(0.0, TOTAL_WEIGHT);
        let remainder = TOTAL_WEIGHT - value;

        let others: Vec<KpiCategory> = KpiCategory::ALL
            .into_iter()
            .filter(|c| *c != category)
            .collect();
        let others_total: Points = others.iter().map(|c| self.weight(*c)).sum();

        for other in &others {
            let current = self.weight(*other);
            *self.weight_mut(*other) = if others_total > 0.0 {
                remainder * current / others_total
            } else {
                remainder / others.len() as f64
            };
        }
        *self.weight_mut(category) = value;

        log::debug!(
            "config: {category} weight set to {value:.2}, rebalanced to {:.2}/{:.2}/{:.2}",
            self.accounts_weight, self.vat_weight, self.sa_weight
        );
    }

    /// Reject divisors and weights the engine cannot score against.
    pub fn validate(&self) -> BonusResult<()> {
        check_divisor(self.bonus_pool_divisor)?;

        for category in KpiCategory::ALL {
            let w = self.weight(category);
            if !w.is_finite() || w < 0.0 {
                return Err(BonusError::InvalidWeights(format!(
                    "{category} weight must be a non-negative number, got {w}"
                )));
            }
        }

        let total = self.total();
        if (total - TOTAL_WEIGHT).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(BonusError::InvalidWeights(format!(
                "weights must sum to 100, got {total:.2}"
            )));
        }
        Ok(())
    }
}

/// Guard for the salary → pool division.
pub fn check_divisor(divisor: f64) -> BonusResult<()> {
    if !divisor.is_finite() || divisor <= 0.0 {
        return Err(BonusError::InvalidBonusPoolDivisor { divisor });
    }
    Ok(())
}

// ── Team capacities ────────────────────────────────────────────────

fn default_efficiency() -> f64 {
    1.0
}

/// A team's relative share of the workload.
///
/// The efficiency factors are carried for reporting only; the distribution
/// engine allocates on `capacity_weight` alone.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TeamCapacity {
    pub team_name:       TeamName,
    pub capacity_weight: f64,
    #[serde(default = "default_efficiency")]
    pub sa_efficiency_factor: f64,
    #[serde(default = "default_efficiency")]
    pub accounts_efficiency_factor: f64,
    #[serde(default = "default_efficiency")]
    pub vat_efficiency_factor: f64,
}

impl TeamCapacity {
    pub fn new(team_name: impl Into<TeamName>, capacity_weight: f64) -> Self {
        Self {
            team_name: team_name.into(),
            capacity_weight,
            sa_efficiency_factor:       default_efficiency(),
            accounts_efficiency_factor: default_efficiency(),
            vat_efficiency_factor:      default_efficiency(),
        }
    }
}

/// Check a team list is usable for allocation. Returns the weight total.
pub fn check_capacities(teams: &[TeamCapacity]) -> BonusResult<f64> {
    if teams.is_empty() {
        return Err(BonusError::EmptyTeamList);
    }

    let mut seen = HashSet::new();
    for team in teams {
        if !seen.insert(team.team_name.as_str()) {
            return Err(BonusError::DuplicateTeam { name: team.team_name.clone() });
        }
        if !team.capacity_weight.is_finite() || team.capacity_weight < 0.0 {
            return Err(BonusError::InvalidCapacity { total: team.capacity_weight });
        }
    }

    let total: f64 = teams.iter().map(|t| t.capacity_weight).sum();
    if total <= 0.0 {
        return Err(BonusError::InvalidCapacity { total });
    }
    Ok(total)
}

// ── Seasonal multipliers ───────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeasonalFactor {
    /// Calendar month, 1 = January.
    pub month:      u32,
    pub multiplier: f64,
}

/// Calendar month → SA-season intensity multiplier.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SeasonalFactors {
    factors: BTreeMap<u32, f64>,
}

impl SeasonalFactors {
    pub fn from_entries(entries: impl IntoIterator<Item = SeasonalFactor>) -> Self {
        Self {
            factors: entries.into_iter().map(|e| (e.month, e.multiplier)).collect(),
        }
    }

    /// Multiplier for a calendar month (1–12). Unlisted months score at 1.0.
    pub fn factor_for(&self, month: u32) -> f64 {
        self.factors.get(&month).copied().unwrap_or(1.0)
    }

    pub fn entries(&self) -> Vec<SeasonalFactor> {
        self.factors
            .iter()
            .map(|(&month, &multiplier)| SeasonalFactor { month, multiplier })
            .collect()
    }
}

impl Serialize for SeasonalFactors {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SeasonalFactors {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = Vec::<SeasonalFactor>::deserialize(deserializer)?;
        Ok(Self::from_entries(entries))
    }
}

/// August is the quietest month, January (the filing deadline) the busiest.
pub fn default_seasonal_factors() -> SeasonalFactors {
    let table = [
        (1, 1.20), (2, 1.10), (3, 1.05), (4, 0.95),
        (5, 0.90), (6, 0.90), (7, 0.90), (8, 0.85),
        (9, 0.90), (10, 1.00), (11, 1.05), (12, 1.10),
    ];
    SeasonalFactors::from_entries(
        table.into_iter().map(|(month, multiplier)| SeasonalFactor { month, multiplier }),
    )
}

// ── Files ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
struct TeamCapacitiesFile {
    teams: Vec<TeamCapacity>,
}

#[derive(Debug, Clone, Deserialize)]
struct SeasonalFactorsFile {
    factors: Vec<SeasonalFactor>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KpiWeightsFile {
    weights: KpiWeights,
    #[serde(default)]
    season_end_month: Option<u32>,
}

// ── Top-level config ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BonusConfig {
    pub weights:          KpiWeights,
    pub teams:            Vec<TeamCapacity>,
    pub seasonal_factors: SeasonalFactors,
    pub season_end_month: Month,
}

impl BonusConfig {
    /// Load from the data/ directory.
    /// In tests, use BonusConfig::default_test().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let weights_path = format!("{data_dir}/kpi/kpi_weights.json");
        let weights_content = std::fs::read_to_string(&weights_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {weights_path}: {e}"))?;
        let weights_file: KpiWeightsFile = serde_json::from_str(&weights_content)?;

        let teams_path = format!("{data_dir}/teams/team_capacities.json");
        let teams_content = std::fs::read_to_string(&teams_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {teams_path}: {e}"))?;
        let teams_file: TeamCapacitiesFile = serde_json::from_str(&teams_content)?;

        let seasonal_path = format!("{data_dir}/seasonal/seasonal_factors.json");
        let seasonal_content = std::fs::read_to_string(&seasonal_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {seasonal_path}: {e}"))?;
        let seasonal_file: SeasonalFactorsFile = serde_json::from_str(&seasonal_content)?;

        let season_end_month = match weights_file.season_end_month {
            Some(m) => u8::try_from(m)
                .ok()
                .and_then(|m| Month::try_from(m).ok())
                .ok_or_else(|| anyhow::anyhow!("{weights_path}: invalid seasonEndMonth {m}"))?,
            None => Month::January,
        };

        let config = Self {
            weights: weights_file.weights,
            teams: teams_file.teams,
            seasonal_factors: SeasonalFactors::from_entries(seasonal_file.factors),
            season_end_month,
        };
        config.validate()?;

        log::info!(
            "config: loaded {} teams, weights {:.1}/{:.1}/{:.1}, divisor {}",
            config.teams.len(),
            config.weights.accounts_weight,
            config.weights.vat_weight,
            config.weights.sa_weight,
            config.weights.bonus_pool_divisor
        );
        Ok(config)
    }

    /// Config with hardcoded defaults for use in unit tests.
    pub fn default_test() -> Self {
        Self {
            weights: KpiWeights::default(),
            teams: vec![
                TeamCapacity::new("North", 3.0),
                TeamCapacity::new("South", 2.0),
            ],
            seasonal_factors: default_seasonal_factors(),
            season_end_month: Month::January,
        }
    }

    pub fn validate(&self) -> BonusResult<()> {
        self.weights.validate()?;
        check_capacities(&self.teams)?;
        Ok(())
    }

    pub fn team(&self, name: &str) -> BonusResult<&TeamCapacity> {
        self.teams
            .iter()
            .find(|t| t.team_name == name)
            .ok_or_else(|| BonusError::UnknownTeam { name: name.to_string() })
    }
}
