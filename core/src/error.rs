use thiserror::Error;

#[derive(Error, Debug)]
pub enum BonusError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid bonus pool divisor: {divisor} (must be > 0)")]
    InvalidBonusPoolDivisor { divisor: f64 },

    #[error("Invalid KPI weights: {0}")]
    InvalidWeights(String),

    #[error("Team list is empty")]
    EmptyTeamList,

    #[error("Team capacity weights sum to {total} (must be > 0)")]
    InvalidCapacity { total: f64 },

    #[error("Team '{name}' appears more than once")]
    DuplicateTeam { name: String },

    #[error("Team '{name}' not found")]
    UnknownTeam { name: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type BonusResult<T> = Result<T, BonusError>;
