use thiserror::Error;

pub type BalanceResult<T> = Result<T, BalanceError>;

/// Stage of the pipeline an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Roster,
    Config,
    Bucketing,
    Sampling,
    Evaluation,
    WorkerPool,
}

impl Stage {
    pub fn label(self) -> &'static str {
        match self {
            Stage::Roster => "roster",
            Stage::Config => "config",
            Stage::Bucketing => "bucketing",
            Stage::Sampling => "sampling",
            Stage::Evaluation => "evaluation",
            Stage::WorkerPool => "worker pool",
        }
    }
}

#[derive(Debug, Error)]
pub enum BalanceError {
    #[error("roster: {0}")]
    Roster(#[from] RosterError),

    #[error("config: {0}")]
    Config(String),

    #[error("bucketing: {0}")]
    Bucketing(String),

    #[error("sampling (seed {seed}): {reason}")]
    Sampling { seed: u64, reason: String },

    #[error("evaluation: {0}")]
    Evaluation(String),

    #[error("worker pool: {0}")]
    WorkerPool(String),
}

impl BalanceError {
    pub fn stage(&self) -> Stage {
        match self {
            BalanceError::Roster(_) => Stage::Roster,
            BalanceError::Config(_) => Stage::Config,
            BalanceError::Bucketing(_) => Stage::Bucketing,
            BalanceError::Sampling { .. } => Stage::Sampling,
            BalanceError::Evaluation(_) => Stage::Evaluation,
            BalanceError::WorkerPool(_) => Stage::WorkerPool,
        }
    }

    pub(crate) fn config(reason: impl Into<String>) -> Self {
        BalanceError::Config(reason.into())
    }
}

/// Malformed roster input. Row numbers are 1-based and count data rows only.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RosterError {
    #[error("row {row}: missing column `{column}`")]
    MissingColumn { row: usize, column: &'static str },

    #[error("row {row}: unrecognized sex value {value:?}")]
    UnknownSex { row: usize, value: String },

    #[error("row {row}: column `{column}` is not a skill value in 0..=255: {value:?}")]
    InvalidSkill {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("row {row}: unreadable record: {reason}")]
    Malformed { row: usize, reason: String },

    #[error("player id {0} appears more than once")]
    DuplicateId(u32),

    #[error("roster has no players")]
    Empty,
}
