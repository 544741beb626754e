use thiserror::Error;

/// Failures of a ranking computation. Nothing here is retried by the crate.
#[derive(Debug, Error)]
pub enum StatsError {
    #[error("invalid parameter '{name}': {value}")]
    InvalidParameter { name: &'static str, value: String },
    #[error("count source unavailable: {0}")]
    SourceUnavailable(String),
    #[error("count source contract violated: {0}")]
    ContractViolation(String),
}

impl StatsError {
    pub fn invalid(name: &'static str, value: impl ToString) -> Self {
        StatsError::InvalidParameter {
            name,
            value: value.to_string(),
        }
    }
}

impl From<sqlx::Error> for StatsError {
    fn from(err: sqlx::Error) -> Self {
        StatsError::SourceUnavailable(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StatsError>;
