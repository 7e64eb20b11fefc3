use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Invalid risk parameters: {0}")]
    InvalidParameters(String),

    #[error("Not enough data to compute risk metrics: need at least 2 snapshots, have {0}")]
    InsufficientData(usize),

    #[error("First snapshot value is zero; returns are undefined")]
    InvalidStartValue,

    #[error("Competition {0} has no start date; risk metrics are undefined")]
    CompetitionNotStarted(Uuid),

    #[error("Calculation error: {0}")]
    Calculation(String),

    #[error("An unexpected error occurred during risk calculation: {0}")]
    InternalError(String),
}
