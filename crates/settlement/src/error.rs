use analytics::AnalyticsError;
use database::DbError;
use rating::RatingError;
use scoring::ScoringError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum SettlementError {
    #[error("Database operation failed: {0}")]
    Database(#[from] DbError),

    #[error(transparent)]
    Analytics(#[from] AnalyticsError),

    #[error(transparent)]
    Rating(#[from] RatingError),

    #[error(transparent)]
    Scoring(#[from] ScoringError),

    #[error("Contest {0} not found")]
    ContestNotFound(Uuid),

    #[error("Event {0} not found")]
    EventNotFound(Uuid),

    #[error(
        "Participant {participant_id} recorded {transfers} transfer(s) during contest \
         {contest_id}; endpoint returns are invalid"
    )]
    TransferActivity {
        participant_id: Uuid,
        contest_id: Uuid,
        transfers: u64,
    },
}

impl SettlementError {
    /// Whether this failure is a terminal data-state condition.
    ///
    /// Batch callers skip-and-continue on validation failures and abort
    /// (or retry) on infrastructure failures; retrying a validation
    /// failure can never succeed.
    pub fn is_validation(&self) -> bool {
        !matches!(self, SettlementError::Database(_))
    }
}
