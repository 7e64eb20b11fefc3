use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum RatingError {
    #[error("Invalid rating parameters: {0}")]
    InvalidParameters(String),

    #[error("Competitor {0} appears more than once in the finish order")]
    DuplicateCompetitor(Uuid),

    #[error("Prior rating for competitor {0} has a non-positive sigma")]
    InvalidPrior(Uuid),
}
