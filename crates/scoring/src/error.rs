use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum ScoringError {
    #[error("Event {0} has no resolved outcome yet")]
    NotResolved(Uuid),

    #[error("Prediction by {predictor_id} has confidence {confidence}, outside [0, 1]")]
    ConfidenceOutOfRange {
        predictor_id: Uuid,
        confidence: f64,
    },
}
