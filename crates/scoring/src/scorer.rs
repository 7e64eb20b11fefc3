use crate::error::ScoringError;
use core_types::{OutcomeClass, Prediction, PredictionEvent, ScoreAggregate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The scored outcome of a single prediction against a resolved event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredPrediction {
    pub predictor_id: Uuid,
    pub is_correct: bool,
    /// Squared error of the probability assigned to the guessed class.
    pub brier_term: f64,
}

/// Scores every prediction submitted against a resolved event.
///
/// The full Brier term is `(predicted probability - realized probability)^2`
/// over the guessed class; because the outcome is binary this reduces to
/// `(1 - confidence)^2` when the guess matched the outcome and
/// `confidence^2` when it did not. An event with zero predictions scores
/// zero competitors and is not an error.
pub fn score_event(
    event: &PredictionEvent,
    predictions: &[Prediction],
) -> Result<Vec<ScoredPrediction>, ScoringError> {
    let outcome = event
        .outcome
        .ok_or(ScoringError::NotResolved(event.event_id))?;

    predictions
        .iter()
        .map(|prediction| score_prediction(prediction, outcome))
        .collect()
}

fn score_prediction(
    prediction: &Prediction,
    actual: OutcomeClass,
) -> Result<ScoredPrediction, ScoringError> {
    if !(0.0..=1.0).contains(&prediction.confidence) {
        return Err(ScoringError::ConfidenceOutOfRange {
            predictor_id: prediction.predictor_id,
            confidence: prediction.confidence,
        });
    }

    let is_correct = prediction.guessed == actual;
    let probability_error = if is_correct {
        1.0 - prediction.confidence
    } else {
        prediction.confidence
    };

    Ok(ScoredPrediction {
        predictor_id: prediction.predictor_id,
        is_correct,
        brier_term: probability_error * probability_error,
    })
}

/// Applies one scored prediction to a competitor's running aggregate.
pub fn apply_score(aggregate: &mut ScoreAggregate, scored: &ScoredPrediction) {
    aggregate.total_predictions += 1;
    if scored.is_correct {
        aggregate.correct_predictions += 1;
    }
    aggregate.brier_sum += scored.brier_term;
}
