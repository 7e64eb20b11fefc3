use crate::enums::{ContestType, OutcomeClass};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single valuation of a participant's portfolio within a contest.
///
/// Snapshots are produced by an external valuation process and are
/// append-only; the engines only ever read them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    pub timestamp: DateTime<Utc>,
    pub total_value: Decimal,
}

/// Contest metadata as the engines need it.
///
/// `start_date` is `None` for contests that have not been scheduled yet;
/// the risk engines treat that as a validation failure, not a bug.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContestMeta {
    pub contest_id: Uuid,
    pub name: String,
    pub contest_type: ContestType,
    pub arena_id: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// One row of a concluded contest's finish order.
///
/// Rank ties are whatever the caller supplied; the rating engine does not
/// re-derive them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinishRecord {
    pub competitor_id: Uuid,
    pub finish_rank: u32,
}

/// A Gaussian belief over a competitor's latent skill.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkillRating {
    /// Mean of the belief distribution.
    pub mu: f64,
    /// Standard deviation of the belief distribution. Always > 0.
    pub sigma: f64,
}

impl Default for SkillRating {
    fn default() -> Self {
        Self {
            mu: 25.0,
            sigma: 25.0 / 3.0,
        }
    }
}

impl SkillRating {
    pub fn new(mu: f64, sigma: f64) -> Self {
        Self { mu, sigma }
    }

    /// A single conservative scalar derived from the belief, placing the
    /// competitor `z` standard deviations below their mean and rescaling
    /// toward a familiar rating range:
    ///
    /// `alpha * ((mu - z * sigma) + target / alpha)`
    pub fn ordinal(&self, z: f64, alpha: f64, target: f64) -> f64 {
        alpha * ((self.mu - z * self.sigma) + target / alpha)
    }
}

/// A probabilistic guess submitted against a binary event.
///
/// Immutable once created; at most one per (predictor, event).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub predictor_id: Uuid,
    pub event_id: Uuid,
    pub contest_id: Uuid,
    pub guessed: OutcomeClass,
    /// Probability assigned to the guessed class, in `[0, 1]`.
    pub confidence: f64,
}

/// A play-by-play event predictions are scored against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionEvent {
    pub event_id: Uuid,
    pub contest_id: Uuid,
    pub description: String,
    /// `None` until the event concludes and is resolved.
    pub outcome: Option<OutcomeClass>,
}

/// Running per-competitor scoring totals for one contest.
///
/// Mutated incrementally, once per scored event, and never reset.
/// Invariant: `total_predictions >= correct_predictions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreAggregate {
    pub competitor_id: Uuid,
    pub contest_id: Uuid,
    pub total_predictions: u64,
    pub correct_predictions: u64,
    /// Sum of squared probability errors across all scored predictions.
    pub brier_sum: f64,
}

impl ScoreAggregate {
    /// A zeroed aggregate for a competitor's first scored event.
    pub fn empty(competitor_id: Uuid, contest_id: Uuid) -> Self {
        Self {
            competitor_id,
            contest_id,
            total_predictions: 0,
            correct_predictions: 0,
            brier_sum: 0.0,
        }
    }
}
