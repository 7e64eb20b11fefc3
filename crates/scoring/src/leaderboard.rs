use core_types::ScoreAggregate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use uuid::Uuid;

/// A display-ready leaderboard row derived from a competitor's aggregate.
/// Derived on demand, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardRow {
    pub rank: u32,
    pub competitor_id: Uuid,
    pub accuracy: f64,
    pub brier_score: f64,
    pub total_predictions: u64,
    pub correct_predictions: u64,
}

/// Ranks aggregates into a dense 1-based leaderboard.
///
/// Sort order: accuracy descending, then Brier score ascending (lower is
/// better) as the tie-break. Fully-tied rows keep their input order and
/// still receive distinct ranks. Competitors with no predictions get
/// explicit zeros for both ratios rather than NaN.
pub fn assemble(aggregates: &[ScoreAggregate]) -> Vec<LeaderboardRow> {
    let mut rows: Vec<LeaderboardRow> = aggregates
        .iter()
        .map(|aggregate| {
            let (accuracy, brier_score) = if aggregate.total_predictions == 0 {
                (0.0, 0.0)
            } else {
                let total = aggregate.total_predictions as f64;
                (
                    aggregate.correct_predictions as f64 / total,
                    aggregate.brier_sum / total,
                )
            };
            LeaderboardRow {
                rank: 0,
                competitor_id: aggregate.competitor_id,
                accuracy,
                brier_score,
                total_predictions: aggregate.total_predictions,
                correct_predictions: aggregate.correct_predictions,
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        b.accuracy
            .partial_cmp(&a.accuracy)
            .unwrap_or(Ordering::Equal)
            .then(
                a.brier_score
                    .partial_cmp(&b.brier_score)
                    .unwrap_or(Ordering::Equal),
            )
    });

    for (index, row) in rows.iter_mut().enumerate() {
        row.rank = index as u32 + 1;
    }

    rows
}
