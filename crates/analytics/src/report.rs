use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Output of the Calmar-side calculation: return and drawdown anchored on
/// the first and last snapshots of the series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalmarMetrics {
    pub simple_return: Decimal,
    /// The overall period return. The name is kept for compatibility with
    /// the stored record; no annualization is applied because the window
    /// is the contest itself.
    pub annualized_return: Decimal,
    /// Worst peak-to-trough relative decline. Always <= 0.
    pub max_drawdown: Decimal,
    pub calmar_ratio: Decimal,
}

/// Output of the Sortino-side calculation: statistics over the full
/// per-period return series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortinoMetrics {
    pub average_period_return: Decimal,
    /// Root-mean-square of sub-MAR period returns. Always >= 0.
    pub downside_deviation: Decimal,
    pub sortino_ratio: Decimal,
    pub snapshot_count: u32,
}

/// The combined risk record kept per (participant, contest).
///
/// Superseded wholesale on recomputation, never patched field by field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskMetricsRecord {
    pub participant_id: Uuid,
    pub contest_id: Uuid,
    pub simple_return: Decimal,
    pub annualized_return: Decimal,
    pub max_drawdown: Decimal,
    pub calmar_ratio: Decimal,
    pub downside_deviation: Decimal,
    pub sortino_ratio: Decimal,
    pub snapshot_count: u32,
    pub computed_at: DateTime<Utc>,
}

impl RiskMetricsRecord {
    /// Merges the two calculations into one record.
    ///
    /// Field provenance is decided here and nowhere else: the
    /// overall-period fields (`simple_return`, `annualized_return`,
    /// `max_drawdown`, `calmar_ratio`) come from the Calmar side, which
    /// anchors on the series endpoints; the per-period fields
    /// (`downside_deviation`, `sortino_ratio`) and `snapshot_count` come
    /// from the Sortino side, which inspects the full series. Every ratio
    /// is rounded to `precision` decimal digits on the way in.
    pub fn from_parts(
        participant_id: Uuid,
        contest_id: Uuid,
        calmar: &CalmarMetrics,
        sortino: &SortinoMetrics,
        precision: u32,
        computed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            participant_id,
            contest_id,
            simple_return: calmar.simple_return.round_dp(precision),
            annualized_return: calmar.annualized_return.round_dp(precision),
            max_drawdown: calmar.max_drawdown.round_dp(precision),
            calmar_ratio: calmar.calmar_ratio.round_dp(precision),
            downside_deviation: sortino.downside_deviation.round_dp(precision),
            sortino_ratio: sortino.sortino_ratio.round_dp(precision),
            snapshot_count: sortino.snapshot_count,
            computed_at,
        }
    }
}
