use crate::error::AnalyticsError;
use crate::report::{CalmarMetrics, SortinoMetrics};
use configuration::RiskSettings;
use core_types::{ContestMeta, PortfolioSnapshot};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// A stateless calculator for deriving risk metrics from a participant's
/// portfolio snapshot series.
///
/// All arithmetic is decimal; these are monetary values and binary floating
/// point would drift over large balances.
#[derive(Debug, Clone)]
pub struct RiskEngine {
    settings: RiskSettings,
}

impl RiskEngine {
    /// Creates a new `RiskEngine` with the given calculation parameters.
    pub fn new(settings: RiskSettings) -> Result<Self, AnalyticsError> {
        // Validate that the parameters are logical.
        if settings.calmar_floor <= Decimal::ZERO || settings.sortino_floor <= Decimal::ZERO {
            return Err(AnalyticsError::InvalidParameters(
                "ratio floors must be greater than 0".to_string(),
            ));
        }
        if settings.ratio_precision > 28 {
            return Err(AnalyticsError::InvalidParameters(
                "ratio_precision exceeds decimal range".to_string(),
            ));
        }
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &RiskSettings {
        &self.settings
    }

    /// The Calmar-side calculation: overall period return and maximum
    /// drawdown, both anchored on the snapshot series itself.
    ///
    /// The return is a pure ratio of the first and last snapshot values —
    /// intra-competition transfers are prohibited, so the endpoints tell
    /// the whole story.
    pub fn calmar(
        &self,
        snapshots: &[PortfolioSnapshot],
        contest: &ContestMeta,
    ) -> Result<CalmarMetrics, AnalyticsError> {
        let (first, last) = self.validate(snapshots, contest)?;

        let simple_return = (last.total_value - first.total_value) / first.total_value;
        let max_drawdown = max_drawdown(snapshots);
        let ratio = calmar_ratio(simple_return, max_drawdown, self.settings.calmar_floor);

        Ok(CalmarMetrics {
            simple_return,
            annualized_return: simple_return,
            max_drawdown,
            calmar_ratio: ratio,
        })
    }

    /// The Sortino-side calculation: mean and downside deviation of the
    /// per-period return series across every snapshot.
    pub fn sortino(
        &self,
        snapshots: &[PortfolioSnapshot],
        contest: &ContestMeta,
    ) -> Result<SortinoMetrics, AnalyticsError> {
        self.validate(snapshots, contest)?;

        let returns = period_returns(snapshots)?;
        let count = Decimal::from(returns.len());
        let average_period_return = returns.iter().sum::<Decimal>() / count;

        let mar = self.settings.minimum_acceptable_return;
        let downside_sq_sum: Decimal = returns
            .iter()
            .map(|r| {
                let shortfall = (*r - mar).min(Decimal::ZERO);
                shortfall * shortfall
            })
            .sum();
        let downside_deviation = (downside_sq_sum / count).sqrt().ok_or_else(|| {
            AnalyticsError::InternalError(
                "failed to take square root of downside variance".to_string(),
            )
        })?;

        let sortino_ratio = sortino_ratio(
            average_period_return,
            downside_deviation,
            self.settings.sortino_floor,
        );

        Ok(SortinoMetrics {
            average_period_return,
            downside_deviation,
            sortino_ratio,
            snapshot_count: snapshots.len() as u32,
        })
    }

    /// Shared validation for both calculations. Returns the series
    /// endpoints on success.
    fn validate<'a>(
        &self,
        snapshots: &'a [PortfolioSnapshot],
        contest: &ContestMeta,
    ) -> Result<(&'a PortfolioSnapshot, &'a PortfolioSnapshot), AnalyticsError> {
        if contest.start_date.is_none() {
            return Err(AnalyticsError::CompetitionNotStarted(contest.contest_id));
        }
        let (first, last) = match (snapshots.first(), snapshots.last()) {
            (Some(first), Some(last)) if snapshots.len() >= 2 => (first, last),
            _ => return Err(AnalyticsError::InsufficientData(snapshots.len())),
        };
        if first.total_value.is_zero() {
            return Err(AnalyticsError::InvalidStartValue);
        }
        Ok((first, last))
    }
}

/// Maximum drawdown over the series between the first and last snapshot
/// timestamps — snapshot dates, not contest calendar dates, for
/// consistency with the endpoint return calculation.
///
/// Single aggregate pass: track the running peak, record the relative
/// decline at each point, keep the minimum. Exactly 0 means the series
/// never declined.
fn max_drawdown(snapshots: &[PortfolioSnapshot]) -> Decimal {
    let mut peak = snapshots[0].total_value;
    let mut worst = Decimal::ZERO;

    for snapshot in snapshots {
        if snapshot.total_value > peak {
            peak = snapshot.total_value;
        }
        let drawdown = (snapshot.total_value - peak) / peak;
        if drawdown < worst {
            worst = drawdown;
        }
    }

    worst
}

/// Calmar ratio with the drawdown floor applied.
///
/// The floor stops the ratio exploding when drawdown is negligible. A
/// positive `max_drawdown` here means an upstream calculation produced an
/// impossible value; clamping it would bury that bug, so this panics.
pub fn calmar_ratio(period_return: Decimal, max_drawdown: Decimal, floor: Decimal) -> Decimal {
    assert!(
        max_drawdown <= Decimal::ZERO,
        "max drawdown must be <= 0, got {max_drawdown}"
    );
    period_return / max_drawdown.abs().max(floor)
}

/// Sortino ratio with the downside floor applied.
///
/// When both inputs are exactly zero the ratio is defined as zero rather
/// than a divide-by-floor artifact.
pub fn sortino_ratio(average_return: Decimal, downside_deviation: Decimal, floor: Decimal) -> Decimal {
    if average_return.is_zero() && downside_deviation.is_zero() {
        return Decimal::ZERO;
    }
    average_return / downside_deviation.max(floor)
}

/// Per-period simple returns between consecutive snapshots.
fn period_returns(snapshots: &[PortfolioSnapshot]) -> Result<Vec<Decimal>, AnalyticsError> {
    snapshots
        .windows(2)
        .map(|pair| {
            if pair[0].total_value.is_zero() {
                return Err(AnalyticsError::Calculation(
                    "portfolio value reached zero mid-series; period return is undefined"
                        .to_string(),
                ));
            }
            Ok((pair[1].total_value - pair[0].total_value) / pair[0].total_value)
        })
        .collect()
}
