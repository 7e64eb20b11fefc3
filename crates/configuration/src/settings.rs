use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

/// The root configuration structure for the engine.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub rating: RatingSettings,
    pub risk: RiskSettings,
}

/// Parameters of the skill model and its derived ordinal.
///
/// The defaults are the fixed reference constants; overriding them in
/// `config.toml` changes the meaning of every stored rating, so treat them
/// as frozen outside of experiments.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RatingSettings {
    /// Mean of the default prior belief for an unseen competitor.
    pub mu: f64,
    /// Standard deviation of the default prior belief.
    pub sigma: f64,
    /// Performance variance of a single contest outcome. Controls how
    /// quickly ratings move in response to a finish order.
    pub beta: f64,
    /// Regularization floor for the sigma update; keeps sigma > 0.
    pub kappa: f64,
    /// Standard deviations below the mean used for the conservative ordinal.
    pub ordinal_z: f64,
    /// Scale factor applied to the ordinal.
    pub ordinal_alpha: f64,
    /// Value the ordinal is shifted toward, giving an ELO-like range.
    pub ordinal_target: f64,
}

impl Default for RatingSettings {
    fn default() -> Self {
        Self {
            mu: 25.0,
            sigma: 25.0 / 3.0,
            beta: 25.0 / 6.0,
            kappa: 0.0001,
            ordinal_z: 3.0,
            ordinal_alpha: 24.0,
            ordinal_target: 1500.0,
        }
    }
}

/// Parameters of the portfolio risk metric calculations.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RiskSettings {
    /// Divisor floor for the Calmar ratio when drawdown is negligible.
    pub calmar_floor: Decimal,
    /// Divisor floor for the Sortino ratio. One order of magnitude tighter
    /// than the Calmar floor.
    pub sortino_floor: Decimal,
    /// Minimum acceptable return for downside deviation. Zero: these are
    /// crypto-denominated returns with no risk-free benchmark.
    pub minimum_acceptable_return: Decimal,
    /// Decimal digits every persisted ratio is rounded to.
    pub ratio_precision: u32,
}

impl Default for RiskSettings {
    fn default() -> Self {
        Self {
            calmar_floor: dec!(0.001),
            sortino_floor: dec!(0.0001),
            minimum_acceptable_return: Decimal::ZERO,
            ratio_precision: 8,
        }
    }
}
