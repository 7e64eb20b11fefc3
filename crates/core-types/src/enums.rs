use crate::error::CoreError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContestType {
    Trading,
    Prediction,
}

impl ContestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContestType::Trading => "trading",
            ContestType::Prediction => "prediction",
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "trading" => Ok(ContestType::Trading),
            "prediction" => Ok(ContestType::Prediction),
            other => Err(CoreError::InvalidValue("contest type", other.to_string())),
        }
    }
}

/// One of the two classes a play-by-play event can resolve to.
///
/// `Yes` is the canonical positive class: a confidence of `c` on a `Yes`
/// guess assigns probability `c` to `Yes` and `1 - c` to `No`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeClass {
    Yes,
    No,
}

impl OutcomeClass {
    /// Returns the other class of the binary pair.
    pub fn opposite(&self) -> Self {
        match self {
            OutcomeClass::Yes => OutcomeClass::No,
            OutcomeClass::No => OutcomeClass::Yes,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeClass::Yes => "yes",
            OutcomeClass::No => "no",
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "yes" => Ok(OutcomeClass::Yes),
            "no" => Ok(OutcomeClass::No),
            other => Err(CoreError::InvalidValue("outcome class", other.to_string())),
        }
    }
}

/// The rating pool a skill update applies to.
///
/// Every competitor carries two independent rating histories: one global,
/// and one per arena they have competed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RatingScope {
    Global,
    Arena(String),
}

impl RatingScope {
    /// The key this scope is stored under, e.g. `"global"` or `"arena:nba"`.
    pub fn storage_key(&self) -> String {
        match self {
            RatingScope::Global => "global".to_string(),
            RatingScope::Arena(arena_id) => format!("arena:{arena_id}"),
        }
    }
}
