pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{ContestType, OutcomeClass, RatingScope};
pub use error::CoreError;
pub use structs::{
    ContestMeta, FinishRecord, PortfolioSnapshot, Prediction, PredictionEvent, ScoreAggregate,
    SkillRating,
};
