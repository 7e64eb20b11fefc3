//! # Podium Prediction Scoring
//!
//! This crate scores probabilistic play-by-play predictions against
//! resolved binary outcomes and assembles the resulting per-contest
//! leaderboard.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** A pure logic crate depending only on `core-types`.
//! - **Stateless Calculation:** Scoring takes an event plus its
//!   predictions and returns per-predictor results; accumulating them into
//!   stored aggregates is a separate, explicit step.
//!
//! ## Public API
//!
//! - `score_event` / `apply_score`: the Brier scoring pipeline.
//! - `leaderboard::assemble`: accuracy-then-Brier ranking with dense ranks.
//! - `ScoringError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod error;
pub mod leaderboard;
pub mod scorer;

// Re-export the key components to create a clean, public-facing API.
pub use error::ScoringError;
pub use leaderboard::LeaderboardRow;
pub use scorer::{apply_score, score_event, ScoredPrediction};
