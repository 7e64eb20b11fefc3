//! # Podium Rating Engine
//!
//! This crate turns concluded-contest finish orders into updated skill
//! beliefs. It is the system's answer to "who is actually good here?"
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** A pure logic crate with no knowledge of external
//!   systems. It depends only on `core-types` and `configuration`.
//! - **Stateless Calculation:** The `RatingEngine` takes prior beliefs as
//!   an explicit input and returns posterior beliefs as an explicit output.
//!   Where the "current" rating for a competitor lives is the caller's
//!   concern, which keeps the update trivially testable.
//!
//! ## Public API
//!
//! - `RatingEngine`: the Plackett–Luce ranked-match updater.
//! - `RatedCompetitor`: a posterior belief plus its display ordinal.
//! - `RatingError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
mod model;

// Re-export the key components to create a clean, public-facing API.
pub use engine::{RatedCompetitor, RatingEngine};
pub use error::RatingError;
