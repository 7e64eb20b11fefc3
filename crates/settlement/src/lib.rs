//! # Podium Settlement
//!
//! This crate sequences the pure engines against the persistence layer:
//! it is the only place where "compute" meets "commit".
//!
//! ## Architectural Principles
//!
//! - **Orchestration Only:** No numerical logic lives here. The rating,
//!   analytics and scoring crates compute; this crate loads their inputs,
//!   runs them, and persists their outputs with the right atomicity.
//! - **Ports Over Concretions:** Services are generic over the
//!   `CompetitionStore` trait. The database repository is the production
//!   implementation; tests use an in-memory store. The optional
//!   transfer-history capability is a separate `TransferAware` trait, so
//!   capability-dependent operations are gated at compile time.
//! - **Best-Effort Where It Should Be:** Rating settlement is auxiliary to
//!   contest settlement; an empty leaderboard or missing contest is logged
//!   and skipped, never propagated.
//!
//! ## Public API
//!
//! - `MetricsOrchestrator`: atomic compute-and-save of risk metrics.
//! - `RankingService`: dual-scope (global + arena) rating settlement.
//! - `PredictionSettler`: event scoring and leaderboard assembly.
//! - `CompetitionStore` / `TransferAware`: the persistence ports.
//! - `SettlementError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod error;
pub mod metrics;
pub mod predictions;
pub mod ranking;
pub mod store;

#[cfg(test)]
mod memory;

// Re-export the key components to create a clean, public-facing API.
pub use error::SettlementError;
pub use metrics::MetricsOrchestrator;
pub use predictions::PredictionSettler;
pub use ranking::RankingService;
pub use store::{CompetitionStore, TransferAware};
