//! # Podium Risk Analytics
//!
//! This crate derives financial risk metrics from portfolio snapshot
//! series. It acts as the "unbiased judge" of how a participant's returns
//! were earned, not just how large they were.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of
//!   external systems. It depends only on `core-types` and `configuration`.
//! - **Stateless Calculation:** The `RiskEngine` is a stateless calculator.
//!   It takes a snapshot series as input and produces metric structs as
//!   output, which makes it highly reliable and easy to test.
//! - **Decimal Arithmetic:** Every value in the pipeline is a
//!   `rust_decimal::Decimal`. These are monetary quantities; binary
//!   floating point is deliberately kept out.
//!
//! ## Public API
//!
//! - `RiskEngine`: the main struct that contains the calculation logic.
//! - `CalmarMetrics` / `SortinoMetrics`: the two calculation outputs.
//! - `RiskMetricsRecord`: the merged, persistable record.
//! - `AnalyticsError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use engine::{calmar_ratio, sortino_ratio, RiskEngine};
pub use error::AnalyticsError;
pub use report::{CalmarMetrics, RiskMetricsRecord, SortinoMetrics};
