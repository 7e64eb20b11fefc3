//! # Podium Database Crate
//!
//! This crate acts as a high-level, application-specific interface to the
//! PostgreSQL database. It is the engine's "permanent archive": snapshot
//! series in, ratings and risk records out.
//!
//! ## Architectural Principles
//!
//! - **Layer 3 Adapter:** This crate encapsulates all database-specific
//!   logic and hides the underlying SQL from the rest of the application.
//! - **Atomic Writes:** Every multi-statement write (rating pool updates,
//!   the risk record + its time-series row, scored-prediction increments)
//!   runs inside a single transaction. Callers never observe partial state.
//! - **Asynchronous & Pooled:** All operations are asynchronous over a
//!   shared `PgPool`.
//!
//! ## Public API
//!
//! - `connect`: the async function to establish the database connection pool.
//! - `run_migrations`: applies migrations so the schema is always current.
//! - `DbRepository`: the main struct that holds the connection pool and
//!   provides all the high-level data access methods.
//! - `DbError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, run_migrations};
pub use error::DbError;
pub use repository::DbRepository;
