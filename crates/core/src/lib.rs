//! Valuator Core - Domain entities, services, and traits.
//!
//! This crate contains the portfolio valuation logic. It is
//! database-agnostic and defines repository traits that are implemented
//! by the `storage-sqlite` crate.

pub mod assets;
pub mod constants;
pub mod errors;
pub mod holdings;
pub mod portfolio;
pub mod prices;
pub mod seed;
pub mod utils;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
