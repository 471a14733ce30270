//! SQLite storage implementation for the portfolio valuator.
//!
//! This crate provides all database-related functionality using Diesel ORM
//! with SQLite. It implements the repository traits defined in
//! `valuator-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for assets, initial holdings and prices
//!
//! ```text
//!   core (domain, valuation)
//!            │
//!            ▼
//!   storage-sqlite (this crate)
//!            │
//!            ▼
//!        SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

// Repository implementations
pub mod assets;
pub mod holdings;
pub mod prices;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, get_db_path, init, run_migrations, spawn_writer, DbConnection,
    DbPool, WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

pub use assets::AssetRepository;
pub use holdings::HoldingRepository;
pub use prices::PriceRepository;

// Re-export from valuator-core for convenience
pub use valuator_core::errors::{DatabaseError, Error, Result};
