//! SQLite storage implementation for daily asset prices.

mod model;
mod repository;

pub use model::NewPriceDB;
pub use repository::PriceRepository;
