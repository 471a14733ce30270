//! Seed data import.
//!
//! Reference data arrives as two sheets exported to CSV:
//!
//! - **weights** - one row per asset with its target weight in each portfolio
//! - **prices** - one row per date with each asset's closing price
//!
//! Initial quantities are derived from the weights and the first row of
//! prices, so that every portfolio starts with the same notional value.

mod seed_model;
mod seed_parser;
mod seed_service;


pub use seed_model::{PriceRow, PricesTable, SeedSummary, WeightRow, WeightsTable};
pub use seed_parser::{parse_date_cell, parse_decimal_cell, parse_prices_csv, parse_weights_csv};
pub use seed_service::{
    build_asset_lookup, build_initial_holdings, build_price_points, AssetLookup, SeedService,
    PRICES_FILE_NAME, WEIGHTS_FILE_NAME,
};
