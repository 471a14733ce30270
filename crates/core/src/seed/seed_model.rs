//! Seed data models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Parsed weights sheet: one row per asset, one weight column per portfolio.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightsTable {
    /// Portfolio id of each weight column, in column order
    pub portfolio_ids: Vec<u32>,
    pub rows: Vec<WeightRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeightRow {
    pub asset_name: String,
    /// Aligned with `WeightsTable::portfolio_ids`
    pub weights: Vec<Decimal>,
}

/// Parsed prices sheet: one row per date, one column per asset.
#[derive(Debug, Clone, PartialEq)]
pub struct PricesTable {
    pub asset_names: Vec<String>,
    /// Ascending by date; the first row provides the initial prices.
    pub rows: Vec<PriceRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceRow {
    pub date: NaiveDate,
    /// Aligned with `PricesTable::asset_names`; `None` where the cell is empty
    pub prices: Vec<Option<Decimal>>,
}

impl PricesTable {
    /// Prices on the first date of the sheet, keyed by column position.
    pub fn initial_prices(&self) -> Option<&PriceRow> {
        self.rows.first()
    }
}

/// Counts of rows written by a seed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedSummary {
    pub assets: usize,
    pub holdings: usize,
    pub prices: usize,
}
