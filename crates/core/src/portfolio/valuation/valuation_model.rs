//! Portfolio valuation domain models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Market value and asset weights of one portfolio on one day.
///
/// Produced fresh for every request; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PortfolioSnapshot {
    /// Valuation date
    pub t: NaiveDate,
    /// Asset name mapped to its weight, rounded to 4 decimals.
    /// Contains every asset of the universe, including zero-valued ones.
    pub weights: BTreeMap<String, Decimal>,
    /// Sum of the per-asset market values, rounded to 2 decimals
    pub portfolio_value: Decimal,
}

/// Daily snapshots of one portfolio, in ascending date order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PortfolioValues {
    pub portfolio_id: u32,
    pub values: Vec<PortfolioSnapshot>,
}

/// Result of a valuation request: one entry per requested portfolio, in
/// request order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValuationResponse {
    pub portfolios: Vec<PortfolioValues>,
}

/// What to do when a portfolio is worth nothing on a given day, which
/// leaves the weights undefined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ZeroValuePolicy {
    /// Emit the snapshot with a weight of zero for every asset.
    #[default]
    ZeroWeights,
    /// Fail the computation with `CalculatorError::ZeroPortfolioValue`.
    Reject,
}
