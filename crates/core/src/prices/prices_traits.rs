//! Price storage traits.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;

use super::prices_model::PricePoint;
use crate::errors::Result;

/// Storage interface for daily asset prices.
///
/// Absence of a price is not an error: lookups return `None` (or omit the
/// asset from batch results) and the caller decides how to treat the gap.
#[async_trait]
pub trait PriceRepositoryTrait: Send + Sync {
    /// Price of `asset_name` on `date`, if recorded.
    fn get_price(&self, asset_name: &str, date: NaiveDate) -> Result<Option<Decimal>>;

    /// All prices recorded on `date`, keyed by asset name.
    fn get_prices_on_date(&self, date: NaiveDate) -> Result<HashMap<String, Decimal>>;

    async fn create_many(&self, prices: Vec<PricePoint>) -> Result<usize>;
    async fn delete_all(&self) -> Result<usize>;
}
